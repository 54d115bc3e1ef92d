use propbot_copilot::copilot::Copilot;
use propbot_copilot::models::UserAccount;
use propbot_copilot::services::{NominatimGeocoder, PropBotBackend, DEFAULT_API_URL};
use propbot_copilot::session::SessionState;
use std::time::Duration;
use tracing::{info, warn, Level};

/// Cosmetic pause before bot replies are shown, as the original UI did.
const REPLY_DELAY: Duration = Duration::from_millis(400);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🏠 PropBot Copilot - scripted demo session");
    info!("===========================================");
    info!("");

    let api_url = std::env::var("PROPBOT_API").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let backend = PropBotBackend::with_base_url(&api_url)?;

    info!("Logging in as guest against {api_url}...");
    let token = backend.guest_login().await?;
    let user = UserAccount::guest(token.user_id, token.guest_id.clone(), token.access_token.clone());
    let mut session = SessionState::new(user);

    let copilot = Copilot::new(backend.clone(), NominatimGeocoder::new()?);

    session.open_copilot();
    copilot.load_initial_properties(&mut session).await;

    println!(
        "\nPropBot: Hi {}! 👋 I'm PropBot. Ask me anything about Boston neighborhoods, prices, or commute.",
        session.user.full_name
    );

    match backend.sample_queries().await {
        Ok(queries) => {
            info!("Try asking:");
            for query in queries.iter().take(4) {
                info!("  • {query}");
            }
        }
        Err(e) => warn!("Sample queries error: {e}"),
    }

    for question in [
        "Show me a 2 bedroom in Back Bay under 800k",
        "What about renting near Dorchester instead?",
    ] {
        println!("\nYou: {question}");
        let outcome = copilot.send_message(&mut session, question).await;
        tokio::time::sleep(REPLY_DELAY).await;
        println!("PropBot: {}", outcome.reply);

        if outcome.refreshed {
            println!("\n✅ {} matches\n", session.properties.len());
            for (i, property) in session.properties.iter().enumerate() {
                println!("{}. {} (score {:.2})", i + 1, property.name, property.match_score);
                println!("   {}", property.address);
                println!("   ({:.4}, {:.4})", property.lat, property.lng);
                println!();
            }
        }
    }

    println!("\nYou: Predict price for a 2BR 1BA home in Back Bay");
    let outcome = copilot.submit_predict(&mut session, "Back Bay", 2, 1).await;
    tokio::time::sleep(REPLY_DELAY).await;
    println!("PropBot: {}", outcome.reply);

    // Server-side history for this user, as the history panel showed it
    match backend.chat_history(session.user.user_id).await {
        Ok(history) => {
            info!("");
            info!("💬 {} chats stored for this user", history.total_chats);
            for chat in history.chats.iter().take(5) {
                info!("  📝 {} ({})", truncate(&chat.query, 60), chat.timestamp);
            }
        }
        Err(e) => warn!("Chat history error: {e}"),
    }

    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let head: String = text.chars().take(max_chars).collect();
        format!("{head}...")
    }
}
