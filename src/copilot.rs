//! The conversational refresh loop.
//!
//! One turn: record the user message, ask the answer service for a reply,
//! extract search criteria from the raw text, and conditionally re-fetch and
//! re-geocode the displayed property set. Failures never tear down the
//! session; the worst case is an error turn in the transcript or a display
//! that keeps its previous contents.

use crate::criteria::{self, SearchCriteria};
use crate::models::DisplayedProperty;
use crate::services::traits::{AnswerService, Geocoder, RecommendationService};
use crate::services::types::{PricePrediction, Recommendation};
use crate::session::{SessionState, CONTEXT_WINDOW};
use anyhow::Error;
use futures::future::join_all;
use tracing::{debug, info, warn};

/// What a completed turn produced.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    /// Text to show the user: the service answer, or the synthetic error line.
    pub reply: String,
    /// Whether the displayed property set was replaced this turn.
    pub refreshed: bool,
}

/// Orchestrates copilot turns against the backend services.
///
/// Holds no conversation state of its own; everything carried between turns
/// lives in the [`SessionState`] passed to each call.
pub struct Copilot<B, G> {
    backend: B,
    geocoder: G,
}

impl<B, G> Copilot<B, G>
where
    B: AnswerService + RecommendationService,
    G: Geocoder,
{
    pub fn new(backend: B, geocoder: G) -> Self {
        Self { backend, geocoder }
    }

    /// Run one free-text chat turn.
    ///
    /// The answer service sees the last [`CONTEXT_WINDOW`] transcript turns
    /// plus the question; the criteria extractor sees only the raw text.
    /// A failed chat call records an error turn and skips the refresh.
    pub async fn send_message(&self, session: &mut SessionState, text: &str) -> TurnOutcome {
        session.push_user(text);

        let recent = session.recent_context(CONTEXT_WINDOW);
        let contextual_query =
            format!("Previous conversation:\n{recent}\n\nCurrent question: {text}");

        let answer = match self.backend.chat(&contextual_query, session.user.user_id).await {
            Ok(answer) => answer,
            Err(e) => return record_error(session, e),
        };
        session.push_assistant(answer.clone());

        let criteria = criteria::extract_search_criteria(text);
        debug!("Extracted search criteria: {criteria:?}");

        let refreshed = if criteria.is_empty() {
            debug!("No search criteria found, keeping existing properties");
            false
        } else {
            self.refresh_properties(session, &criteria).await
        };

        TurnOutcome {
            reply: answer,
            refreshed,
        }
    }

    /// Populate the display with unconstrained recommendations, as when the
    /// copilot overlay first opens.
    pub async fn load_initial_properties(&self, session: &mut SessionState) {
        if !self.refresh_properties(session, &SearchCriteria::default()).await {
            debug!("Initial property load left the display unchanged");
        }
    }

    /// Structured search form flow: ask the search endpoint, then refresh the
    /// display for the same neighborhood and bedroom count.
    pub async fn submit_search(
        &self,
        session: &mut SessionState,
        neighborhood: &str,
        bedrooms: u32,
    ) -> TurnOutcome {
        let question = format!("Search {bedrooms}BR properties in {neighborhood}");
        session.push_user(question);

        let answer = match self
            .backend
            .search(neighborhood, Some(bedrooms), session.user.user_id)
            .await
        {
            Ok(answer) => answer,
            Err(e) => return record_error(session, e),
        };
        session.push_assistant(answer.clone());

        let criteria = SearchCriteria {
            neighborhood: Some(neighborhood.to_string()),
            bedrooms: Some(bedrooms),
            ..SearchCriteria::default()
        };
        let refreshed = self.refresh_properties(session, &criteria).await;

        TurnOutcome {
            reply: answer,
            refreshed,
        }
    }

    /// Price prediction form flow. The estimate is formatted into the reply
    /// and recorded as an assistant turn; the display is never touched.
    pub async fn submit_predict(
        &self,
        session: &mut SessionState,
        neighborhood: &str,
        bedrooms: u32,
        bathrooms: u32,
    ) -> TurnOutcome {
        let question =
            format!("Predict price for a {bedrooms}BR {bathrooms}BA home in {neighborhood}");
        session.push_user(question);

        match self
            .backend
            .predict_price(neighborhood, bedrooms, bathrooms)
            .await
        {
            Ok(prediction) => {
                let reply = format_prediction(&prediction);
                session.push_assistant(reply.clone());
                TurnOutcome {
                    reply,
                    refreshed: false,
                }
            }
            Err(e) => record_error(session, e),
        }
    }

    /// Fetch recommendations for `criteria` and replace the displayed set
    /// wholesale. Failures are logged and leave the previous set in place.
    async fn refresh_properties(
        &self,
        session: &mut SessionState,
        criteria: &SearchCriteria,
    ) -> bool {
        match self.backend.recommend(criteria).await {
            Ok(recommendations) if !recommendations.is_empty() => {
                session.properties = self.resolve_properties(&recommendations).await;
                info!("Updated display with {} properties", session.properties.len());
                true
            }
            Ok(_) => {
                debug!("Recommendation service returned no matches");
                false
            }
            Err(e) => {
                warn!("Property update failed: {e:#}");
                false
            }
        }
    }

    /// Geocode every recommendation concurrently and build the display set.
    async fn resolve_properties(
        &self,
        recommendations: &[Recommendation],
    ) -> Vec<DisplayedProperty> {
        let lookups = recommendations
            .iter()
            .map(|rec| self.geocoder.geocode(&rec.address));
        let coords = join_all(lookups).await;

        recommendations
            .iter()
            .zip(coords)
            .enumerate()
            .map(|(i, (rec, coords))| DisplayedProperty {
                id: rec.property_id.clone(),
                name: format!("Property {}", i + 1),
                description: rec.description.clone(),
                match_score: rec.match_score,
                address: rec.address.clone(),
                lat: coords.lat,
                lng: coords.lng,
            })
            .collect()
    }
}

/// Record a failed backend call as a synthetic bot turn. The user turn that
/// triggered it stays in the transcript; nothing is rolled back.
fn record_error(session: &mut SessionState, err: Error) -> TurnOutcome {
    let message = format!("❌ Error: {err}");
    session.push_assistant(message.clone());
    TurnOutcome {
        reply: message,
        refreshed: false,
    }
}

fn format_prediction(prediction: &PricePrediction) -> String {
    format!(
        "💰 Estimated Price: ${}\n📈 Price Range: ${} - ${}",
        format_dollars(prediction.predicted_price),
        format_dollars(prediction.price_range.min),
        format_dollars(prediction.price_range.max),
    )
}

/// Whole dollars with thousands separators.
fn format_dollars(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.abs().to_string();
    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}
