use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Reply from the chat and search endpoints; only the answer text is consumed.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    pub answer: String,
}

/// One ranked property hit from the recommendation endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub property_id: String,
    pub description: String,
    pub match_score: f64,
    #[serde(default)]
    pub address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<Recommendation>,
}

/// Token payload from the auth endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub user_id: i64,
    #[serde(default)]
    pub guest_id: Option<String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Reply from the price prediction endpoint.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PricePrediction {
    pub predicted_price: f64,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleQueries {
    pub queries: Vec<String>,
}

/// One stored chat interaction for a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistoryEntry {
    pub query: String,
    #[serde(default)]
    pub response: Option<String>,
    pub timestamp: NaiveDateTime,
}

/// Server-side chat history for a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatHistory {
    pub total_chats: usize,
    pub chats: Vec<ChatHistoryEntry>,
}
