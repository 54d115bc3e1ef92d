use crate::criteria::SearchCriteria;
use crate::models::Coordinates;
use crate::services::types::{PricePrediction, Recommendation};
use anyhow::Result;
use async_trait::async_trait;

/// Conversational answer backend: free-text chat plus the structured
/// search and price-prediction questions the copilot forms submit.
/// This seam allows swapping the HTTP backend for a mock in tests.
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Produce a reply for a (context-bearing) chat query.
    async fn chat(&self, query: &str, user_id: i64) -> Result<String>;

    /// One-shot structured search; replies with the same answer text shape
    /// as `chat`.
    async fn search(
        &self,
        neighborhood: &str,
        bedrooms: Option<u32>,
        user_id: i64,
    ) -> Result<String>;

    /// Price estimate for a structured property description.
    async fn predict_price(
        &self,
        neighborhood: &str,
        bedrooms: u32,
        bathrooms: u32,
    ) -> Result<PricePrediction>;
}

/// Ranked property search backend.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    /// Fetch properties matching the (possibly empty) criteria, best first.
    async fn recommend(&self, criteria: &SearchCriteria) -> Result<Vec<Recommendation>>;
}

/// Resolves a street address to map coordinates.
/// Implementations never fail: a miss produces a synthesized fallback point.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Coordinates;
}
