use crate::criteria::SearchCriteria;
use crate::services::traits::{AnswerService, RecommendationService};
use crate::services::types::{
    AuthToken, ChatHistory, ChatReply, PricePrediction, Recommendation, RecommendationResponse,
    SampleQueries,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

/// Default address of the PropBot API service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8002";

/// HTTP client for the PropBot backend API.
///
/// One instance per process is enough; cloning shares the underlying
/// connection pool. No request timeout is configured: a hung backend call
/// simply delays the turn it belongs to.
#[derive(Debug, Clone)]
pub struct PropBotBackend {
    client: Client,
    base_url: String,
}

impl PropBotBackend {
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_API_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent("PropBotApp/1.0")
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Log in a registered user.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthToken> {
        let body = json!({ "email": email, "password": password });
        self.post_json("/auth/login", &body).await
    }

    /// Create an anonymous guest session.
    pub async fn guest_login(&self) -> Result<AuthToken> {
        self.post_json("/auth/guest", &json!({})).await
    }

    /// Register a new account. The backend replies with a token, so a
    /// successful registration doubles as a login.
    pub async fn register(&self, email: &str, password: &str) -> Result<AuthToken> {
        let body = json!({ "email": email, "password": password });
        self.post_json("/auth/register", &body).await
    }

    /// Canned starter questions for the chat quick replies.
    pub async fn sample_queries(&self) -> Result<Vec<String>> {
        let reply: SampleQueries = self.get_json("/sample-queries").await?;
        Ok(reply.queries)
    }

    /// Stored chat interactions for a user, newest first.
    pub async fn chat_history(&self, user_id: i64) -> Result<ChatHistory> {
        self.get_json(&format!("/chat/history/{user_id}")).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {url}");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to reach {path}"))?;

        Self::decode(response, path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to reach {path}"))?;

        Self::decode(response, path).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response, path: &str) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("{path} returned status {status}");
            anyhow::bail!("HTTP {status} for {path}: {body}");
        }

        response
            .json()
            .await
            .with_context(|| format!("Failed to decode {path} response"))
    }
}

#[async_trait]
impl AnswerService for PropBotBackend {
    async fn chat(&self, query: &str, user_id: i64) -> Result<String> {
        let body = json!({ "query": query, "user_id": user_id });
        let reply: ChatReply = self.post_json("/chat", &body).await?;
        Ok(reply.answer)
    }

    async fn search(
        &self,
        neighborhood: &str,
        bedrooms: Option<u32>,
        user_id: i64,
    ) -> Result<String> {
        let body = json!({
            "neighborhood": neighborhood,
            "bedrooms": bedrooms,
            "user_id": user_id,
        });
        let reply: ChatReply = self.post_json("/search", &body).await?;
        Ok(reply.answer)
    }

    async fn predict_price(
        &self,
        neighborhood: &str,
        bedrooms: u32,
        bathrooms: u32,
    ) -> Result<PricePrediction> {
        let body = json!({
            "neighborhood": neighborhood,
            "bedrooms": bedrooms,
            "bathrooms": bathrooms,
        });
        self.post_json("/predict-price", &body).await
    }
}

#[async_trait]
impl RecommendationService for PropBotBackend {
    async fn recommend(&self, criteria: &SearchCriteria) -> Result<Vec<Recommendation>> {
        let reply: RecommendationResponse = self
            .post_json("/recommendations/by-features", criteria)
            .await?;
        Ok(reply.recommendations)
    }
}
