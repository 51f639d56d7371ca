use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::application::AccountabilityApi;
use crate::domain::{Answer, ChatHistoryGroup, DomainError, Question};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000";
const API_BASE_ENV: &str = "MHESHIMIWA_API_BASE";
const REQUEST_TIMEOUT_SECS: u64 = 180;

/// [`AccountabilityApi`] over HTTP, talking to a running `mheshimiwa serve`.
pub struct HttpAccountabilityClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAccountabilityClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base: String = base_url.into();
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL from `MHESHIMIWA_API_BASE`, defaulting to `http://localhost:8000`.
    pub fn configured_base_url() -> String {
        Self::base_url_or_default(std::env::var(API_BASE_ENV).ok())
    }

    fn base_url_or_default(value: Option<String>) -> String {
        value
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, DomainError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
                .unwrap_or(body);
            return Err(DomainError::upstream(format!(
                "{endpoint} returned {status}: {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| {
                DomainError::upstream(format!("{endpoint}: failed to parse response: {e}"))
            })
    }
}

#[async_trait]
impl AccountabilityApi for HttpAccountabilityClient {
    async fn ask(&self, question: &Question) -> Result<Answer, DomainError> {
        let url = format!("{}/ask", self.base_url);
        debug!("POST {} (session={:?})", url, question.session_id);

        let response = self
            .client
            .post(&url)
            .json(question)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("POST /ask failed: {e}")))?;

        Self::decode("POST /ask", response).await
    }

    async fn chat_history(&self) -> Result<Vec<ChatHistoryGroup>, DomainError> {
        let url = format!("{}/chat-history", self.base_url);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("GET /chat-history failed: {e}")))?;

        Self::decode("GET /chat-history", response).await
    }
}
