use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::{ChatClient, ChatTurn};
use crate::domain::DomainError;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const COMPLETIONS_PATH: &str = "/chat/completions";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
/// Reasoning models on the free tier regularly take over a minute.
const DEFAULT_TIMEOUT_SECS: u64 = 120;
const REFERER: &str = "https://github.com/HassanMunene/mheshimiwa-watch";
const APP_TITLE: &str = "Mheshimiwa Watch";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    messages: Vec<ApiMessage<'a>>,
}

#[derive(serde::Serialize)]
struct ApiMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// [`ChatClient`] for the OpenAI chat-completions protocol as served by
/// OpenRouter (and any compatible gateway).
///
/// Configuration comes from the environment:
///
/// ```text
/// OPENROUTER_API_KEY=sk-or-...
/// OPENROUTER_BASE_URL=https://openrouter.ai/api/v1
/// OPENROUTER_MODEL=deepseek/deepseek-r1:free
/// ```
pub struct OpenRouterClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    /// Full endpoint URL (base + COMPLETIONS_PATH).
    url: String,
}

impl OpenRouterClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self::with_timeout(api_key, model, base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let base: String = base_url.into();
        let url = format!("{}{}", base.trim_end_matches('/'), COMPLETIONS_PATH);
        Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            model: model.into(),
            url,
        }
    }

    /// Construct from environment variables:
    ///
    /// | Variable              | Default                        |
    /// |-----------------------|--------------------------------|
    /// | `OPENROUTER_API_KEY`  | required                       |
    /// | `OPENROUTER_BASE_URL` | `https://openrouter.ai/api/v1` |
    /// | `OPENROUTER_MODEL`    | `deepseek/deepseek-r1:free`    |
    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("OPENROUTER_API_KEY").map_err(|_| {
            DomainError::invalid_input(
                "OPENROUTER_API_KEY is not set (use --mock-llm to run offline)",
            )
        })?;
        let base = std::env::var("OPENROUTER_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model =
            std::env::var("OPENROUTER_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(key, model, base))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn build_messages<'a>(
        system: &'a str,
        history: &'a [ChatTurn],
        user: &'a str,
    ) -> Vec<ApiMessage<'a>> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ApiMessage {
            role: "system",
            content: system,
        });
        messages.extend(history.iter().map(|turn| ApiMessage {
            role: turn.role.as_str(),
            content: &turn.content,
        }));
        messages.push(ApiMessage {
            role: "user",
            content: user,
        });
        messages
    }

    fn extract_answer(response: ApiResponse) -> Result<String, DomainError> {
        if let Some(error) = response.error {
            return Err(DomainError::upstream(format!(
                "OpenRouterClient: provider error: {}",
                error.message
            )));
        }

        response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content.unwrap_or_default())
            .ok_or_else(|| DomainError::upstream("OpenRouterClient: response had no choices"))
    }
}

#[async_trait]
impl ChatClient for OpenRouterClient {
    async fn complete(
        &self,
        system: &str,
        history: &[ChatTurn],
        user: &str,
    ) -> Result<String, DomainError> {
        let request = ApiRequest {
            model: &self.model,
            messages: Self::build_messages(system, history, user),
        };

        debug!(
            "OpenRouterClient: POST {} (model={}, messages={})",
            self.url,
            self.model,
            request.messages.len()
        );

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", REFERER)
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::upstream(format!("OpenRouterClient: request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!("OpenRouterClient: API returned {status}: {body}");
            return Err(DomainError::upstream(format!(
                "OpenRouterClient: API returned {status}"
            )));
        }

        let api_response: ApiResponse = response.json().await.map_err(|e| {
            DomainError::upstream(format!("OpenRouterClient: failed to parse response: {e}"))
        })?;

        Self::extract_answer(api_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ApiResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn url_joins_base_without_double_slash() {
        let client = OpenRouterClient::new("key", DEFAULT_MODEL, "https://openrouter.ai/api/v1/");
        assert_eq!(client.url(), "https://openrouter.ai/api/v1/chat/completions");
    }

    #[test]
    fn messages_wrap_history_between_system_and_user() {
        let history = vec![ChatTurn::user("q1"), ChatTurn::assistant("a1")];
        let messages = OpenRouterClient::build_messages("sys", &history, "q2");

        let roles: Vec<&str> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(messages[3].content, "q2");
    }

    #[test]
    fn extracts_first_choice_content() {
        let response = parse(
            r#"{"choices":[{"message":{"role":"assistant","content":"**Fact Source**: Treasury"}}]}"#,
        );
        assert_eq!(
            OpenRouterClient::extract_answer(response).unwrap(),
            "**Fact Source**: Treasury"
        );
    }

    #[test]
    fn provider_error_in_body_is_upstream_error() {
        let response = parse(r#"{"error":{"message":"Rate limit exceeded","code":429}}"#);
        let err = OpenRouterClient::extract_answer(response).unwrap_err();
        assert!(err.is_upstream());
        assert!(err.to_string().contains("Rate limit exceeded"));
    }

    #[test]
    fn empty_choices_is_upstream_error() {
        let err = OpenRouterClient::extract_answer(parse(r#"{"choices":[]}"#)).unwrap_err();
        assert!(err.is_upstream());
    }
}
