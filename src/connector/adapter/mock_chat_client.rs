use async_trait::async_trait;
use tracing::debug;

use crate::application::{ChatClient, ChatTurn};
use crate::domain::DomainError;

/// Offline [`ChatClient`] producing a deterministic report-shaped answer.
pub struct MockChatClient;

impl MockChatClient {
    pub fn new() -> Self {
        Self
    }

    fn render(history: &[ChatTurn], user: &str) -> String {
        format!(
            "1. **Fact Source**: mock records\n\
             2. **Progress Status**: In-Progress\n\
             3. **Verification Links**: none (offline mode)\n\
             4. **Key Figures**: {} earlier messages in this conversation\n\n\
             Question received: {}",
            history.len(),
            user
        )
    }
}

impl Default for MockChatClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatClient for MockChatClient {
    async fn complete(
        &self,
        _system: &str,
        history: &[ChatTurn],
        user: &str,
    ) -> Result<String, DomainError> {
        debug!("Generating mock answer ({} context turns)", history.len());
        Ok(Self::render(history, user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_answer_is_deterministic() {
        let client = MockChatClient::new();

        let a = client.complete("sys", &[], "Who is the MP for Lang'ata?").await.unwrap();
        let b = client.complete("sys", &[], "Who is the MP for Lang'ata?").await.unwrap();

        assert_eq!(a, b);
        assert!(a.contains("Who is the MP for Lang'ata?"));
    }

    #[tokio::test]
    async fn test_mock_answer_reflects_history_length() {
        let client = MockChatClient::new();
        let history = vec![ChatTurn::user("q"), ChatTurn::assistant("a")];

        let answer = client.complete("sys", &history, "next").await.unwrap();

        assert!(answer.contains("2 earlier messages"));
    }
}
