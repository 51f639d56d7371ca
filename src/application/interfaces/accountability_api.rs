use async_trait::async_trait;

use crate::domain::{Answer, ChatHistoryGroup, DomainError, Question};

/// The remote accountability service as seen by a client.
#[async_trait]
pub trait AccountabilityApi: Send + Sync {
    /// `POST /ask`
    async fn ask(&self, question: &Question) -> Result<Answer, DomainError>;

    /// `GET /chat-history`
    async fn chat_history(&self) -> Result<Vec<ChatHistoryGroup>, DomainError>;
}
