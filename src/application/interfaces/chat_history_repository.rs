use async_trait::async_trait;

use crate::domain::{ChatExchange, ChatSession, DomainError};

/// Persistence for chat sessions and their question/answer exchanges.
#[async_trait]
pub trait ChatHistoryRepository: Send + Sync {
    /// Allocate a new session. Ids increase monotonically starting at 1.
    async fn create_session(&self, created_at: i64) -> Result<ChatSession, DomainError>;

    /// Create a session together with its first exchange. Either both are
    /// stored or neither is.
    async fn start_session(
        &self,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError>;

    async fn find_session(&self, session_id: i64) -> Result<Option<ChatSession>, DomainError>;

    /// Store an exchange. Fails with `NotFound` if the session does not exist.
    async fn append_exchange(
        &self,
        session_id: i64,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError>;

    /// The latest `limit` exchanges of a session, returned oldest first.
    async fn recent_exchanges(
        &self,
        session_id: i64,
        limit: usize,
    ) -> Result<Vec<ChatExchange>, DomainError>;

    /// Every stored exchange, ordered by `chat_id`.
    async fn list_exchanges(&self) -> Result<Vec<ChatExchange>, DomainError>;
}
