use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::ChatHistoryRepository;
use crate::domain::{ChatExchange, ChatSession, DomainError};

#[derive(Default)]
struct Store {
    sessions: BTreeMap<i64, ChatSession>,
    exchanges: Vec<ChatExchange>,
    next_session_id: i64,
    next_chat_id: i64,
}

pub struct InMemoryChatHistoryRepository {
    store: Arc<Mutex<Store>>,
}

impl InMemoryChatHistoryRepository {
    pub fn new() -> Self {
        Self {
            store: Arc::new(Mutex::new(Store {
                next_session_id: 1,
                next_chat_id: 1,
                ..Store::default()
            })),
        }
    }
}

impl Default for InMemoryChatHistoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatHistoryRepository for InMemoryChatHistoryRepository {
    async fn create_session(&self, created_at: i64) -> Result<ChatSession, DomainError> {
        let mut store = self.store.lock().await;
        let session = ChatSession::reconstitute(store.next_session_id, created_at);
        store.next_session_id += 1;
        store.sessions.insert(session.session_id(), session.clone());

        debug!("Created in-memory session {}", session.session_id());
        Ok(session)
    }

    async fn start_session(
        &self,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError> {
        let mut store = self.store.lock().await;
        let session = ChatSession::reconstitute(store.next_session_id, timestamp);
        store.next_session_id += 1;

        let exchange = ChatExchange::reconstitute(
            store.next_chat_id,
            session.session_id(),
            question.to_string(),
            answer.to_string(),
            timestamp,
        );
        store.next_chat_id += 1;
        store.sessions.insert(session.session_id(), session);
        store.exchanges.push(exchange.clone());
        Ok(exchange)
    }

    async fn find_session(&self, session_id: i64) -> Result<Option<ChatSession>, DomainError> {
        let store = self.store.lock().await;
        Ok(store.sessions.get(&session_id).cloned())
    }

    async fn append_exchange(
        &self,
        session_id: i64,
        question: &str,
        answer: &str,
        timestamp: i64,
    ) -> Result<ChatExchange, DomainError> {
        let mut store = self.store.lock().await;
        if !store.sessions.contains_key(&session_id) {
            return Err(DomainError::not_found(format!(
                "Session not found: {}",
                session_id
            )));
        }

        let exchange = ChatExchange::reconstitute(
            store.next_chat_id,
            session_id,
            question.to_string(),
            answer.to_string(),
            timestamp,
        );
        store.next_chat_id += 1;
        store.exchanges.push(exchange.clone());
        Ok(exchange)
    }

    async fn recent_exchanges(
        &self,
        session_id: i64,
        limit: usize,
    ) -> Result<Vec<ChatExchange>, DomainError> {
        let store = self.store.lock().await;
        let mut recent: Vec<ChatExchange> = store
            .exchanges
            .iter()
            .rev()
            .filter(|e| e.session_id() == session_id)
            .take(limit)
            .cloned()
            .collect();
        recent.reverse();
        Ok(recent)
    }

    async fn list_exchanges(&self) -> Result<Vec<ChatExchange>, DomainError> {
        let store = self.store.lock().await;
        Ok(store.exchanges.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn session_ids_start_at_one_and_increase() {
        let repo = InMemoryChatHistoryRepository::new();

        let a = repo.create_session(10).await.unwrap();
        let b = repo.create_session(20).await.unwrap();

        assert_eq!(a.session_id(), 1);
        assert_eq!(b.session_id(), 2);
        assert_eq!(repo.find_session(2).await.unwrap(), Some(b));
        assert_eq!(repo.find_session(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn append_to_missing_session_fails() {
        let repo = InMemoryChatHistoryRepository::new();

        let err = repo.append_exchange(9, "q", "a", 0).await.unwrap_err();

        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn recent_exchanges_are_latest_oldest_first() {
        let repo = InMemoryChatHistoryRepository::new();
        let s = repo.create_session(0).await.unwrap().session_id();
        let other = repo.create_session(0).await.unwrap().session_id();
        for (i, q) in ["one", "two", "three"].iter().enumerate() {
            repo.append_exchange(s, q, "a", i as i64).await.unwrap();
            repo.append_exchange(other, "noise", "a", i as i64).await.unwrap();
        }

        let recent = repo.recent_exchanges(s, 2).await.unwrap();

        let questions: Vec<&str> = recent.iter().map(|e| e.question()).collect();
        assert_eq!(questions, vec!["two", "three"]);
    }

    #[tokio::test]
    async fn start_session_stores_session_and_first_exchange() {
        let repo = InMemoryChatHistoryRepository::new();
        repo.create_session(0).await.unwrap();

        let exchange = repo.start_session("opening", "report", 50).await.unwrap();

        assert_eq!(exchange.session_id(), 2);
        assert_eq!(repo.find_session(2).await.unwrap().unwrap().created_at(), 50);
        assert_eq!(repo.recent_exchanges(2, usize::MAX).await.unwrap(), vec![exchange]);
    }
}
