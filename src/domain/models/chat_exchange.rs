use serde::{Deserialize, Serialize};

/// One stored question/answer pair belonging to a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    chat_id: i64,
    session_id: i64,
    question: String,
    answer: String,
    /// Unix seconds.
    timestamp: i64,
}

impl ChatExchange {
    /// Reconstitutes from persisted data (used by adapters).
    pub fn reconstitute(
        chat_id: i64,
        session_id: i64,
        question: String,
        answer: String,
        timestamp: i64,
    ) -> Self {
        Self {
            chat_id,
            session_id,
            question,
            answer,
            timestamp,
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn session_id(&self) -> i64 {
        self.session_id
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> &str {
        &self.answer
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}
