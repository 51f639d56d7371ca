use serde::{Deserialize, Serialize};

/// Body of `POST /ask`.
///
/// A missing `session_id` starts a new conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub question: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<i64>,
}

impl Question {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            session_id: None,
        }
    }

    pub fn with_session(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// True when the question is empty once surrounding whitespace is removed.
    pub fn is_blank(&self) -> bool {
        self.question.trim().is_empty()
    }
}

/// Reply to `POST /ask`. The client keeps `session_id` for follow-up questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub answer: String,
    pub session_id: i64,
}

impl Answer {
    pub fn new(answer: impl Into<String>, session_id: i64) -> Self {
        Self {
            answer: answer.into(),
            session_id,
        }
    }
}
