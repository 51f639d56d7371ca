use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::AccountabilityApi;
use crate::domain::Question;

/// The only message a user sees when a request fails, whatever the cause.
pub const FALLBACK_ERROR: &str = "Error: Could not get response";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Blank input; no request was made.
    Skipped,
    Answered,
    Failed,
}

/// Client-side state of one conversation: the session id handed out by the
/// service and the text currently on display.
///
/// `submit` takes `&mut self`, so at most one request is in flight.
pub struct Conversation {
    api: Arc<dyn AccountabilityApi>,
    session_id: Option<i64>,
    display: Option<String>,
}

impl Conversation {
    pub fn new(api: Arc<dyn AccountabilityApi>) -> Self {
        Self {
            api,
            session_id: None,
            display: None,
        }
    }

    /// Continue a session started earlier.
    pub fn resume(mut self, session_id: i64) -> Self {
        self.session_id = Some(session_id);
        self
    }

    pub async fn submit(&mut self, text: &str) -> SubmitOutcome {
        let text = text.trim();
        if text.is_empty() {
            return SubmitOutcome::Skipped;
        }

        let mut question = Question::new(text);
        if let Some(id) = self.session_id {
            question = question.with_session(id);
        }

        match self.api.ask(&question).await {
            Ok(answer) => {
                debug!("Received answer for session {}", answer.session_id);
                self.session_id = Some(answer.session_id);
                self.display = Some(answer.answer);
                SubmitOutcome::Answered
            }
            Err(e) => {
                warn!("Ask request failed: {}", e);
                self.display = Some(FALLBACK_ERROR.to_string());
                SubmitOutcome::Failed
            }
        }
    }

    /// Forget the current session so the next question opens a new one.
    pub fn reset(&mut self) {
        self.session_id = None;
        self.display = None;
    }

    pub fn session_id(&self) -> Option<i64> {
        self.session_id
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }
}
