use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use crate::application::{ChatClient, ChatHistoryRepository, ChatTurn};
use crate::domain::{current_timestamp, Answer, DomainError, Question};

/// Number of earlier exchanges replayed to the model for a follow-up question.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// System prompt framing every answer as a structured accountability report.
pub const SYSTEM_PROMPT: &str = "\
You are a Kenyan political accountability assistant. Provide structured responses with:
1. **Fact Source** (official documents)
2. **Progress Status** (Completed/In-Progress/Stalled)
3. **Verification Links** (gov't portals)
4. **Key Figures** (budgets, timelines)";

/// Answers a question, continuing or starting a session, and records the exchange.
pub struct AskQuestionUseCase {
    chat_client: Arc<dyn ChatClient>,
    history_repo: Arc<dyn ChatHistoryRepository>,
    history_window: usize,
}

impl AskQuestionUseCase {
    pub fn new(
        chat_client: Arc<dyn ChatClient>,
        history_repo: Arc<dyn ChatHistoryRepository>,
    ) -> Self {
        Self {
            chat_client,
            history_repo,
            history_window: DEFAULT_HISTORY_WINDOW,
        }
    }

    pub fn with_history_window(mut self, window: usize) -> Self {
        self.history_window = window;
        self
    }

    pub async fn execute(&self, question: Question) -> Result<Answer, DomainError> {
        if question.is_blank() {
            return Err(DomainError::invalid_input("Question cannot be empty"));
        }
        let text = question.question.trim();

        let history = match question.session_id {
            Some(session_id) => {
                self.history_repo
                    .find_session(session_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::not_found(format!("Session not found: {}", session_id))
                    })?;
                self.load_turns(session_id).await?
            }
            None => Vec::new(),
        };

        info!(
            "Answering question (session={:?}, context_turns={})",
            question.session_id,
            history.len()
        );
        let start_time = Instant::now();

        // A failed completion must leave no trace, so a fresh session is only
        // allocated once the answer is in hand.
        let answer = self
            .chat_client
            .complete(SYSTEM_PROMPT, &history, text)
            .await?;

        let exchange = match question.session_id {
            Some(id) => {
                self.history_repo
                    .append_exchange(id, text, &answer, current_timestamp())
                    .await?
            }
            None => {
                self.history_repo
                    .start_session(text, &answer, current_timestamp())
                    .await?
            }
        };
        let session_id = exchange.session_id();

        debug!(
            "Stored exchange {} in session {} ({} ms)",
            exchange.chat_id(),
            session_id,
            start_time.elapsed().as_millis()
        );

        Ok(Answer::new(answer, session_id))
    }

    async fn load_turns(&self, session_id: i64) -> Result<Vec<ChatTurn>, DomainError> {
        if self.history_window == 0 {
            return Ok(Vec::new());
        }

        let exchanges = self
            .history_repo
            .recent_exchanges(session_id, self.history_window)
            .await?;

        Ok(exchanges
            .iter()
            .flat_map(|e| [ChatTurn::user(e.question()), ChatTurn::assistant(e.answer())])
            .collect())
    }
}
