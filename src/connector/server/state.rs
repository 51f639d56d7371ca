use std::sync::Arc;

use crate::application::{AskQuestionUseCase, ChatHistoryUseCase};

/// Shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub ask: Arc<AskQuestionUseCase>,
    pub history: Arc<ChatHistoryUseCase>,
}

impl AppState {
    pub fn new(ask: AskQuestionUseCase, history: ChatHistoryUseCase) -> Self {
        Self {
            ask: Arc::new(ask),
            history: Arc::new(history),
        }
    }
}
