use std::sync::Arc;

use tracing::debug;

use crate::application::ChatHistoryRepository;
use crate::domain::{group_by_date, ChatHistoryGroup, DomainError};

pub struct ChatHistoryUseCase {
    history_repo: Arc<dyn ChatHistoryRepository>,
}

impl ChatHistoryUseCase {
    pub fn new(history_repo: Arc<dyn ChatHistoryRepository>) -> Self {
        Self { history_repo }
    }

    pub async fn execute(&self) -> Result<Vec<ChatHistoryGroup>, DomainError> {
        let exchanges = self.history_repo.list_exchanges().await?;
        let groups = group_by_date(&exchanges);
        debug!(
            "Built chat history: {} exchanges in {} date groups",
            exchanges.len(),
            groups.len()
        );
        Ok(groups)
    }
}
