use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::application::{
    AccountabilityApi, AskQuestionUseCase, ChatClient, ChatHistoryRepository, ChatHistoryUseCase,
    Conversation,
};
use crate::connector::server::AppState;
use crate::{
    DuckdbChatHistoryRepository, HttpAccountabilityClient, InMemoryChatHistoryRepository,
    MockChatClient, OpenRouterClient,
};

pub struct ContainerConfig {
    pub data_dir: String,
    /// Base URL of the accountability service used by client commands.
    pub api_base: String,
    pub mock_llm: bool,
    pub memory_storage: bool,
    /// Earlier exchanges replayed to the model on follow-up questions.
    pub history_window: usize,
}

pub struct Container {
    api: Arc<dyn AccountabilityApi>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        debug!("Using accountability service at {}", config.api_base);
        let api: Arc<dyn AccountabilityApi> =
            Arc::new(HttpAccountabilityClient::new(config.api_base.clone()));

        Ok(Self { api, config })
    }

    /// Client used by `ask`, `chat` and `history`.
    pub fn api(&self) -> Arc<dyn AccountabilityApi> {
        self.api.clone()
    }

    pub fn conversation(&self) -> Conversation {
        Conversation::new(self.api.clone())
    }

    /// Wire the service side (LLM client and history storage) for `serve`.
    ///
    /// Storage is opened here rather than in [`Container::new`] so client
    /// commands never touch the database file.
    pub fn app_state(&self) -> Result<AppState> {
        let chat_client: Arc<dyn ChatClient> = if self.config.mock_llm {
            debug!("Using mock chat client");
            Arc::new(MockChatClient::new())
        } else {
            let client = OpenRouterClient::from_env()?;
            debug!("Using OpenRouter model {} at {}", client.model(), client.url());
            Arc::new(client)
        };

        let history_repo: Arc<dyn ChatHistoryRepository> = if self.config.memory_storage {
            debug!("Using in-memory chat history");
            Arc::new(InMemoryChatHistoryRepository::new())
        } else {
            match self.open_duckdb() {
                Ok(repo) => Arc::new(repo),
                Err(e) => {
                    tracing::warn!(
                        "Failed to initialize DuckDB in {}: {}. Falling back to in-memory storage.",
                        self.config.data_dir,
                        e
                    );
                    Arc::new(InMemoryChatHistoryRepository::new())
                }
            }
        };

        let ask = AskQuestionUseCase::new(chat_client, history_repo.clone())
            .with_history_window(self.config.history_window);
        let history = ChatHistoryUseCase::new(history_repo);

        Ok(AppState::new(ask, history))
    }

    fn open_duckdb(&self) -> Result<DuckdbChatHistoryRepository> {
        std::fs::create_dir_all(&self.config.data_dir)?;
        let db_path = PathBuf::from(&self.config.data_dir).join("mheshimiwa.duckdb");
        let repo = DuckdbChatHistoryRepository::new(&db_path)?;
        debug!("Using DuckDB chat history at {:?}", db_path);
        Ok(repo)
    }

    pub fn data_dir(&self) -> &str {
        &self.config.data_dir
    }

    pub fn memory_storage(&self) -> bool {
        self.config.memory_storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Question;

    fn config(data_dir: String) -> ContainerConfig {
        ContainerConfig {
            data_dir,
            api_base: "http://localhost:8000".to_string(),
            mock_llm: true,
            memory_storage: false,
            history_window: 10,
        }
    }

    #[tokio::test]
    async fn unopenable_data_dir_falls_back_to_memory() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-directory");
        std::fs::write(&blocker, "occupied").unwrap();
        let data_dir = blocker.join("nested").to_string_lossy().to_string();

        let container = Container::new(config(data_dir)).unwrap();
        let state = container.app_state().unwrap();

        let answer = state
            .ask
            .execute(Question::new("Who funds county hospitals?"))
            .await
            .unwrap();
        assert_eq!(answer.session_id, 1);
        assert_eq!(state.history.execute().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn data_dir_gets_a_duckdb_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("store").to_string_lossy().to_string();

        let container = Container::new(config(data_dir)).unwrap();
        container.app_state().unwrap();

        assert!(dir.path().join("store").join("mheshimiwa.duckdb").exists());
    }
}
