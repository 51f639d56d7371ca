mod duckdb_chat_history_repository;
mod http_accountability_client;
mod in_memory_chat_history_repository;
mod mock_chat_client;
mod openrouter_client;

pub use duckdb_chat_history_repository::*;
pub use http_accountability_client::*;
pub use in_memory_chat_history_repository::*;
pub use mock_chat_client::*;
pub use openrouter_client::*;
