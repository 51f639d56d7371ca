mod accountability_api;
mod chat_client;
mod chat_history_repository;

pub use accountability_api::*;
pub use chat_client::*;
pub use chat_history_repository::*;
