mod chat_exchange;
mod chat_history;
mod chat_session;
mod question;

pub use chat_exchange::*;
pub use chat_history::*;
pub use chat_session::*;
pub use question::*;
