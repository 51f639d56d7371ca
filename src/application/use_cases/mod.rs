mod ask_question;
mod chat_history;
mod conversation;

pub use ask_question::*;
pub use chat_history::*;
pub use conversation::*;
