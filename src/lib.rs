pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AccountabilityApi, AskQuestionUseCase, ChatClient, ChatHistoryRepository, ChatHistoryUseCase,
    ChatRole, ChatTurn, Conversation, SubmitOutcome, FALLBACK_ERROR, SYSTEM_PROMPT,
};

pub use cli::Commands;

pub use connector::{
    DuckdbChatHistoryRepository, HttpAccountabilityClient, InMemoryChatHistoryRepository,
    MockChatClient, OpenRouterClient,
};

pub use domain::{
    group_by_date, Answer, ChatExchange, ChatHistoryEntry, ChatHistoryGroup, ChatSession,
    DomainError, Question,
};
