//! End-to-end tests: a real server on loopback, driven through the HTTP client.

use std::sync::Arc;

use tokio::net::TcpListener;

use mheshimiwa::connector::server::{create_router, AppState};
use mheshimiwa::{
    AccountabilityApi, AskQuestionUseCase, ChatHistoryUseCase, Conversation,
    DuckdbChatHistoryRepository, HttpAccountabilityClient, InMemoryChatHistoryRepository,
    MockChatClient, Question, SubmitOutcome, FALLBACK_ERROR,
};

async fn spawn_server(state: AppState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, create_router(state))
            .await
            .expect("server");
    });
    format!("http://{}", addr)
}

fn memory_state() -> AppState {
    let repo = Arc::new(InMemoryChatHistoryRepository::new());
    AppState::new(
        AskQuestionUseCase::new(Arc::new(MockChatClient::new()), repo.clone()),
        ChatHistoryUseCase::new(repo),
    )
}

#[tokio::test(flavor = "multi_thread")]
async fn conversation_over_http_tracks_session() {
    let base = spawn_server(memory_state()).await;
    let api = Arc::new(HttpAccountabilityClient::new(base));
    let mut conversation = Conversation::new(api.clone());

    assert_eq!(conversation.submit("").await, SubmitOutcome::Skipped);
    assert_eq!(conversation.session_id(), None);

    assert_eq!(
        conversation.submit("How often did my MP attend sittings?").await,
        SubmitOutcome::Answered
    );
    let session = conversation.session_id().expect("session assigned");
    assert!(conversation
        .display()
        .expect("answer shown")
        .contains("How often did my MP attend sittings?"));

    conversation.submit("And last year?").await;
    assert_eq!(conversation.session_id(), Some(session));

    let history = api.chat_history().await.expect("history");
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].chats.len(), 1);
    assert_eq!(
        history[0].chats[0].question,
        "How often did my MP attend sittings?"
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn server_error_collapses_to_fixed_message() {
    let base = spawn_server(memory_state()).await;
    let api = Arc::new(HttpAccountabilityClient::new(base));
    let mut conversation = Conversation::new(api.clone()).resume(404);

    assert_eq!(conversation.submit("Is anyone there?").await, SubmitOutcome::Failed);
    assert_eq!(conversation.display(), Some(FALLBACK_ERROR));
    assert_eq!(conversation.session_id(), Some(404));

    let err = api
        .ask(&Question::new("direct").with_session(404))
        .await
        .expect_err("unknown session");
    assert!(err.is_upstream());
    assert!(err.to_string().contains("404"));
}

#[tokio::test(flavor = "multi_thread")]
async fn duckdb_backed_service_answers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let repo = Arc::new(
        DuckdbChatHistoryRepository::new(&dir.path().join("mheshimiwa.duckdb"))
            .expect("duckdb init"),
    );
    let state = AppState::new(
        AskQuestionUseCase::new(Arc::new(MockChatClient::new()), repo.clone()),
        ChatHistoryUseCase::new(repo),
    );
    let api = HttpAccountabilityClient::new(spawn_server(state).await);

    let answer = api
        .ask(&Question::new("Eldoret bypass progress"))
        .await
        .expect("answer");
    assert_eq!(answer.session_id, 1);

    let history = api.chat_history().await.expect("history");
    assert_eq!(history[0].chats[0].session_id, 1);
}
