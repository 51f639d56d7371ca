use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde_json::{json, Value};

use crate::domain::{Answer, ChatHistoryGroup, Question};

use super::error::ApiError;
use super::state::AppState;

/// `POST /ask`
pub async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<Question>, JsonRejection>,
) -> Result<Json<Answer>, ApiError> {
    let Json(question) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let answer = state.ask.execute(question).await?;
    Ok(Json(answer))
}

/// `GET /chat-history`
pub async fn chat_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatHistoryGroup>>, ApiError> {
    Ok(Json(state.history.execute().await?))
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
