use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use crate::models::{AppState, ChatRequest, ChatResponse, TranscriptEntry};
use crate::session::MessageCounts;
use crate::types::{AppError, AppResult};
use tracing::info;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", get(get_transcript).post(post_chat))
        .route("/api/analytics", get(get_analytics))
        .with_state(state)
}

async fn get_transcript(State(state): State<AppState>) -> Json<Vec<TranscriptEntry>> {
    let session = state.session.lock().await;
    Json(session.turns().iter().map(TranscriptEntry::from).collect())
}

/// Same flow as the Chatbot page; failures come back as reply text.
pub async fn post_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    let message = request.message.trim();
    if message.is_empty() {
        return Err(AppError::InvalidRequest("message must not be empty".to_string()));
    }

    info!(message_len = message.len(), "Received chat request");

    let mut session = state.session.lock().await;
    let turn = state.agent.respond(&mut session, message).await;

    Ok(Json(ChatResponse::from(&turn)))
}

async fn get_analytics(State(state): State<AppState>) -> Json<MessageCounts> {
    Json(state.session.lock().await.counts())
}
