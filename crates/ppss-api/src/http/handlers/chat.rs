//! Global conversation handlers.
//!
//! - GET  /api/chat/{session_id}
//! - POST /api/chat

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use ppss_core::repository::conversation::ConversationScope;
use ppss_core::service::chat::TurnOutcome;
use ppss_types::message::Message;

use super::{parse_session_id, present};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub conversation: Vec<Message>,
}

/// GET /api/chat/{session_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationResponse>, AppError> {
    let key = parse_session_id(&session_id)?;
    let conversation = state
        .chat
        .conversation(&ConversationScope::Global(key))
        .await
        .map_err(|e| AppError::from_service(e, "Failed to load conversation history"))?;

    Ok(Json(ConversationResponse { conversation }))
}

/// POST /api/chat
pub async fn post_chat(
    State(state): State<AppState>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<TurnOutcome>, AppError> {
    let Json(req) = payload?;
    let (Some(session_id), Some(message)) = (present(&req.session_id), present(&req.message))
    else {
        return Err(AppError::Validation(
            "sessionId and message are required".to_string(),
        ));
    };

    let key = parse_session_id(session_id)?;
    let outcome = state
        .chat
        .take_turn(&ConversationScope::Global(key), message)
        .await
        .map_err(|e| AppError::from_service(e, "Unable to reach the personalized agent pipeline"))?;

    Ok(Json(outcome))
}
