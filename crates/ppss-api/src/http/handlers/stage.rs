//! Stage-scoped conversation and summary handlers.
//!
//! - GET  /api/stage/{stage}/chat?sessionId=
//! - POST /api/stage/{stage}/chat
//! - POST /api/stage/{stage}/summary
//! - GET  /api/stage/{stage}/summary

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};

use ppss_core::repository::conversation::ConversationScope;
use ppss_types::gateway::GatewayReply;
use ppss_types::message::Message;
use ppss_types::stage::Stage;

use super::chat::ChatRequest;
use super::{parse_session_id, parse_stage, present};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionQuery {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageConversationResponse {
    pub conversation: Vec<Message>,
    pub summary: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTurnResponse {
    pub assistant_message: GatewayReply,
    pub conversation: Vec<Message>,
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

async fn latest_summary(state: &AppState, stage: Stage, context: &str) -> Result<String, AppError> {
    state
        .summaries
        .latest(stage)
        .await
        .map_err(|e| AppError::from_service(e, context))
}

/// GET /api/stage/{stage}/chat?sessionId=
pub async fn get_stage_chat(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<StageConversationResponse>, AppError> {
    let stage = parse_stage(&stage)?;
    let Query(query) = query?;
    let session_id = present(&query.session_id)
        .ok_or_else(|| AppError::Validation("sessionId is required".to_string()))?;
    let key = parse_session_id(session_id)?;

    let context = format!("Failed to load {stage} conversation");
    let conversation = state
        .chat
        .conversation(&ConversationScope::Stage(stage, key))
        .await
        .map_err(|e| AppError::from_service(e, &context))?;
    let summary = latest_summary(&state, stage, &context).await?;

    Ok(Json(StageConversationResponse {
        conversation,
        summary,
    }))
}

/// POST /api/stage/{stage}/chat
pub async fn post_stage_chat(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<StageTurnResponse>, AppError> {
    let stage = parse_stage(&stage)?;
    let Json(req) = payload?;
    let (Some(session_id), Some(message)) = (present(&req.session_id), present(&req.message))
    else {
        return Err(AppError::Validation(
            "sessionId and message are required".to_string(),
        ));
    };
    let key = parse_session_id(session_id)?;

    let context = format!("Unable to process the {stage} chat");
    let outcome = state
        .chat
        .take_turn(&ConversationScope::Stage(stage, key), message)
        .await
        .map_err(|e| AppError::from_service(e, &context))?;
    let summary = latest_summary(&state, stage, &context).await?;

    Ok(Json(StageTurnResponse {
        assistant_message: outcome.assistant_message,
        conversation: outcome.conversation,
        summary,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

/// POST /api/stage/{stage}/summary
///
/// Regenerates the cross-user summary for the stage and appends it.
pub async fn post_stage_summary(
    State(state): State<AppState>,
    Path(stage): Path<String>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, AppError> {
    let stage = parse_stage(&stage)?;
    let Json(req) = payload?;
    let session_id = present(&req.session_id)
        .ok_or_else(|| AppError::Validation("sessionId is required".to_string()))?;
    let key = parse_session_id(session_id)?;

    let context = format!("Unable to generate the {stage} summary");
    state
        .sessions
        .load_or_create_key(&key)
        .await
        .map_err(|e| AppError::from_service(e, &context))?;
    let record = state
        .summaries
        .generate(stage)
        .await
        .map_err(|e| AppError::from_service(e, &context))?;

    Ok(Json(SummaryResponse {
        summary: record.summary,
    }))
}

/// GET /api/stage/{stage}/summary
pub async fn get_stage_summary(
    State(state): State<AppState>,
    Path(stage): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let stage = parse_stage(&stage)?;
    let summary = latest_summary(&state, stage, &format!("Failed to load {stage} summary")).await?;
    Ok(Json(SummaryResponse { summary }))
}
