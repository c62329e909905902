//! Login: load or create the personalized agent for a user and role.
//!
//! - POST /api/login

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use ppss_core::repository::conversation::ConversationScope;
use ppss_types::message::Message;
use ppss_types::session::AgentProfile;

use super::present;
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default, alias = "user_id")]
    pub user_id: Option<String>,
    #[serde(default, alias = "stakeholder_type")]
    pub stakeholder_type: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_id: String,
    pub system_prompt: String,
    pub agent_profile: AgentProfile,
    pub conversation: Vec<Message>,
}

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    let (Some(user_id), Some(stakeholder_type)) =
        (present(&req.user_id), present(&req.stakeholder_type))
    else {
        return Err(AppError::Validation(
            "userId and stakeholderType are required".to_string(),
        ));
    };

    const CONTEXT: &str = "Failed to load personalized agent profile";
    let profile = state
        .sessions
        .load_or_create(user_id, stakeholder_type)
        .await
        .map_err(|e| AppError::from_service(e, CONTEXT))?;
    let conversation = state
        .chat
        .conversation(&ConversationScope::Global(profile.session_id.clone()))
        .await
        .map_err(|e| AppError::from_service(e, CONTEXT))?;

    Ok(Json(LoginResponse {
        session_id: profile.session_id.to_string(),
        system_prompt: profile.system_prompt.clone(),
        agent_profile: profile,
        conversation,
    }))
}
