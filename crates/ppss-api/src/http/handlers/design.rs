//! Design-generation handler.
//!
//! - POST /api/design/images

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use super::{parse_session_id, present};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesRequest {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImagesResponse {
    pub images: Vec<String>,
}

/// POST /api/design/images
pub async fn post_images(
    State(state): State<AppState>,
    payload: Result<Json<ImagesRequest>, JsonRejection>,
) -> Result<Json<ImagesResponse>, AppError> {
    let Json(req) = payload?;
    let (Some(session_id), Some(prompt)) = (present(&req.session_id), present(&req.prompt)) else {
        return Err(AppError::Validation(
            "sessionId and prompt are required".to_string(),
        ));
    };
    let key = parse_session_id(session_id)?;

    let images = state
        .design
        .generate_images(&key, prompt)
        .await
        .map_err(|e| AppError::from_service(e, "Unable to generate design images"))?;

    Ok(Json(ImagesResponse { images }))
}
