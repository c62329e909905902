//! Data-analysis handlers.
//!
//! - POST /api/analysis/query
//! - GET  /api/analysis/queries?sessionId=

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use ppss_core::service::analysis::AnalysisOutcome;
use ppss_types::analysis::{AnalysisQuery, ContextDoc};

use super::stage::SessionQuery;
use super::{parse_session_id, present};
use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
    #[serde(default, alias = "user_question")]
    pub user_question: Option<String>,
    #[serde(default, alias = "context_docs")]
    pub context_docs: Vec<ContextDoc>,
}

#[derive(Debug, Serialize)]
pub struct QueriesResponse {
    pub queries: Vec<AnalysisQuery>,
}

/// POST /api/analysis/query
pub async fn post_query(
    State(state): State<AppState>,
    payload: Result<Json<AnalysisRequest>, JsonRejection>,
) -> Result<Json<AnalysisOutcome>, AppError> {
    let Json(req) = payload?;
    let (Some(session_id), Some(question)) =
        (present(&req.session_id), present(&req.user_question))
    else {
        return Err(AppError::Validation(
            "sessionId and userQuestion are required".to_string(),
        ));
    };
    let key = parse_session_id(session_id)?;

    let outcome = state
        .analysis
        .query(&key, question, req.context_docs)
        .await
        .map_err(|e| AppError::from_service(e, "Unable to process the analysis query"))?;

    Ok(Json(outcome))
}

/// GET /api/analysis/queries?sessionId=
pub async fn list_queries(
    State(state): State<AppState>,
    query: Result<Query<SessionQuery>, QueryRejection>,
) -> Result<Json<QueriesResponse>, AppError> {
    let Query(query) = query?;
    let session_id = present(&query.session_id)
        .ok_or_else(|| AppError::Validation("sessionId is required".to_string()))?;
    let key = parse_session_id(session_id)?;

    let queries = state
        .analysis
        .queries_for(&key)
        .await
        .map_err(|e| AppError::from_service(e, "Failed to load analysis queries"))?;

    Ok(Json(QueriesResponse { queries }))
}
