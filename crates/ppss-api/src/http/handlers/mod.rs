//! HTTP request handlers.

pub mod analysis;
pub mod chat;
pub mod design;
pub mod login;
pub mod stage;

use ppss_types::session::SessionKey;
use ppss_types::stage::Stage;

use crate::http::error::AppError;

/// Non-blank value of an optional request field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Parse a `userId:stakeholderType` session id, or 400.
pub(crate) fn parse_session_id(raw: &str) -> Result<SessionKey, AppError> {
    Ok(raw.parse::<SessionKey>()?)
}

/// Resolve a stage path segment, or 404.
pub(crate) fn parse_stage(raw: &str) -> Result<Stage, AppError> {
    raw.parse::<Stage>().map_err(AppError::NotFound)
}
