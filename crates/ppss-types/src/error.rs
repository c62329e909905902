use thiserror::Error;

use crate::gateway::GatewayError;
use crate::stage::Stage;

/// Errors from parsing or building a [`crate::session::SessionKey`].
#[derive(Debug, Error)]
pub enum SessionKeyError {
    #[error("{0} is required")]
    Empty(&'static str),

    #[error("{field} must not contain ':' (got '{value}')")]
    ContainsSeparator { field: &'static str, value: String },

    #[error("malformed session id '{0}': expected userId:stakeholderType")]
    Malformed(String),
}

/// Errors from repository operations (used by trait definitions in ppss-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("conflict: {0}")]
    Conflict(String),
}

/// Errors surfaced by the orchestration services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A required field is missing or malformed. No state was changed.
    #[error("{0}")]
    Validation(String),

    /// Summarizing a stage that has no stored conversations yet.
    #[error("No {0} chats available to summarize yet.")]
    NothingToSummarize(Stage),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

impl From<SessionKeyError> for ServiceError {
    fn from(e: SessionKeyError) -> Self {
        ServiceError::Validation(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_error_display() {
        let err = RepositoryError::Query("syntax error".to_string());
        assert_eq!(err.to_string(), "query error: syntax error");
    }

    #[test]
    fn test_nothing_to_summarize_display() {
        let err = ServiceError::NothingToSummarize(Stage::ProblemDefinition);
        assert_eq!(
            err.to_string(),
            "No problem-definition chats available to summarize yet."
        );
    }

    #[test]
    fn test_session_key_error_becomes_validation() {
        let err: ServiceError = SessionKeyError::Empty("userId").into();
        assert!(matches!(err, ServiceError::Validation(ref m) if m == "userId is required"));
    }
}
