//! AnalysisRepository trait definition.

use ppss_types::analysis::AnalysisQuery;
use ppss_types::error::RepositoryError;

/// Append-only log of answered analysis questions.
pub trait AnalysisRepository: Send + Sync {
    fn record(
        &self,
        query: &AnalysisQuery,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Logged queries for a session, oldest first.
    fn list_for_session(
        &self,
        session_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<AnalysisQuery>, RepositoryError>> + Send;
}
