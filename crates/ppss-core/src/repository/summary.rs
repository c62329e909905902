//! StageSummaryRepository trait definition.

use ppss_types::error::RepositoryError;
use ppss_types::stage::{Stage, StageSummary};

/// Append-only log of generated stage summaries.
pub trait StageSummaryRepository: Send + Sync {
    /// Append a new summary record. Prior records are never touched.
    fn append(
        &self,
        summary: &StageSummary,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// The most recently created summary for `stage`.
    fn latest(
        &self,
        stage: Stage,
    ) -> impl std::future::Future<Output = Result<Option<StageSummary>, RepositoryError>> + Send;
}
