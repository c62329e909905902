//! SessionRepository trait definition.

use ppss_types::error::RepositoryError;
use ppss_types::session::{AgentProfile, SessionKey};

/// Repository trait for agent profile persistence.
pub trait SessionRepository: Send + Sync {
    /// Get the profile stored under `key`, if any.
    fn get_profile(
        &self,
        key: &SessionKey,
    ) -> impl std::future::Future<Output = Result<Option<AgentProfile>, RepositoryError>> + Send;

    /// Insert `profile` unless one already exists under its key.
    ///
    /// Returns the stored profile: the existing one if present (its fields
    /// are never overwritten), otherwise `profile` itself.
    fn insert_profile(
        &self,
        profile: &AgentProfile,
    ) -> impl std::future::Future<Output = Result<AgentProfile, RepositoryError>> + Send;

    /// Count stored profiles.
    fn count_profiles(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
