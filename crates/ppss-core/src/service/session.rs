//! Session service: load-or-create of personalized agent profiles.

use tracing::{debug, info};

use ppss_types::error::ServiceError;
use ppss_types::session::{AgentProfile, SessionKey};

use crate::prompt::system_prompt_for;
use crate::repository::session::SessionRepository;

/// Owns the agent profile lifecycle.
///
/// Generic over `SessionRepository` so ppss-core never depends on ppss-infra.
pub struct SessionService<R: SessionRepository> {
    repo: R,
}

impl<R: SessionRepository> SessionService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    /// Validate the identity fields and load or create the matching profile.
    pub async fn load_or_create(
        &self,
        user_id: &str,
        stakeholder_type: &str,
    ) -> Result<AgentProfile, ServiceError> {
        let key = SessionKey::new(user_id, stakeholder_type)?;
        self.load_or_create_key(&key).await
    }

    /// Return the profile stored under `key`, creating it on first use.
    ///
    /// Idempotent: an existing profile is returned unchanged, including its
    /// original system prompt and creation time.
    #[tracing::instrument(skip(self), fields(session_id = %key))]
    pub async fn load_or_create_key(&self, key: &SessionKey) -> Result<AgentProfile, ServiceError> {
        if let Some(existing) = self.repo.get_profile(key).await? {
            debug!("Loaded existing agent profile");
            return Ok(existing);
        }

        let profile = AgentProfile::new(key.clone(), system_prompt_for(key.stakeholder_type()));
        let stored = self.repo.insert_profile(&profile).await?;
        info!(stakeholder_type = %stored.stakeholder_type, "Agent profile created");
        Ok(stored)
    }
}
