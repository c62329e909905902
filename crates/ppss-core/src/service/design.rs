//! Design-generation service: concept images for a design prompt.

use std::sync::Arc;

use tracing::info;

use ppss_types::error::ServiceError;
use ppss_types::session::SessionKey;

use crate::gateway::box_gateway::BoxChatGateway;
use crate::repository::session::SessionRepository;
use crate::service::session::SessionService;

pub struct DesignService<S: SessionRepository> {
    sessions: SessionService<S>,
    gateway: Arc<BoxChatGateway>,
}

impl<S: SessionRepository> DesignService<S> {
    pub fn new(sessions: SessionService<S>, gateway: Arc<BoxChatGateway>) -> Self {
        Self { sessions, gateway }
    }

    /// Generate concept image URLs for `prompt` on behalf of `key`.
    #[tracing::instrument(skip(self, prompt), fields(session_id = %key))]
    pub async fn generate_images(
        &self,
        key: &SessionKey,
        prompt: &str,
    ) -> Result<Vec<String>, ServiceError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(ServiceError::Validation("prompt is required".to_string()));
        }

        self.sessions.load_or_create_key(key).await?;
        let images = self.gateway.generate_images(prompt).await?;
        info!(count = images.len(), "Design images generated");
        Ok(images)
    }
}
