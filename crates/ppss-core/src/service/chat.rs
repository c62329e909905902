//! Chat service: the conversation turn algorithm.
//!
//! Used identically for the global chat and for per-stage chats:
//! load-or-create profile -> read prior conversation -> call the gateway with
//! `[system] + prior + [user]` -> append user/assistant pair -> persist.
//! A gateway failure aborts the turn before anything is written.

use std::sync::Arc;

use serde::Serialize;
use tracing::warn;

use ppss_types::error::ServiceError;
use ppss_types::gateway::GatewayReply;
use ppss_types::message::Message;

use crate::gateway::box_gateway::BoxChatGateway;
use crate::repository::conversation::{ConversationRepository, ConversationScope};
use crate::repository::session::SessionRepository;
use crate::service::session::SessionService;

/// Result of a completed turn.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnOutcome {
    pub assistant_message: GatewayReply,
    pub conversation: Vec<Message>,
}

pub struct ChatService<S: SessionRepository, C: ConversationRepository> {
    sessions: SessionService<S>,
    conversations: C,
    gateway: Arc<BoxChatGateway>,
}

impl<S: SessionRepository, C: ConversationRepository> ChatService<S, C> {
    pub fn new(sessions: SessionService<S>, conversations: C, gateway: Arc<BoxChatGateway>) -> Self {
        Self {
            sessions,
            conversations,
            gateway,
        }
    }

    pub fn conversations(&self) -> &C {
        &self.conversations
    }

    /// Stored conversation for `scope` (empty if never written).
    pub async fn conversation(&self, scope: &ConversationScope) -> Result<Vec<Message>, ServiceError> {
        Ok(self.conversations.read(scope).await?)
    }

    /// Run one user turn against `scope` and persist the result.
    #[tracing::instrument(
        skip(self, message),
        fields(session_id = %scope.session_key(), stage = ?scope.stage())
    )]
    pub async fn take_turn(
        &self,
        scope: &ConversationScope,
        message: &str,
    ) -> Result<TurnOutcome, ServiceError> {
        if message.trim().is_empty() {
            return Err(ServiceError::Validation("message is required".to_string()));
        }

        let profile = self.sessions.load_or_create_key(scope.session_key()).await?;
        let prior = self.conversations.read(scope).await?;

        let mut request = Vec::with_capacity(prior.len() + 2);
        request.push(Message::system(profile.system_prompt.as_str()));
        request.extend(prior.iter().cloned());
        request.push(Message::user(message));

        let reply = self.gateway.send(&request).await.map_err(|e| {
            warn!(error = %e, "Gateway call failed, turn aborted");
            e
        })?;

        let mut next = prior;
        next.push(Message::user(message));
        next.push(Message::assistant(reply.content.as_str()));
        self.conversations.write(scope, &next).await?;

        Ok(TurnOutcome {
            assistant_message: reply,
            conversation: next,
        })
    }
}
