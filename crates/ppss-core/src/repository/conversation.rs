//! ConversationRepository trait definition and conversation addressing.

use ppss_types::error::RepositoryError;
use ppss_types::message::Message;
use ppss_types::session::SessionKey;
use ppss_types::stage::{Stage, StageTranscriptEntry};

/// Where a conversation lives: the session's global chat, or one stage's chat.
///
/// Scopes for the same session never share storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationScope {
    Global(SessionKey),
    Stage(Stage, SessionKey),
}

impl ConversationScope {
    pub fn session_key(&self) -> &SessionKey {
        match self {
            ConversationScope::Global(key) | ConversationScope::Stage(_, key) => key,
        }
    }

    pub fn stage(&self) -> Option<Stage> {
        match self {
            ConversationScope::Global(_) => None,
            ConversationScope::Stage(stage, _) => Some(*stage),
        }
    }
}

/// Repository trait for whole-document conversation persistence.
///
/// `write` replaces the entire stored sequence; concurrent writers to the
/// same scope are last-write-wins.
pub trait ConversationRepository: Send + Sync {
    /// Read the conversation for `scope`. Unseen scopes yield an empty list.
    fn read(
        &self,
        scope: &ConversationScope,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Replace the stored conversation for `scope` with `messages`.
    fn write(
        &self,
        scope: &ConversationScope,
        messages: &[Message],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Every stored message of every session's conversation in `stage`,
    /// conversations in creation order, messages in conversation order.
    fn stage_transcript(
        &self,
        stage: Stage,
    ) -> impl std::future::Future<Output = Result<Vec<StageTranscriptEntry>, RepositoryError>> + Send;

    /// Count stored conversations across all scopes.
    fn count_conversations(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, RepositoryError>> + Send;
}
