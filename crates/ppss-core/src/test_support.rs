//! In-memory repositories and scripted gateways shared by service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use ppss_types::analysis::AnalysisQuery;
use ppss_types::error::RepositoryError;
use ppss_types::gateway::{GatewayError, GatewayReply};
use ppss_types::message::Message;
use ppss_types::session::{AgentProfile, SessionKey};
use ppss_types::stage::{Stage, StageSummary, StageTranscriptEntry};

use crate::gateway::provider::ChatGateway;
use crate::repository::analysis::AnalysisRepository;
use crate::repository::conversation::{ConversationRepository, ConversationScope};
use crate::repository::session::SessionRepository;
use crate::repository::summary::StageSummaryRepository;

#[derive(Clone, Default)]
pub struct MemorySessions {
    pub profiles: Arc<Mutex<HashMap<SessionKey, AgentProfile>>>,
}

impl SessionRepository for MemorySessions {
    async fn get_profile(&self, key: &SessionKey) -> Result<Option<AgentProfile>, RepositoryError> {
        Ok(self.profiles.lock().unwrap().get(key).cloned())
    }

    async fn insert_profile(&self, profile: &AgentProfile) -> Result<AgentProfile, RepositoryError> {
        let mut profiles = self.profiles.lock().unwrap();
        Ok(profiles
            .entry(profile.session_id.clone())
            .or_insert_with(|| profile.clone())
            .clone())
    }

    async fn count_profiles(&self) -> Result<u64, RepositoryError> {
        Ok(self.profiles.lock().unwrap().len() as u64)
    }
}

/// Conversations kept in insertion order so stage transcripts are deterministic.
#[derive(Clone, Default)]
pub struct MemoryConversations {
    pub docs: Arc<Mutex<Vec<(ConversationScope, Vec<Message>)>>>,
    pub fail_writes: Arc<Mutex<bool>>,
}

impl ConversationRepository for MemoryConversations {
    async fn read(&self, scope: &ConversationScope) -> Result<Vec<Message>, RepositoryError> {
        Ok(self
            .docs
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| s == scope)
            .map(|(_, m)| m.clone())
            .unwrap_or_default())
    }

    async fn write(
        &self,
        scope: &ConversationScope,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        if *self.fail_writes.lock().unwrap() {
            return Err(RepositoryError::Connection);
        }
        let mut docs = self.docs.lock().unwrap();
        match docs.iter_mut().find(|(s, _)| s == scope) {
            Some((_, stored)) => *stored = messages.to_vec(),
            None => docs.push((scope.clone(), messages.to_vec())),
        }
        Ok(())
    }

    async fn stage_transcript(
        &self,
        stage: Stage,
    ) -> Result<Vec<StageTranscriptEntry>, RepositoryError> {
        let docs = self.docs.lock().unwrap();
        let mut entries = Vec::new();
        for (scope, messages) in docs.iter() {
            if scope.stage() != Some(stage) {
                continue;
            }
            for m in messages {
                entries.push(StageTranscriptEntry {
                    session_id: scope.session_key().to_string(),
                    role: m.role,
                    content: m.content.clone(),
                });
            }
        }
        Ok(entries)
    }

    async fn count_conversations(&self) -> Result<u64, RepositoryError> {
        Ok(self.docs.lock().unwrap().len() as u64)
    }
}

#[derive(Clone, Default)]
pub struct MemorySummaries {
    pub log: Arc<Mutex<Vec<StageSummary>>>,
}

impl StageSummaryRepository for MemorySummaries {
    async fn append(&self, summary: &StageSummary) -> Result<(), RepositoryError> {
        self.log.lock().unwrap().push(summary.clone());
        Ok(())
    }

    async fn latest(&self, stage: Stage) -> Result<Option<StageSummary>, RepositoryError> {
        Ok(self
            .log
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.stage == stage)
            .max_by_key(|s| s.created_at)
            .cloned())
    }
}

#[derive(Clone, Default)]
pub struct MemoryAnalyses {
    pub log: Arc<Mutex<Vec<AnalysisQuery>>>,
}

impl AnalysisRepository for MemoryAnalyses {
    async fn record(&self, query: &AnalysisQuery) -> Result<(), RepositoryError> {
        self.log.lock().unwrap().push(query.clone());
        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<AnalysisQuery>, RepositoryError> {
        Ok(self
            .log
            .lock()
            .unwrap()
            .iter()
            .filter(|q| q.session_id == session_id)
            .cloned()
            .collect())
    }
}

/// Gateway that replays scripted outcomes and records every request.
///
/// Once the script runs out it echoes the last user message back.
#[derive(Clone, Default)]
pub struct ScriptedGateway {
    pub script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    pub requests: Arc<Mutex<Vec<Vec<Message>>>>,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_reply(self, content: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(content.to_string()));
        self
    }

    pub fn then_fail(self, message: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(message.to_string()));
        self
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Vec<Message> {
        self.requests.lock().unwrap().last().cloned().unwrap_or_default()
    }
}

impl ChatGateway for ScriptedGateway {
    fn name(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }

    async fn send(&self, messages: &[Message]) -> Result<GatewayReply, GatewayError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(content)) => Ok(GatewayReply { content }),
            Some(Err(message)) => Err(GatewayError::Provider { message }),
            None => Ok(GatewayReply {
                content: messages
                    .last()
                    .map(|m| format!("echo: {}", m.content))
                    .unwrap_or_default(),
            }),
        }
    }

    async fn generate_images(&self, prompt: &str) -> Result<Vec<String>, GatewayError> {
        Ok(vec![format!("https://images.test/{}", prompt.len())])
    }
}

pub fn key(user: &str, role: &str) -> SessionKey {
    SessionKey::new(user, role).unwrap()
}
