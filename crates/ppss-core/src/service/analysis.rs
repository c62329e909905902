//! Data-analysis service: one-shot multimodal questions grounded in
//! caller-supplied context documents.
//!
//! Questions never touch the stored conversation. Each answered question is
//! appended to the analysis log for later review.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use ppss_types::analysis::{AnalysisQuery, ContextDoc};
use ppss_types::error::ServiceError;
use ppss_types::message::Message;
use ppss_types::session::SessionKey;

use crate::gateway::box_gateway::BoxChatGateway;
use crate::prompt::{analysis_parts, analysis_system_prompt};
use crate::repository::analysis::AnalysisRepository;
use crate::repository::session::SessionRepository;
use crate::service::session::SessionService;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub answer: String,
    pub query: AnalysisQuery,
}

pub struct AnalysisService<S: SessionRepository, A: AnalysisRepository> {
    sessions: SessionService<S>,
    log: A,
    gateway: Arc<BoxChatGateway>,
}

impl<S: SessionRepository, A: AnalysisRepository> AnalysisService<S, A> {
    pub fn new(sessions: SessionService<S>, log: A, gateway: Arc<BoxChatGateway>) -> Self {
        Self {
            sessions,
            log,
            gateway,
        }
    }

    #[tracing::instrument(skip(self, question, context_docs), fields(session_id = %key, docs = context_docs.len()))]
    pub async fn query(
        &self,
        key: &SessionKey,
        question: &str,
        context_docs: Vec<ContextDoc>,
    ) -> Result<AnalysisOutcome, ServiceError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ServiceError::Validation("userQuestion is required".to_string()));
        }

        let profile = self.sessions.load_or_create_key(key).await?;
        let request = vec![
            Message::system(analysis_system_prompt(&profile.system_prompt)),
            Message::user_parts(analysis_parts(question, &context_docs)),
        ];
        let reply = self.gateway.send(&request).await?;

        let query = AnalysisQuery {
            id: Uuid::now_v7(),
            session_id: key.to_string(),
            user_question: question.to_string(),
            context_docs,
            response: reply.content.clone(),
            created_at: Utc::now(),
        };
        self.log.record(&query).await?;
        info!(query_id = %query.id, "Analysis question answered");

        Ok(AnalysisOutcome {
            answer: reply.content,
            query,
        })
    }

    /// Previously answered questions for `key`, oldest first.
    pub async fn queries_for(&self, key: &SessionKey) -> Result<Vec<AnalysisQuery>, ServiceError> {
        Ok(self.log.list_for_session(&key.to_string()).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{MemoryAnalyses, MemorySessions, ScriptedGateway, key};
    use ppss_types::message::{ContentPart, MessageRole};

    fn service(
        gateway: ScriptedGateway,
    ) -> (AnalysisService<MemorySessions, MemoryAnalyses>, MemoryAnalyses) {
        let log = MemoryAnalyses::default();
        let service = AnalysisService::new(
            SessionService::new(MemorySessions::default()),
            log.clone(),
            Arc::new(BoxChatGateway::new(gateway)),
        );
        (service, log)
    }

    #[tokio::test]
    async fn test_query_sends_multimodal_request_and_logs_it() {
        let gateway = ScriptedGateway::new().then_reply("- Case 3 shows flooding");
        let (service, log) = service(gateway.clone());
        let k = key("u1", "Government");
        let docs = vec![ContextDoc {
            title: Some("Case 3".to_string()),
            text: Some("Street flooding".to_string()),
            image: Some("data:image/png;base64,AAAA".to_string()),
        }];

        let outcome = service.query(&k, "Where?", docs.clone()).await.unwrap();

        assert_eq!(outcome.answer, "- Case 3 shows flooding");
        let request = gateway.last_request();
        assert_eq!(request[0].role, MessageRole::System);
        assert!(request[0].content.ends_with("citing the case numbers when relevant."));
        assert_eq!(request[1].role, MessageRole::User);
        assert_eq!(request[1].parts.len(), 4);
        assert!(matches!(request[1].parts[3], ContentPart::ImageUrl { .. }));

        let logged = log.log.lock().unwrap().clone();
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].session_id, "u1:Government");
        assert_eq!(logged[0].context_docs, docs);
        assert_eq!(service.queries_for(&k).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_question_rejected() {
        let gateway = ScriptedGateway::new();
        let (service, log) = service(gateway.clone());
        let err = service
            .query(&key("u1", "Government"), " ", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert_eq!(gateway.request_count(), 0);
        assert!(log.log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_gateway_failure_logs_nothing() {
        let (service, log) = service(ScriptedGateway::new().then_fail("down"));
        let err = service
            .query(&key("u1", "Government"), "Why?", Vec::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(_)));
        assert!(log.log.lock().unwrap().is_empty());
    }
}
