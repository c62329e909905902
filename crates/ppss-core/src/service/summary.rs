//! Stage summary service.
//!
//! Flattens every session's conversation for a stage into one annotated
//! transcript, asks the gateway for a summary, and appends the result to the
//! stage's summary log.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use ppss_types::error::ServiceError;
use ppss_types::message::Message;
use ppss_types::stage::{Stage, StageSummary};

use crate::gateway::box_gateway::BoxChatGateway;
use crate::prompt::{summarizer_system_prompt, summary_request};
use crate::repository::conversation::ConversationRepository;
use crate::repository::summary::StageSummaryRepository;

pub struct StageSummaryService<C: ConversationRepository, R: StageSummaryRepository> {
    conversations: C,
    summaries: R,
    gateway: Arc<BoxChatGateway>,
}

impl<C: ConversationRepository, R: StageSummaryRepository> StageSummaryService<C, R> {
    pub fn new(conversations: C, summaries: R, gateway: Arc<BoxChatGateway>) -> Self {
        Self {
            conversations,
            summaries,
            gateway,
        }
    }

    /// Generate and append a fresh summary for `stage`.
    ///
    /// Fails with [`ServiceError::NothingToSummarize`] (without calling the
    /// gateway) when the stage has no stored messages.
    #[tracing::instrument(skip(self), fields(stage = %stage))]
    pub async fn generate(&self, stage: Stage) -> Result<StageSummary, ServiceError> {
        let transcript = self.conversations.stage_transcript(stage).await?;
        if transcript.is_empty() {
            return Err(ServiceError::NothingToSummarize(stage));
        }

        let request = vec![
            Message::system(summarizer_system_prompt(stage)),
            Message::user(summary_request(stage, &transcript)),
        ];
        let reply = self.gateway.send(&request).await?;

        let record = StageSummary {
            stage,
            summary: reply.content,
            created_at: Utc::now(),
        };
        self.summaries.append(&record).await?;
        info!(lines = transcript.len(), "Stage summary appended");
        Ok(record)
    }

    /// Latest summary text for `stage`, or an empty string if none exists.
    pub async fn latest(&self, stage: Stage) -> Result<String, ServiceError> {
        Ok(self
            .summaries
            .latest(stage)
            .await?
            .map(|s| s.summary)
            .unwrap_or_default())
    }

    /// Latest summary record for `stage`, if any.
    pub async fn latest_record(&self, stage: Stage) -> Result<Option<StageSummary>, ServiceError> {
        Ok(self.summaries.latest(stage).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::conversation::ConversationScope;
    use crate::test_support::{MemoryConversations, MemorySummaries, ScriptedGateway, key};

    fn service(
        conversations: MemoryConversations,
        summaries: MemorySummaries,
        gateway: ScriptedGateway,
    ) -> StageSummaryService<MemoryConversations, MemorySummaries> {
        StageSummaryService::new(conversations, summaries, Arc::new(BoxChatGateway::new(gateway)))
    }

    #[tokio::test]
    async fn test_empty_stage_fails_without_gateway_call() {
        let summaries = MemorySummaries::default();
        let gateway = ScriptedGateway::new();
        let service = service(MemoryConversations::default(), summaries.clone(), gateway.clone());

        let err = service.generate(Stage::ProblemDefinition).await.unwrap_err();

        assert!(matches!(err, ServiceError::NothingToSummarize(Stage::ProblemDefinition)));
        assert_eq!(gateway.request_count(), 0);
        assert!(summaries.log.lock().unwrap().is_empty());
        assert_eq!(service.latest(Stage::ProblemDefinition).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_global_chat_is_not_summarized() {
        let conversations = MemoryConversations::default();
        conversations
            .write(
                &ConversationScope::Global(key("u1", "Government")),
                &[Message::user("hi"), Message::assistant("hello")],
            )
            .await
            .unwrap();
        let service = service(conversations, MemorySummaries::default(), ScriptedGateway::new());

        let err = service.generate(Stage::ProblemDefinition).await.unwrap_err();
        assert!(matches!(err, ServiceError::NothingToSummarize(_)));
    }

    #[tokio::test]
    async fn test_generate_appends_one_record_and_latest_returns_it() {
        let conversations = MemoryConversations::default();
        conversations
            .write(
                &ConversationScope::Stage(Stage::ProblemDefinition, key("u1", "Government")),
                &[Message::user("Roads flood"), Message::assistant("Noted")],
            )
            .await
            .unwrap();
        conversations
            .write(
                &ConversationScope::Stage(Stage::ProblemDefinition, key("u2", "The Public")),
                &[Message::user("Buses are late"), Message::assistant("Understood")],
            )
            .await
            .unwrap();

        let summaries = MemorySummaries::default();
        let gateway = ScriptedGateway::new().then_reply("- flooding\n- bus delays");
        let service = service(conversations, summaries.clone(), gateway.clone());

        let record = service.generate(Stage::ProblemDefinition).await.unwrap();

        assert_eq!(record.summary, "- flooding\n- bus delays");
        assert_eq!(summaries.log.lock().unwrap().len(), 1);
        assert_eq!(
            service.latest(Stage::ProblemDefinition).await.unwrap(),
            "- flooding\n- bus delays"
        );

        let request = gateway.last_request();
        assert_eq!(request.len(), 2);
        assert!(request[0].content.starts_with("You are chat_summary_agent."));
        assert!(request[1].content.contains("[u1:Government] user: Roads flood"));
        assert!(request[1].content.contains("[u2:The Public] assistant: Understood"));
        let first = request[1].content.find("[u1:Government]").unwrap();
        let second = request[1].content.find("[u2:The Public]").unwrap();
        assert!(first < second);
    }

    #[tokio::test]
    async fn test_regeneration_keeps_prior_records() {
        let conversations = MemoryConversations::default();
        conversations
            .write(
                &ConversationScope::Stage(Stage::ProblemDefinition, key("u1", "Government")),
                &[Message::user("a"), Message::assistant("b")],
            )
            .await
            .unwrap();
        let summaries = MemorySummaries::default();
        let gateway = ScriptedGateway::new().then_reply("first").then_reply("second");
        let service = service(conversations, summaries.clone(), gateway);

        service.generate(Stage::ProblemDefinition).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        service.generate(Stage::ProblemDefinition).await.unwrap();

        let log = summaries.log.lock().unwrap().clone();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].summary, "first");
        assert_eq!(service.latest(Stage::ProblemDefinition).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn test_gateway_failure_appends_nothing() {
        let conversations = MemoryConversations::default();
        conversations
            .write(
                &ConversationScope::Stage(Stage::DataAnalysis, key("u1", "Government")),
                &[Message::user("a"), Message::assistant("b")],
            )
            .await
            .unwrap();
        let summaries = MemorySummaries::default();
        let service = service(
            conversations,
            summaries.clone(),
            ScriptedGateway::new().then_fail("boom"),
        );

        let err = service.generate(Stage::DataAnalysis).await.unwrap_err();
        assert!(matches!(err, ServiceError::Gateway(_)));
        assert!(summaries.log.lock().unwrap().is_empty());
    }
}
