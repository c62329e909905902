//! SQLite conversation repository.
//!
//! Each conversation is one row holding the whole message list as JSON,
//! keyed by `(scope, stage, session_id)`. Writes replace the document; there
//! is no optimistic concurrency check, so concurrent turns against the same
//! key resolve as last-writer-wins.

use chrono::Utc;
use sqlx::Row;

use ppss_core::repository::conversation::{ConversationRepository, ConversationScope};
use ppss_types::error::RepositoryError;
use ppss_types::message::Message;
use ppss_types::stage::{Stage, StageTranscriptEntry};

use super::{format_datetime, query_error};
use super::pool::DatabasePool;

const GLOBAL_SCOPE: &str = "global";
const STAGE_SCOPE: &str = "stage";

pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

/// Storage columns `(scope, stage, session_id)` for a scope.
fn scope_columns(scope: &ConversationScope) -> (&'static str, &'static str, String) {
    match scope {
        ConversationScope::Global(key) => (GLOBAL_SCOPE, "", key.to_string()),
        ConversationScope::Stage(stage, key) => (STAGE_SCOPE, stage.as_str(), key.to_string()),
    }
}

fn decode_messages(raw: &str) -> Result<Vec<Message>, RepositoryError> {
    serde_json::from_str(raw)
        .map_err(|e| RepositoryError::Query(format!("invalid messages JSON: {e}")))
}

impl ConversationRepository for SqliteConversationRepository {
    async fn read(&self, scope: &ConversationScope) -> Result<Vec<Message>, RepositoryError> {
        let (scope_col, stage_col, session_id) = scope_columns(scope);
        let row = sqlx::query(
            "SELECT messages FROM conversations WHERE scope = ? AND stage = ? AND session_id = ?",
        )
        .bind(scope_col)
        .bind(stage_col)
        .bind(session_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        match row {
            Some(row) => {
                let raw: String = row
                    .try_get("messages")
                    .map_err(query_error)?;
                decode_messages(&raw)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn write(
        &self,
        scope: &ConversationScope,
        messages: &[Message],
    ) -> Result<(), RepositoryError> {
        let (scope_col, stage_col, session_id) = scope_columns(scope);
        let body = serde_json::to_string(messages)
            .map_err(|e| RepositoryError::Query(format!("failed to encode messages: {e}")))?;
        let now = format_datetime(&Utc::now());

        sqlx::query(
            r#"INSERT INTO conversations (scope, stage, session_id, messages, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?)
               ON CONFLICT(scope, stage, session_id)
               DO UPDATE SET messages = excluded.messages, updated_at = excluded.updated_at"#,
        )
        .bind(scope_col)
        .bind(stage_col)
        .bind(session_id)
        .bind(body)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn stage_transcript(
        &self,
        stage: Stage,
    ) -> Result<Vec<StageTranscriptEntry>, RepositoryError> {
        let rows = sqlx::query(
            r#"SELECT session_id, messages FROM conversations
               WHERE scope = ? AND stage = ?
               ORDER BY created_at ASC, id ASC"#,
        )
        .bind(STAGE_SCOPE)
        .bind(stage.as_str())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut entries = Vec::new();
        for row in &rows {
            let session_id: String = row
                .try_get("session_id")
                .map_err(query_error)?;
            let raw: String = row
                .try_get("messages")
                .map_err(query_error)?;
            for message in decode_messages(&raw)? {
                entries.push(StageTranscriptEntry {
                    session_id: session_id.clone(),
                    role: message.role,
                    content: message.content,
                });
            }
        }

        Ok(entries)
    }

    async fn count_conversations(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM conversations")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use ppss_types::message::MessageRole;
    use ppss_types::session::SessionKey;

    fn key(user: &str, role: &str) -> SessionKey {
        SessionKey::new(user, role).unwrap()
    }

    #[tokio::test]
    async fn test_read_missing_is_empty() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let scope = ConversationScope::Global(key("u1", "Government"));
        assert!(repo.read(&scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_write_replaces_whole_document() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let scope = ConversationScope::Global(key("u1", "Government"));

        repo.write(&scope, &[Message::user("a"), Message::assistant("b")])
            .await
            .unwrap();
        let next = vec![
            Message::user("a"),
            Message::assistant("b"),
            Message::user("c"),
            Message::assistant(""),
        ];
        repo.write(&scope, &next).await.unwrap();

        assert_eq!(repo.read(&scope).await.unwrap(), next);
        assert_eq!(repo.count_conversations().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_scopes_are_isolated() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let k = key("u1", "Government");

        repo.write(&ConversationScope::Global(k.clone()), &[Message::user("global")])
            .await
            .unwrap();
        repo.write(
            &ConversationScope::Stage(Stage::ProblemDefinition, k.clone()),
            &[Message::user("problem")],
        )
        .await
        .unwrap();

        let global = repo.read(&ConversationScope::Global(k.clone())).await.unwrap();
        let problem = repo
            .read(&ConversationScope::Stage(Stage::ProblemDefinition, k.clone()))
            .await
            .unwrap();
        let analysis = repo
            .read(&ConversationScope::Stage(Stage::DataAnalysis, k))
            .await
            .unwrap();

        assert_eq!(global, vec![Message::user("global")]);
        assert_eq!(problem, vec![Message::user("problem")]);
        assert!(analysis.is_empty());
    }

    #[tokio::test]
    async fn test_stage_transcript_flattens_sessions_in_creation_order() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteConversationRepository::new(pool);

        repo.write(
            &ConversationScope::Stage(Stage::ProblemDefinition, key("u1", "Government")),
            &[Message::user("Roads flood"), Message::assistant("Noted")],
        )
        .await
        .unwrap();
        repo.write(
            &ConversationScope::Stage(Stage::ProblemDefinition, key("u2", "The Public")),
            &[Message::user("Buses are late")],
        )
        .await
        .unwrap();
        repo.write(
            &ConversationScope::Global(key("u3", "Business")),
            &[Message::user("not part of any stage")],
        )
        .await
        .unwrap();
        // Rewriting the first document does not move it behind the second.
        repo.write(
            &ConversationScope::Stage(Stage::ProblemDefinition, key("u1", "Government")),
            &[
                Message::user("Roads flood"),
                Message::assistant("Noted"),
                Message::user("Also potholes"),
            ],
        )
        .await
        .unwrap();

        let transcript = repo.stage_transcript(Stage::ProblemDefinition).await.unwrap();
        let lines: Vec<String> = transcript.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "[u1:Government] user: Roads flood",
                "[u1:Government] assistant: Noted",
                "[u1:Government] user: Also potholes",
                "[u2:The Public] user: Buses are late",
            ]
        );
        assert_eq!(transcript[1].role, MessageRole::Assistant);
        assert!(repo.stage_transcript(Stage::DesignGeneration).await.unwrap().is_empty());
    }
}
