//! SQLite analysis query log.

use sqlx::Row;
use uuid::Uuid;

use ppss_core::repository::analysis::AnalysisRepository;
use ppss_types::analysis::{AnalysisQuery, ContextDoc};
use ppss_types::error::RepositoryError;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteAnalysisRepository {
    pool: DatabasePool,
}

impl SqliteAnalysisRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AnalysisQueryRow {
    id: String,
    session_id: String,
    user_question: String,
    context_docs: String,
    response: String,
    created_at: String,
}

impl AnalysisQueryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            session_id: row.try_get("session_id")?,
            user_question: row.try_get("user_question")?,
            context_docs: row.try_get("context_docs")?,
            response: row.try_get("response")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_query(self) -> Result<AnalysisQuery, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid query id: {e}")))?;
        let context_docs: Vec<ContextDoc> = serde_json::from_str(&self.context_docs)
            .map_err(|e| RepositoryError::Query(format!("invalid context_docs JSON: {e}")))?;

        Ok(AnalysisQuery {
            id,
            session_id: self.session_id,
            user_question: self.user_question,
            context_docs,
            response: self.response,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl AnalysisRepository for SqliteAnalysisRepository {
    async fn record(&self, query: &AnalysisQuery) -> Result<(), RepositoryError> {
        let docs = serde_json::to_string(&query.context_docs)
            .map_err(|e| RepositoryError::Query(format!("failed to encode context_docs: {e}")))?;

        sqlx::query(
            r#"INSERT INTO analysis_queries (id, session_id, user_question, context_docs, response, created_at)
               VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(query.id.to_string())
        .bind(&query.session_id)
        .bind(&query.user_question)
        .bind(docs)
        .bind(&query.response)
        .bind(format_datetime(&query.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                RepositoryError::Conflict(format!("analysis query {} already recorded", query.id))
            }
            other => query_error(other),
        })?;

        Ok(())
    }

    async fn list_for_session(&self, session_id: &str) -> Result<Vec<AnalysisQuery>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM analysis_queries WHERE session_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(session_id)
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let mut queries = Vec::with_capacity(rows.len());
        for row in &rows {
            let query_row = AnalysisQueryRow::from_row(row)
                .map_err(query_error)?;
            queries.push(query_row.into_query()?);
        }
        Ok(queries)
    }
}
