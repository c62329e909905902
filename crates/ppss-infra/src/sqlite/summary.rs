//! SQLite stage summary log.

use sqlx::Row;

use ppss_core::repository::summary::StageSummaryRepository;
use ppss_types::error::RepositoryError;
use ppss_types::stage::{Stage, StageSummary};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteStageSummaryRepository {
    pool: DatabasePool,
}

impl SqliteStageSummaryRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

impl StageSummaryRepository for SqliteStageSummaryRepository {
    async fn append(&self, summary: &StageSummary) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO stage_summaries (stage, summary, created_at) VALUES (?, ?, ?)")
            .bind(summary.stage.as_str())
            .bind(&summary.summary)
            .bind(format_datetime(&summary.created_at))
            .execute(&self.pool.writer)
            .await
            .map_err(query_error)?;
        Ok(())
    }

    async fn latest(&self, stage: Stage) -> Result<Option<StageSummary>, RepositoryError> {
        let row = sqlx::query(
            r#"SELECT summary, created_at FROM stage_summaries
               WHERE stage = ?
               ORDER BY created_at DESC, id DESC
               LIMIT 1"#,
        )
        .bind(stage.as_str())
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(query_error)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let summary: String = row
            .try_get("summary")
            .map_err(query_error)?;
        let created_at: String = row
            .try_get("created_at")
            .map_err(query_error)?;

        Ok(Some(StageSummary {
            stage,
            summary,
            created_at: parse_datetime(&created_at)?,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::test_pool;
    use chrono::{Duration, Utc};

    fn record(stage: Stage, text: &str, age_secs: i64) -> StageSummary {
        StageSummary {
            stage,
            summary: text.to_string(),
            created_at: Utc::now() - Duration::seconds(age_secs),
        }
    }

    #[tokio::test]
    async fn test_latest_none_when_empty() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteStageSummaryRepository::new(pool);
        assert!(repo.latest(Stage::DataAnalysis).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_latest_is_newest_by_created_at() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteStageSummaryRepository::new(pool);

        repo.append(&record(Stage::ProblemDefinition, "newest", 0)).await.unwrap();
        repo.append(&record(Stage::ProblemDefinition, "older", 60)).await.unwrap();
        repo.append(&record(Stage::DataAnalysis, "other stage", 0)).await.unwrap();

        let latest = repo.latest(Stage::ProblemDefinition).await.unwrap().unwrap();
        assert_eq!(latest.summary, "newest");
        assert_eq!(latest.stage, Stage::ProblemDefinition);
    }

    #[tokio::test]
    async fn test_append_keeps_history() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteStageSummaryRepository::new(pool.clone());

        repo.append(&record(Stage::DesignGeneration, "v1", 10)).await.unwrap();
        repo.append(&record(Stage::DesignGeneration, "v2", 0)).await.unwrap();

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM stage_summaries")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count, 2);
    }
}
