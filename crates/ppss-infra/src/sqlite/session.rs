//! SQLite agent profile repository.

use sqlx::Row;

use ppss_core::repository::session::SessionRepository;
use ppss_types::error::RepositoryError;
use ppss_types::session::{AgentProfile, SessionKey};

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime, query_error};

pub struct SqliteSessionRepository {
    pool: DatabasePool,
}

impl SqliteSessionRepository {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct AgentProfileRow {
    session_id: String,
    system_prompt: String,
    created_at: String,
}

impl AgentProfileRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            session_id: row.try_get("session_id")?,
            system_prompt: row.try_get("system_prompt")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn into_profile(self) -> Result<AgentProfile, RepositoryError> {
        let key: SessionKey = self
            .session_id
            .parse()
            .map_err(|e| RepositoryError::Query(format!("invalid session_id: {e}")))?;
        Ok(AgentProfile {
            user_id: key.user_id().to_string(),
            stakeholder_type: key.stakeholder_type().to_string(),
            session_id: key,
            system_prompt: self.system_prompt,
            created_at: parse_datetime(&self.created_at)?,
        })
    }
}

impl SessionRepository for SqliteSessionRepository {
    async fn get_profile(&self, key: &SessionKey) -> Result<Option<AgentProfile>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM agent_sessions WHERE session_id = ?")
            .bind(key.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_error)?;

        match row {
            Some(row) => {
                let profile_row = AgentProfileRow::from_row(&row)
                    .map_err(query_error)?;
                Ok(Some(profile_row.into_profile()?))
            }
            None => Ok(None),
        }
    }

    /// Insert-if-absent. When two requests race on first login, the loser's
    /// insert is ignored and both observe the winner's row.
    async fn insert_profile(&self, profile: &AgentProfile) -> Result<AgentProfile, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO agent_sessions (session_id, user_id, stakeholder_type, system_prompt, created_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(session_id) DO NOTHING"#,
        )
        .bind(profile.session_id.to_string())
        .bind(&profile.user_id)
        .bind(&profile.stakeholder_type)
        .bind(&profile.system_prompt)
        .bind(format_datetime(&profile.created_at))
        .execute(&self.pool.writer)
        .await
        .map_err(query_error)?;

        let row = sqlx::query("SELECT * FROM agent_sessions WHERE session_id = ?")
            .bind(profile.session_id.to_string())
            .fetch_one(&self.pool.writer)
            .await
            .map_err(query_error)?;

        AgentProfileRow::from_row(&row)
            .map_err(query_error)?
            .into_profile()
    }

    async fn count_profiles(&self) -> Result<u64, RepositoryError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM agent_sessions")
            .fetch_one(&self.pool.reader)
            .await
            .map_err(query_error)?;
        Ok(count as u64)
    }
}
