//! SQLite Auth Session Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{AuthSessionRecord, AuthSessionRepositoryPort, RepositoryError};

/// SQLite Auth Session Repository
pub struct SqliteAuthSessionRepository {
    pool: DbPool,
}

impl SqliteAuthSessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct SessionRow {
    token: String,
    user_id: String,
    created_at: String,
    expires_at: String,
}

impl TryFrom<SessionRow> for AuthSessionRecord {
    type Error = RepositoryError;

    fn try_from(row: SessionRow) -> Result<Self, Self::Error> {
        Ok(AuthSessionRecord {
            token: Uuid::parse_str(&row.token)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            user_id: Uuid::parse_str(&row.user_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            expires_at: DateTime::parse_from_rfc3339(&row.expires_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl AuthSessionRepositoryPort for SqliteAuthSessionRepository {
    async fn save(&self, session: &AuthSessionRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (token, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(session.token.to_string())
        .bind(session.user_id.to_string())
        .bind(session.created_at.to_rfc3339())
        .bind(session.expires_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<AuthSessionRecord>, RepositoryError> {
        let row: Option<SessionRow> = sqlx::query_as(
            "SELECT token, user_id, created_at, expires_at FROM auth_sessions WHERE token = ?",
        )
        .bind(token.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AuthSessionRecord::try_from).transpose()
    }

    async fn delete(&self, token: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM auth_sessions WHERE token = ?")
            .bind(token.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM auth_sessions WHERE expires_at <= ?")
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
