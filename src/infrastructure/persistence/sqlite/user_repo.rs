//! SQLite User Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};

/// SQLite User Repository
pub struct SqliteUserRepository {
    pool: DbPool,
}

impl SqliteUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    name: String,
    role: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for UserRecord {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(UserRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            role: row.role,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl UserRepositoryPort for SqliteUserRepository {
    async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                email = excluded.email,
                password_hash = excluded.password_hash,
                name = excluded.name,
                role = excluded.role,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.name)
        .bind(&user.role)
        .bind(user.created_at.to_rfc3339())
        .bind(user.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return RepositoryError::Duplicate(user.email.clone());
                }
            }
            RepositoryError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, name, role, created_at, updated_at FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(UserRecord::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(
            "SELECT id, email, password_hash, name, role, created_at, updated_at FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(UserRecord::try_from).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig};
    use super::*;

    async fn repo() -> SqliteUserRepository {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteUserRepository::new(pool)
    }

    fn user(email: &str) -> UserRecord {
        UserRecord {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "tester".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_save_and_find() {
        let repo = repo().await;
        let record = user("a@example.com");
        repo.save(&record).await.unwrap();

        let by_id = repo.find_by_id(record.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "a@example.com");

        let by_email = repo.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, record.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let repo = repo().await;
        repo.save(&user("dup@example.com")).await.unwrap();

        let result = repo.save(&user("dup@example.com")).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_missing_returns_none() {
        let repo = repo().await;
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
        assert!(repo
            .find_by_email("ghost@example.com")
            .await
            .unwrap()
            .is_none());
    }
}
