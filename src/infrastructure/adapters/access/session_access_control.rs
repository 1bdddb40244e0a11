//! Session Access Control - 基于会话令牌的访问控制实现
//!
//! 实现 AccessControlPort trait: 令牌 -> 会话 -> 用户身份。
//! 令牌缺失、格式非法、会话不存在或已过期一律解析为匿名（None），
//! 只有后端存储故障才报错。

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ports::{
    AccessControlError, AccessControlPort, AuthSessionRepositoryPort, UserIdentity,
    UserRepositoryPort,
};

/// 会话访问控制
pub struct SessionAccessControl {
    session_repo: Arc<dyn AuthSessionRepositoryPort>,
    user_repo: Arc<dyn UserRepositoryPort>,
}

impl SessionAccessControl {
    pub fn new(
        session_repo: Arc<dyn AuthSessionRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
    ) -> Self {
        Self {
            session_repo,
            user_repo,
        }
    }
}

#[async_trait]
impl AccessControlPort for SessionAccessControl {
    async fn current_user(
        &self,
        token: Option<&str>,
    ) -> Result<Option<UserIdentity>, AccessControlError> {
        let Some(token) = token else {
            return Ok(None);
        };

        let Ok(token) = Uuid::parse_str(token) else {
            return Ok(None);
        };

        let session = self
            .session_repo
            .find_by_token(token)
            .await
            .map_err(|e| AccessControlError::Backend(e.to_string()))?;

        let Some(session) = session else {
            return Ok(None);
        };

        if session.is_expired(Utc::now()) {
            tracing::debug!(token = %token, "Session expired");
            return Ok(None);
        }

        let user = self
            .user_repo
            .find_by_id(session.user_id)
            .await
            .map_err(|e| AccessControlError::Backend(e.to_string()))?;

        Ok(user.map(|user| UserIdentity {
            id: user.id,
            name: user.name,
            role: user.role,
            email: user.email,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{AuthSessionRecord, RepositoryError, UserRecord};
    use chrono::{DateTime, Duration};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSessions {
        sessions: Mutex<HashMap<Uuid, AuthSessionRecord>>,
    }

    #[async_trait]
    impl AuthSessionRepositoryPort for FakeSessions {
        async fn save(&self, session: &AuthSessionRecord) -> Result<(), RepositoryError> {
            self.sessions
                .lock()
                .unwrap()
                .insert(session.token, session.clone());
            Ok(())
        }

        async fn find_by_token(
            &self,
            token: Uuid,
        ) -> Result<Option<AuthSessionRecord>, RepositoryError> {
            Ok(self.sessions.lock().unwrap().get(&token).cloned())
        }

        async fn delete(&self, token: Uuid) -> Result<(), RepositoryError> {
            self.sessions.lock().unwrap().remove(&token);
            Ok(())
        }

        async fn delete_expired(&self, _now: DateTime<Utc>) -> Result<u64, RepositoryError> {
            Ok(0)
        }
    }

    struct FakeUsers {
        user: UserRecord,
    }

    #[async_trait]
    impl UserRepositoryPort for FakeUsers {
        async fn save(&self, _user: &UserRecord) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
            Ok((self.user.id == id).then(|| self.user.clone()))
        }

        async fn find_by_email(
            &self,
            _email: &str,
        ) -> Result<Option<UserRecord>, RepositoryError> {
            Ok(None)
        }
    }

    fn setup(expires_in_secs: i64) -> (SessionAccessControl, Uuid) {
        let user = UserRecord {
            id: Uuid::new_v4(),
            email: "eve@example.com".to_string(),
            password_hash: "hash".to_string(),
            name: "eve".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let token = Uuid::new_v4();
        let session = AuthSessionRecord {
            token,
            user_id: user.id,
            created_at: Utc::now(),
            expires_at: Utc::now() + Duration::seconds(expires_in_secs),
        };

        let mut sessions = HashMap::new();
        sessions.insert(token, session);

        (
            SessionAccessControl::new(
                Arc::new(FakeSessions {
                    sessions: Mutex::new(sessions),
                }),
                Arc::new(FakeUsers { user }),
            ),
            token,
        )
    }

    #[tokio::test]
    async fn test_valid_token_resolves_user() {
        let (access, token) = setup(3600);
        let user = access
            .current_user(Some(&token.to_string()))
            .await
            .unwrap();
        assert_eq!(user.unwrap().name, "eve");
    }

    #[tokio::test]
    async fn test_missing_token_is_anonymous() {
        let (access, _) = setup(3600);
        assert!(access.current_user(None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_token_is_anonymous() {
        let (access, _) = setup(3600);
        assert!(access
            .current_user(Some("not-a-uuid"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_anonymous() {
        let (access, token) = setup(-10);
        assert!(access
            .current_user(Some(&token.to_string()))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_token_is_anonymous() {
        let (access, _) = setup(3600);
        assert!(access
            .current_user(Some(&Uuid::new_v4().to_string()))
            .await
            .unwrap()
            .is_none());
    }
}
