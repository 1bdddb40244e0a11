//! Auth Command Handlers - 登录注册 / 登出
//!
//! 登录与注册合并为一个命令: 邮箱未注册时自动建号。
//! 会话令牌为不透明 uuid，带过期时间落库。

use argon2::password_hash::{rand_core::OsRng, PasswordHash, SaltString};
use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{LoginOrRegister, Logout};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AuthSessionRecord, AuthSessionRepositoryPort, UserRecord, UserRepositoryPort,
};

/// 密码最短长度
const MIN_PASSWORD_LEN: usize = 6;

// ============================================================================
// LoginOrRegister
// ============================================================================

/// 登录响应
#[derive(Debug, Clone)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
}

/// LoginOrRegister Handler
pub struct LoginOrRegisterHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    session_repo: Arc<dyn AuthSessionRepositoryPort>,
    session_ttl_secs: u64,
}

impl LoginOrRegisterHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        session_repo: Arc<dyn AuthSessionRepositoryPort>,
        session_ttl_secs: u64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            session_ttl_secs,
        }
    }

    pub async fn handle(
        &self,
        command: LoginOrRegister,
    ) -> Result<LoginResponse, ApplicationError> {
        let email = command.email.trim().to_lowercase();

        if !is_well_formed_email(&email) {
            return Err(ApplicationError::validation("Invalid email"));
        }
        if command.password.len() < MIN_PASSWORD_LEN {
            return Err(ApplicationError::validation(
                "Password must be at least 6 characters",
            ));
        }

        let user = match self.user_repo.find_by_email(&email).await? {
            Some(user) => {
                if !verify_password(&command.password, &user.password_hash) {
                    return Err(ApplicationError::validation("Invalid password"));
                }
                user
            }
            None => {
                // 自动注册，名称取邮箱本地部分
                let now = Utc::now();
                let user = UserRecord {
                    id: Uuid::new_v4(),
                    email: email.clone(),
                    password_hash: hash_password(&command.password)?,
                    name: email
                        .split('@')
                        .next()
                        .unwrap_or("user")
                        .to_string(),
                    role: "user".to_string(),
                    created_at: now,
                    updated_at: now,
                };
                self.user_repo.save(&user).await?;

                tracing::info!(user_id = %user.id, "User registered");
                user
            }
        };

        let now = Utc::now();
        let session = AuthSessionRecord {
            token: Uuid::new_v4(),
            user_id: user.id,
            created_at: now,
            expires_at: now + Duration::seconds(self.session_ttl_secs as i64),
        };
        self.session_repo.save(&session).await?;

        tracing::info!(user_id = %user.id, "Session issued");

        Ok(LoginResponse {
            token: session.token,
            user_id: user.id,
            name: user.name,
            role: user.role,
            email: user.email,
        })
    }
}

// ============================================================================
// Logout
// ============================================================================

/// 登出响应
#[derive(Debug, Clone)]
pub struct LogoutResponse {
    pub message: &'static str,
}

/// Logout Handler
pub struct LogoutHandler {
    session_repo: Arc<dyn AuthSessionRepositoryPort>,
}

impl LogoutHandler {
    pub fn new(session_repo: Arc<dyn AuthSessionRepositoryPort>) -> Self {
        Self { session_repo }
    }

    pub async fn handle(&self, command: Logout) -> Result<LogoutResponse, ApplicationError> {
        let token = match Uuid::parse_str(&command.token) {
            Ok(token) => token,
            Err(_) => {
                return Ok(LogoutResponse {
                    message: "No active session found",
                })
            }
        };

        match self.session_repo.find_by_token(token).await? {
            Some(_) => {
                self.session_repo.delete(token).await?;
                Ok(LogoutResponse {
                    message: "Successfully logged out",
                })
            }
            None => Ok(LogoutResponse {
                message: "No active session found",
            }),
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// 粗校验邮箱格式: 本地部分 @ 含点的域名
fn is_well_formed_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !domain.contains('@')
}

fn hash_password(password: &str) -> Result<String, ApplicationError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApplicationError::internal(format!("Password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::RepositoryError;
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct InMemoryUsers {
        by_email: Mutex<HashMap<String, UserRecord>>,
    }

    impl InMemoryUsers {
        fn new() -> Self {
            Self {
                by_email: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl UserRepositoryPort for InMemoryUsers {
        async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError> {
            self.by_email
                .lock()
                .unwrap()
                .insert(user.email.clone(), user.clone());
            Ok(())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError> {
            Ok(self
                .by_email
                .lock()
                .unwrap()
                .values()
                .find(|u| u.id == id)
                .cloned())
        }

        async fn find_by_email(
            &self,
            email: &str,
        ) -> Result<Option<UserRecord>, RepositoryError> {
            Ok(self.by_email.lock().unwrap().get(email).cloned())
        }
    }

    struct InMemorySessions {
        by_token: Mutex<HashMap<Uuid, AuthSessionRecord>>,
    }

    impl InMemorySessions {
        fn new() -> Self {
            Self {
                by_token: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl AuthSessionRepositoryPort for InMemorySessions {
        async fn save(&self, session: &AuthSessionRecord) -> Result<(), RepositoryError> {
            self.by_token
                .lock()
                .unwrap()
                .insert(session.token, session.clone());
            Ok(())
        }

        async fn find_by_token(
            &self,
            token: Uuid,
        ) -> Result<Option<AuthSessionRecord>, RepositoryError> {
            Ok(self.by_token.lock().unwrap().get(&token).cloned())
        }

        async fn delete(&self, token: Uuid) -> Result<(), RepositoryError> {
            self.by_token.lock().unwrap().remove(&token);
            Ok(())
        }

        async fn delete_expired(
            &self,
            now: DateTime<Utc>,
        ) -> Result<u64, RepositoryError> {
            let mut sessions = self.by_token.lock().unwrap();
            let before = sessions.len();
            sessions.retain(|_, s| !s.is_expired(now));
            Ok((before - sessions.len()) as u64)
        }
    }

    fn handler() -> (
        LoginOrRegisterHandler,
        Arc<InMemoryUsers>,
        Arc<InMemorySessions>,
    ) {
        let users = Arc::new(InMemoryUsers::new());
        let sessions = Arc::new(InMemorySessions::new());
        (
            LoginOrRegisterHandler::new(users.clone(), sessions.clone(), 3600),
            users,
            sessions,
        )
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let (login, users, _) = handler();

        let first = login
            .handle(LoginOrRegister {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(first.name, "alice");

        // 哈希落库且不是明文
        let stored = users
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_ne!(stored.password_hash, "secret123");

        // 同密码可再次登录
        let second = login
            .handle(LoginOrRegister {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(second.user_id, first.user_id);
        assert_ne!(second.token, first.token);
    }

    #[tokio::test]
    async fn test_wrong_password_rejected() {
        let (login, _, _) = handler();

        login
            .handle(LoginOrRegister {
                email: "bob@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        let result = login
            .handle(LoginOrRegister {
                email: "bob@example.com".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let (login, _, _) = handler();
        let result = login
            .handle(LoginOrRegister {
                email: "not-an-email".to_string(),
                password: "secret123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let (login, _, _) = handler();
        let result = login
            .handle(LoginOrRegister {
                email: "carol@example.com".to_string(),
                password: "short".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_logout_revokes_session() {
        let (login, _, sessions) = handler();
        let response = login
            .handle(LoginOrRegister {
                email: "dave@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        let logout = LogoutHandler::new(sessions.clone());
        let result = logout
            .handle(Logout {
                token: response.token.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(result.message, "Successfully logged out");

        // 再次登出: 会话已不存在
        let again = logout
            .handle(Logout {
                token: response.token.to_string(),
            })
            .await
            .unwrap();
        assert_eq!(again.message, "No active session found");
    }

    #[test]
    fn test_email_validation() {
        assert!(is_well_formed_email("a@b.com"));
        assert!(!is_well_formed_email("a@b"));
        assert!(!is_well_formed_email("@b.com"));
        assert!(!is_well_formed_email("a@.com"));
        assert!(!is_well_formed_email("plain"));
    }
}
