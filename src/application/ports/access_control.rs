//! Access Control Port - 访问控制抽象
//!
//! 流水线在持久化阶段调用一次，作为能力检查

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// 访问控制错误
#[derive(Debug, Error)]
pub enum AccessControlError {
    #[error("Access control backend error: {0}")]
    Backend(String),
}

/// 当前用户身份
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
}

/// Access Control Port
///
/// 令牌缺失、未知或已过期时返回 None，而不是错误
#[async_trait]
pub trait AccessControlPort: Send + Sync {
    /// 解析当前用户
    async fn current_user(
        &self,
        token: Option<&str>,
    ) -> Result<Option<UserIdentity>, AccessControlError>;
}
