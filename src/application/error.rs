//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 未登录
    #[error("You need to be logged in to perform this action")]
    Unauthenticated,

    /// 无权限
    #[error("You are not authorized to perform this action")]
    Unauthorized,

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 外部服务错误
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        match err {
            crate::application::ports::RepositoryError::NotFound(msg) => Self::NotFound {
                resource_type: "Entity",
                id: msg,
            },
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<crate::application::ports::AccessControlError> for ApplicationError {
    fn from(err: crate::application::ports::AccessControlError) -> Self {
        Self::InternalError(err.to_string())
    }
}
