//! Text Generator Port - 文本生成服务抽象
//!
//! 定义外部文本生成服务的抽象接口，具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Empty response from text generation service")]
    EmptyResponse,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Text Generator Port
///
/// 外部文本生成服务的抽象接口
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 发送提示词，返回模型的原始文本输出
    ///
    /// 原始输出可能包含 Markdown 代码围栏，由调用方清理解析
    async fn complete(&self, prompt: &str) -> Result<String, TextGenError>;

    /// 检查服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
