//! Image Synthesizer Port - 图像合成服务抽象
//!
//! 定义外部图像合成服务的抽象接口，具体实现在 infrastructure/adapters 层
//!
//! 合成服务返回的是临时 URL（可能过期），调用方负责下载字节并
//! 转存到持久化对象存储

use async_trait::async_trait;
use thiserror::Error;

/// 图像合成错误
#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Synthesis produced no output")]
    NoOutput,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 图像输出配置
///
/// 固定的输出参数，不随请求变化
#[derive(Debug, Clone)]
pub struct ImageOutputConfig {
    /// 输出格式
    pub output_format: &'static str,
    /// 输出质量 (1-100)
    pub output_quality: u8,
    /// 宽高比
    pub aspect_ratio: &'static str,
}

impl Default for ImageOutputConfig {
    fn default() -> Self {
        Self {
            output_format: "png",
            output_quality: 80,
            aspect_ratio: "1:1",
        }
    }
}

/// Image Synthesizer Port
#[async_trait]
pub trait ImageSynthesizerPort: Send + Sync {
    /// 根据描述合成一张图像，返回合成服务侧的临时 URL
    async fn synthesize(
        &self,
        description: &str,
        config: &ImageOutputConfig,
    ) -> Result<String, SynthesisError>;

    /// 下载临时 URL 指向的图像字节
    async fn download(&self, url: &str) -> Result<Vec<u8>, SynthesisError>;
}
