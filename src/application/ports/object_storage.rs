//! Object Storage Port - 出站端口
//!
//! 定义持久化对象存储的抽象接口

use async_trait::async_trait;
use thiserror::Error;

/// 对象存储错误
#[derive(Debug, Error)]
pub enum ObjectStorageError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Upload returned no durable URL")]
    NoDurableUrl,
}

/// Object Storage Port
///
/// 每次上传在存储侧创建一个对象；本服务不负责删除或回滚
#[async_trait]
pub trait ObjectStoragePort: Send + Sync {
    /// 上传字节到指定目录下的对象名，返回持久化公开 URL
    async fn upload(
        &self,
        bytes: &[u8],
        folder: &str,
        object_name: &str,
    ) -> Result<String, ObjectStorageError>;
}
