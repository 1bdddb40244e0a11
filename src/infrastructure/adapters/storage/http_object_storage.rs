//! HTTP Object Storage - 持久化对象存储实现
//!
//! 实现 ObjectStoragePort trait，通过 multipart 上传到
//! Cloudinary 风格的上传端点
//!
//! 外部 API:
//! POST {base}/upload
//! Request: multipart (file, folder, public_id, api_key)
//! Response: {"secure_url": "https://..."}

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::application::ports::{ObjectStorageError, ObjectStoragePort};

/// 上传响应体 (JSON)
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
}

/// HTTP 对象存储配置
#[derive(Debug, Clone)]
pub struct HttpObjectStorageConfig {
    /// 上传端点基础 URL
    pub base_url: String,
    /// API Key
    pub api_key: String,
    /// 上传超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpObjectStorageConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9000".to_string(),
            api_key: String::new(),
            timeout_secs: 60,
        }
    }
}

impl HttpObjectStorageConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 对象存储
pub struct HttpObjectStorage {
    client: Client,
    config: HttpObjectStorageConfig,
}

impl HttpObjectStorage {
    /// 创建新的对象存储客户端
    pub fn new(config: HttpObjectStorageConfig) -> Result<Self, ObjectStorageError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ObjectStorageError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取上传 URL
    fn upload_url(&self) -> String {
        format!("{}/upload", self.config.base_url)
    }
}

#[async_trait]
impl ObjectStoragePort for HttpObjectStorage {
    async fn upload(
        &self,
        bytes: &[u8],
        folder: &str,
        object_name: &str,
    ) -> Result<String, ObjectStorageError> {
        let form = Form::new()
            .part(
                "file",
                Part::bytes(bytes.to_vec()).file_name(object_name.to_string()),
            )
            .text("folder", folder.to_string())
            .text("public_id", object_name.to_string())
            .text("api_key", self.config.api_key.clone());

        tracing::debug!(
            folder = %folder,
            object_name = %object_name,
            size = bytes.len(),
            "Uploading object"
        );

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ObjectStorageError::Timeout
                } else {
                    ObjectStorageError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ObjectStorageError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ObjectStorageError::ServiceError(e.to_string()))?;

        let durable_url = body
            .secure_url
            .filter(|url| !url.is_empty())
            .ok_or(ObjectStorageError::NoDurableUrl)?;

        tracing::info!(
            object_name = %object_name,
            durable_url = %durable_url,
            "Object uploaded"
        );

        Ok(durable_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = HttpObjectStorageConfig::new("http://cdn.example.com", "k").with_timeout(10);
        assert_eq!(config.base_url, "http://cdn.example.com");
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn test_upload_url() {
        let storage =
            HttpObjectStorage::new(HttpObjectStorageConfig::new("http://cdn.example.com", "k"))
                .unwrap();
        assert_eq!(storage.upload_url(), "http://cdn.example.com/upload");
    }
}
