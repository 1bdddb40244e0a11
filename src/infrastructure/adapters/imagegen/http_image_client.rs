//! HTTP Image Client - 调用外部图像合成 HTTP 服务
//!
//! 实现 ImageSynthesizerPort trait，通过 REST 调用 Replicate 风格的
//! 同步预测接口
//!
//! 外部 API:
//! POST {base}/v1/models/{model}/predictions
//! Headers: Authorization: Bearer {token}, Prefer: wait
//! Request: {"input": {"prompt": "...", "output_format": "png", ...}}  (JSON)
//! Response: {"status": "succeeded", "output": ["https://..."]}
//!
//! output 中的 URL 是临时的，调用方需立即下载转存

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{ImageOutputConfig, ImageSynthesizerPort, SynthesisError};

/// 预测请求体 (JSON)
#[derive(Debug, Serialize)]
struct PredictionRequest {
    input: PredictionInput,
}

#[derive(Debug, Serialize)]
struct PredictionInput {
    prompt: String,
    output_format: &'static str,
    output_quality: u8,
    aspect_ratio: &'static str,
}

/// 预测响应体 (JSON)
#[derive(Debug, Deserialize)]
struct PredictionResponse {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    output: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
}

/// HTTP 图像客户端配置
#[derive(Debug, Clone)]
pub struct HttpImageClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 模型标识
    pub model: String,
    /// API Token
    pub api_token: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpImageClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.replicate.com".to_string(),
            model: "bytedance/sdxl-lightning-4step".to_string(),
            api_token: String::new(),
            timeout_secs: 180,
        }
    }
}

impl HttpImageClientConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
            ..Default::default()
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP 图像客户端
pub struct HttpImageClient {
    client: Client,
    config: HttpImageClientConfig,
}

impl HttpImageClient {
    /// 创建新的 HTTP 图像客户端
    pub fn new(config: HttpImageClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取预测 URL
    fn prediction_url(&self) -> String {
        format!(
            "{}/v1/models/{}/predictions",
            self.config.base_url, self.config.model
        )
    }
}

/// 从 output 字段提取首个 URL
///
/// 不同模型返回字符串或字符串数组两种形态
fn first_output_url(output: Option<&serde_json::Value>) -> Option<String> {
    match output? {
        serde_json::Value::String(url) if !url.is_empty() => Some(url.clone()),
        serde_json::Value::Array(items) => items.iter().find_map(|item| match item {
            serde_json::Value::String(url) if !url.is_empty() => Some(url.clone()),
            _ => None,
        }),
        _ => None,
    }
}

#[async_trait]
impl ImageSynthesizerPort for HttpImageClient {
    async fn synthesize(
        &self,
        description: &str,
        config: &ImageOutputConfig,
    ) -> Result<String, SynthesisError> {
        let request = PredictionRequest {
            input: PredictionInput {
                prompt: description.to_string(),
                output_format: config.output_format,
                output_quality: config.output_quality,
                aspect_ratio: config.aspect_ratio,
            },
        };

        tracing::debug!(
            model = %self.config.model,
            description_len = description.len(),
            "Sending image synthesis request"
        );

        let response = self
            .client
            .post(self.prediction_url())
            .bearer_auth(&self.config.api_token)
            .header("Prefer", "wait")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SynthesisError::Timeout
                } else if e.is_connect() {
                    SynthesisError::NetworkError(format!(
                        "Cannot connect to image synthesis service: {}",
                        e
                    ))
                } else {
                    SynthesisError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(SynthesisError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: PredictionResponse = response
            .json()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(e.to_string()))?;

        if let Some(error) = body.error {
            return Err(SynthesisError::ServiceError(error));
        }

        let url = first_output_url(body.output.as_ref()).ok_or(SynthesisError::NoOutput)?;

        tracing::info!(
            model = %self.config.model,
            status = body.status.as_deref().unwrap_or("unknown"),
            "Image synthesis completed"
        );

        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, SynthesisError> {
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SynthesisError::Timeout
            } else {
                SynthesisError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SynthesisError::ServiceError(format!(
                "HTTP {} fetching transient image",
                status
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| SynthesisError::InvalidResponse(format!("Failed to read image: {}", e)))?
            .to_vec();

        tracing::debug!(size = bytes.len(), "Transient image downloaded");

        Ok(bytes)
    }
}
