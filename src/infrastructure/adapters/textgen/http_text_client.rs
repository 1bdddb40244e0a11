//! HTTP Text Client - 调用外部文本生成 HTTP 服务
//!
//! 实现 TextGeneratorPort trait，通过 REST 调用 Gemini 风格的
//! generateContent 接口
//!
//! 外部 API:
//! POST {base}/v1beta/models/{model}:generateContent?key={api_key}
//! Request: {"contents": [{"parts": [{"text": "..."}]}]}  (JSON)
//! Response: {"candidates": [{"content": {"parts": [{"text": "..."}]}}]}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{TextGenError, TextGeneratorPort};

/// 生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

/// 生成响应体 (JSON)
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

/// HTTP 文本客户端配置
#[derive(Debug, Clone)]
pub struct HttpTextClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// API Key
    pub api_key: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for HttpTextClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.0-flash".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

impl HttpTextClientConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
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

/// HTTP 文本客户端
pub struct HttpTextClient {
    client: Client,
    config: HttpTextClientConfig,
}

impl HttpTextClient {
    /// 创建新的 HTTP 文本客户端
    pub fn new(config: HttpTextClientConfig) -> Result<Self, TextGenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| TextGenError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// 获取生成 URL（key 以查询参数传递）
    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }
}

#[async_trait]
impl TextGeneratorPort for HttpTextClient {
    async fn complete(&self, prompt: &str) -> Result<String, TextGenError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        tracing::debug!(
            model = %self.config.model,
            prompt_len = prompt.len(),
            "Sending text generation request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TextGenError::Timeout
                } else if e.is_connect() {
                    TextGenError::NetworkError(format!(
                        "Cannot connect to text generation service: {}",
                        e
                    ))
                } else {
                    TextGenError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(TextGenError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| TextGenError::InvalidResponse(e.to_string()))?;

        // 拼接首个候选的全部文本片段
        let text: String = body
            .candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(TextGenError::EmptyResponse);
        }

        tracing::info!(
            model = %self.config.model,
            response_len = text.len(),
            "Text generation completed"
        );

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = HttpTextClientConfig::default();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_builder() {
        let config = HttpTextClientConfig::new("http://example.com", "key")
            .with_model("test-model")
            .with_timeout(30);
        assert_eq!(config.base_url, "http://example.com");
        assert_eq!(config.model, "test-model");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_generate_url_embeds_model_and_key() {
        let client = HttpTextClient::new(
            HttpTextClientConfig::new("http://example.com", "k123").with_model("m1"),
        )
        .unwrap();
        assert_eq!(
            client.generate_url(),
            "http://example.com/v1beta/models/m1:generateContent?key=k123"
        );
    }
}
