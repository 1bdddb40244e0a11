//! Fake Image Client - 用于测试的图像合成客户端
//!
//! 始终返回固定的临时 URL 与 1x1 PNG 字节，不实际调用合成服务

use async_trait::async_trait;

use crate::application::ports::{ImageOutputConfig, ImageSynthesizerPort, SynthesisError};

/// 最小合法 PNG（1x1 透明像素）
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f,
    0x15, 0xc4, 0x89, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x62, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d, 0xb4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

/// Fake Image Client
///
/// 用于测试与离线开发
pub struct FakeImageClient;

impl FakeImageClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for FakeImageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageSynthesizerPort for FakeImageClient {
    async fn synthesize(
        &self,
        description: &str,
        _config: &ImageOutputConfig,
    ) -> Result<String, SynthesisError> {
        tracing::debug!(
            description_len = description.len(),
            "FakeImageClient: returning fixed transient URL"
        );

        // 模拟合成延迟
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;

        Ok("https://transient.invalid/fake-output.png".to_string())
    }

    async fn download(&self, _url: &str) -> Result<Vec<u8>, SynthesisError> {
        Ok(TINY_PNG.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_roundtrip() {
        let client = FakeImageClient::new();
        let url = client
            .synthesize("a turtle", &ImageOutputConfig::default())
            .await
            .unwrap();
        let bytes = client.download(&url).await.unwrap();
        // PNG 魔数
        assert_eq!(&bytes[..4], &[0x89, 0x50, 0x4e, 0x47]);
    }
}
