//! Fake Text Client - 用于测试的文本生成客户端
//!
//! 始终返回固定的故事草稿 JSON，不实际调用生成服务

use async_trait::async_trait;

use crate::application::ports::{TextGenError, TextGeneratorPort};

/// 固定返回的草稿（带代码围栏，模拟真实模型输出）
const CANNED_DRAFT: &str = r#"```json
{
  "bookTitle": "The Brave Little Turtle",
  "bookCoverDescription": "A vibrant, cartoon-style illustration of a small turtle standing on a sunny beach",
  "chapters": [
    {
      "subTitle": "A Slow Start",
      "textContent": "Once upon a time, a little turtle dreamed of crossing the big blue bay.",
      "imageDescription": "A cartoon turtle looking at the sea from the shore",
      "page": 1
    },
    {
      "subTitle": "The Long Swim",
      "textContent": "Stroke by stroke, the little turtle kept going even when the waves grew tall.",
      "imageDescription": "A cartoon turtle swimming through big friendly waves",
      "page": 2
    },
    {
      "subTitle": "The Other Shore",
      "textContent": "At sunset the little turtle reached the far shore, tired but proud.",
      "imageDescription": "A cartoon turtle resting on a beach at sunset",
      "page": 3
    }
  ]
}
```"#;

/// Fake Text Client
///
/// 用于测试与离线开发，始终返回固定草稿
pub struct FakeTextClient {
    response: String,
}

impl FakeTextClient {
    /// 使用固定草稿创建
    pub fn new() -> Self {
        Self {
            response: CANNED_DRAFT.to_string(),
        }
    }

    /// 使用自定义响应创建
    pub fn with_response(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }
}

impl Default for FakeTextClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextGeneratorPort for FakeTextClient {
    async fn complete(&self, prompt: &str) -> Result<String, TextGenError> {
        tracing::debug!(
            prompt_len = prompt.len(),
            "FakeTextClient: returning canned draft"
        );

        // 模拟生成延迟
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(self.response.clone())
    }
}
