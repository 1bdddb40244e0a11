//! Content Generator - 故事草稿生成
//!
//! 调用文本生成服务并从原始输出中解析出严格的 JSON 契约。
//! 模型输出可能包裹 Markdown 代码围栏，解析前先剥离。
//! 本层不做重试：一次调用要么得到结构完整的草稿，要么失败。

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::application::ports::{TextGenError, TextGeneratorPort};

/// 内容生成错误
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("Topic prompt cannot be empty")]
    EmptyPrompt,

    #[error("Text generation failed: {0}")]
    Service(#[from] TextGenError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// 章节草稿
///
/// 字段名与模型约定的 JSON 契约一致；imageUrl 在插图生成前缺失
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterDraft {
    #[serde(rename = "subTitle")]
    pub subtitle: String,

    #[serde(rename = "textContent")]
    pub text_content: String,

    #[serde(rename = "imageDescription")]
    pub image_description: String,

    #[serde(rename = "page")]
    pub page_number: u32,

    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// 故事草稿 - 模型一次调用的解析结果
///
/// 创建后不可变；由编排器消费生成插图请求
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryDraft {
    #[serde(rename = "bookTitle")]
    pub title: String,

    #[serde(rename = "bookCoverDescription")]
    pub cover_description: String,

    pub chapters: Vec<ChapterDraft>,
}

/// 内容生成器
///
/// `generate(topic_prompt) -> StoryDraft`
pub struct ContentGenerator {
    text_gen: Arc<dyn TextGeneratorPort>,
}

impl ContentGenerator {
    pub fn new(text_gen: Arc<dyn TextGeneratorPort>) -> Self {
        Self { text_gen }
    }

    /// 生成故事草稿
    ///
    /// 提示词中已嵌入期望的章节数，但模型不受严格约束，
    /// 返回的章节数以实际解析结果为准
    pub async fn generate(&self, topic_prompt: &str) -> Result<StoryDraft, ContentError> {
        if topic_prompt.trim().is_empty() {
            return Err(ContentError::EmptyPrompt);
        }

        let raw = self.text_gen.complete(topic_prompt).await?;

        let draft = parse_story_draft(&raw)?;

        tracing::info!(
            title = %draft.title,
            chapters = draft.chapters.len(),
            "Story draft generated"
        );

        Ok(draft)
    }
}

/// 从模型原始输出解析故事草稿
///
/// 剥离可能存在的代码围栏后做严格的 serde 解析；
/// 缺失必填字段或非法 JSON 一律报 MalformedResponse
pub fn parse_story_draft(raw: &str) -> Result<StoryDraft, ContentError> {
    let cleaned = strip_code_fences(raw);

    if cleaned.is_empty() {
        return Err(ContentError::MalformedResponse(
            "response is empty after cleaning".to_string(),
        ));
    }

    let draft: StoryDraft = serde_json::from_str(cleaned)
        .map_err(|e| ContentError::MalformedResponse(e.to_string()))?;

    if draft.title.trim().is_empty() {
        return Err(ContentError::MalformedResponse(
            "bookTitle is empty".to_string(),
        ));
    }
    if draft.cover_description.trim().is_empty() {
        return Err(ContentError::MalformedResponse(
            "bookCoverDescription is empty".to_string(),
        ));
    }
    if draft.chapters.is_empty() {
        return Err(ContentError::MalformedResponse(
            "chapters array is empty".to_string(),
        ));
    }

    Ok(draft)
}

/// 剥离首尾的 Markdown 代码围栏
///
/// 支持 ```json 与裸 ``` 两种形式；围栏不存在时原样返回
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }

    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }

    text.trim()
}
