//! Book Context - Entities

use serde::{Deserialize, Serialize};

/// 绘本章节 - 一页故事加一幅插图
///
/// 不变量:
/// - page_number 从 1 开始
/// - 文本与插图 URL 不可为空（只有完整章节才能进入聚合）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// 页码（在绘本中的顺序）
    page_number: u32,
    /// 章节小标题
    subtitle: String,
    /// 故事正文
    text_content: String,
    /// 插图描述（生成插图所用的提示词）
    image_description: String,
    /// 持久化后的插图 URL
    image_url: String,
}

impl Chapter {
    pub fn new(
        page_number: u32,
        subtitle: String,
        text_content: String,
        image_description: String,
        image_url: String,
    ) -> Result<Self, &'static str> {
        if page_number == 0 {
            return Err("页码必须从 1 开始");
        }
        if subtitle.is_empty() {
            return Err("章节标题不能为空");
        }
        if text_content.is_empty() {
            return Err("章节正文不能为空");
        }
        if image_url.is_empty() {
            return Err("章节插图 URL 不能为空");
        }
        Ok(Self {
            page_number,
            subtitle,
            text_content,
            image_description,
            image_url,
        })
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    pub fn image_description(&self) -> &str {
        &self.image_description
    }

    pub fn image_url(&self) -> &str {
        &self.image_url
    }
}
