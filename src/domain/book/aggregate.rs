//! Book Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{BookError, BookId, Chapter, Slug, Title};

/// Book 聚合根 - 一本完整的绘本
///
/// 不变量:
/// - 章节页码唯一且从 1 开始连续
/// - 封面 URL 与所有章节插图 URL 均已就位（不存在半成品绘本）
/// - 聚合创建后章节序列不可变
///
/// 归属关系（author）在持久化阶段由访问控制确定，不属于聚合内容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    id: BookId,
    title: Title,
    slug: Slug,
    cover_description: String,
    cover_url: String,
    /// 用户输入的原始主题
    description: String,
    chapters: Vec<Chapter>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Book {
    /// 组装一本完整的绘本
    ///
    /// 章节必须按页码排好；页码不连续或重复时拒绝组装
    pub fn assemble(
        title: Title,
        cover_description: String,
        cover_url: String,
        description: String,
        chapters: Vec<Chapter>,
    ) -> Result<Self, BookError> {
        if cover_url.is_empty() {
            return Err(BookError::MissingCover);
        }
        validate_page_sequence(&chapters)?;

        let slug = Slug::from_title(&title);
        let now = Utc::now();
        Ok(Self {
            id: BookId::new(),
            title,
            slug,
            cover_description,
            cover_url,
            description,
            chapters,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters
    pub fn id(&self) -> &BookId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    pub fn cover_description(&self) -> &str {
        &self.cover_description
    }

    pub fn cover_url(&self) -> &str {
        &self.cover_url
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// 校验页码唯一且从 1 开始连续
///
/// 章节序列要求已按页码升序排列
fn validate_page_sequence(chapters: &[Chapter]) -> Result<(), BookError> {
    if chapters.is_empty() {
        return Err(BookError::NoChapters);
    }

    for (index, chapter) in chapters.iter().enumerate() {
        let expected = index as u32 + 1;
        if chapter.page_number() != expected {
            return Err(BookError::PageSequenceViolation {
                expected,
                actual: chapter.page_number(),
            });
        }
    }

    Ok(())
}
