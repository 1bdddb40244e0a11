//! Book Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BookError {
    #[error("绘本没有任何章节")]
    NoChapters,

    #[error("缺少封面插图 URL")]
    MissingCover,

    #[error("页码必须连续: 期望 {expected}, 实际 {actual}")]
    PageSequenceViolation { expected: u32, actual: u32 },

    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的章节: {0}")]
    InvalidChapter(String),
}
