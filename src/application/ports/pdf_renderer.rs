//! PDF Renderer Port - 出站端口
//!
//! 将一本绘本渲染为 PDF 字节

use thiserror::Error;

use super::{BookRecord, ChapterRecord};

/// PDF 渲染错误
#[derive(Debug, Error)]
pub enum PdfRenderError {
    #[error("PDF compilation failed: {0}")]
    Compilation(String),

    #[error("PDF rendering failed: {0}")]
    Other(String),
}

/// PDF Renderer Port
///
/// 渲染是纯 CPU 工作，接口保持同步；调用方自行决定是否放入
/// blocking 线程池
pub trait PdfRendererPort: Send + Sync {
    /// 渲染绘本（标题页 + 每章一节）为 PDF 字节
    fn render(
        &self,
        book: &BookRecord,
        chapters: &[ChapterRecord],
    ) -> Result<Vec<u8>, PdfRenderError>;
}
