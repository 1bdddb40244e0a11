//! Typst Book Renderer - 绘本 PDF 导出
//!
//! 实现 PdfRendererPort trait: 绘本 -> Typst 标记 -> PDF 字节。
//! 标题页之后每章一页：小标题、正文与插图链接。
//! 插图以链接形式给出，不下载嵌入（导出不依赖外部网络）。

use typst_as_lib::TypstEngine;

use crate::application::ports::{BookRecord, ChapterRecord, PdfRenderError, PdfRendererPort};

/// Typst 渲染器
pub struct TypstBookRenderer;

impl TypstBookRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TypstBookRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRendererPort for TypstBookRenderer {
    fn render(
        &self,
        book: &BookRecord,
        chapters: &[ChapterRecord],
    ) -> Result<Vec<u8>, PdfRenderError> {
        let markup = build_markup(book, chapters);
        compile(&markup)
    }
}

/// 编译 Typst 标记为 PDF 字节
fn compile(markup: &str) -> Result<Vec<u8>, PdfRenderError> {
    let engine = TypstEngine::builder().main_file(markup.to_string()).build();

    // compiled.output 是 Result，warnings 单独给出
    let document = engine
        .compile()
        .output
        .map_err(|e| PdfRenderError::Compilation(format!("{:?}", e)))?;

    let options = typst_pdf::PdfOptions::default();
    let pdf_bytes = typst_pdf::pdf(&document, &options)
        .map_err(|e| PdfRenderError::Compilation(format!("PDF generation failed: {:?}", e)))?;

    Ok(pdf_bytes.into())
}

/// 构造整本绘本的 Typst 标记
fn build_markup(book: &BookRecord, chapters: &[ChapterRecord]) -> String {
    let mut markup = String::new();

    markup.push_str("#set page(paper: \"a5\", margin: 2cm)\n");
    markup.push_str("#set text(size: 11pt)\n\n");

    // 标题页
    markup.push_str("#align(center + horizon)[\n");
    markup.push_str(&format!(
        "  #text(size: 24pt, weight: \"bold\")[{}]\n\n",
        escape(&book.title)
    ));
    if !book.description.is_empty() {
        markup.push_str(&format!("  #emph[{}]\n\n", escape(&book.description)));
    }
    if let Some(author) = book.author_name.as_deref().filter(|n| !n.is_empty()) {
        markup.push_str(&format!("  {}\n", escape(author)));
    }
    markup.push_str("]\n");

    // 每章一页
    for chapter in chapters {
        markup.push_str("#pagebreak()\n");
        markup.push_str(&format!(
            "= {}. {}\n\n",
            chapter.page_number,
            escape(&chapter.subtitle)
        ));
        markup.push_str(&format!("{}\n\n", escape(&chapter.text_content)));
        if !chapter.image_url.is_empty() {
            markup.push_str(&format!(
                "#link(\"{}\")[Illustration]\n",
                chapter.image_url.replace('"', "")
            ));
        }
    }

    markup
}

/// 转义 Typst 标记特殊字符
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '#' | '$' | '*' | '_' | '@' | '<' | '>' | '[' | ']' | '`' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}
