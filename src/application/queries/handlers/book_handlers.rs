//! Book Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    AccessControlPort, BookRecord, BookRepositoryPort, ChapterRecord, PdfRendererPort,
};
use crate::application::queries::{ExportBookPdf, GetBook, ListBooks, ListUserBooks, SearchBooks};

/// 搜索结果数量上限
const SEARCH_LIMIT: u32 = 100;

/// 单页数量上限
const MAX_PAGE_SIZE: u32 = 50;

// ============================================================================
// Response DTOs
// ============================================================================

/// 绘本摘要响应（列表 / 搜索，不含章节）
#[derive(Debug, Clone)]
pub struct BookSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub cover_url: String,
    pub description: String,
    pub author_name: String,
    pub created_at: String,
}

impl From<BookRecord> for BookSummaryResponse {
    fn from(record: BookRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            slug: record.slug,
            cover_url: record.cover_url,
            description: record.description,
            author_name: record.author_name.unwrap_or_default(),
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// 章节响应
#[derive(Debug, Clone)]
pub struct ChapterResponse {
    pub page_number: u32,
    pub subtitle: String,
    pub text_content: String,
    pub image_url: String,
}

impl From<ChapterRecord> for ChapterResponse {
    fn from(record: ChapterRecord) -> Self {
        Self {
            page_number: record.page_number,
            subtitle: record.subtitle,
            text_content: record.text_content,
            image_url: record.image_url,
        }
    }
}

/// 绘本详情响应（含章节）
#[derive(Debug, Clone)]
pub struct BookDetailResponse {
    pub summary: BookSummaryResponse,
    pub chapters: Vec<ChapterResponse>,
}

/// 分页响应
#[derive(Debug, Clone)]
pub struct BookPageResponse {
    pub books: Vec<BookSummaryResponse>,
    pub total_count: u64,
}

/// 导出的 PDF
#[derive(Debug, Clone)]
pub struct ExportedPdf {
    pub filename: String,
    pub bytes: Vec<u8>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GetBook Handler
pub struct GetBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl GetBookHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: GetBook) -> Result<BookDetailResponse, ApplicationError> {
        let (book, chapters) = self
            .book_repo
            .find_by_slug(&query.slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.slug.clone()))?;

        Ok(BookDetailResponse {
            summary: BookSummaryResponse::from(book),
            chapters: chapters.into_iter().map(ChapterResponse::from).collect(),
        })
    }
}

/// ListBooks Handler
pub struct ListBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl ListBooksHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(&self, query: ListBooks) -> Result<BookPageResponse, ApplicationError> {
        let page = query.page.max(1);
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

        let result = self.book_repo.find_page(page, limit).await?;

        Ok(BookPageResponse {
            books: result
                .books
                .into_iter()
                .map(BookSummaryResponse::from)
                .collect(),
            total_count: result.total_count,
        })
    }
}

/// ListUserBooks Handler - 当前用户的绘本
pub struct ListUserBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    access_control: Arc<dyn AccessControlPort>,
}

impl ListUserBooksHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        access_control: Arc<dyn AccessControlPort>,
    ) -> Self {
        Self {
            book_repo,
            access_control,
        }
    }

    pub async fn handle(
        &self,
        query: ListUserBooks,
    ) -> Result<BookPageResponse, ApplicationError> {
        let user = self
            .access_control
            .current_user(query.auth_token.as_deref())
            .await?
            .ok_or(ApplicationError::Unauthenticated)?;

        let page = query.page.max(1);
        let limit = query.limit.clamp(1, MAX_PAGE_SIZE);

        let result = self
            .book_repo
            .find_page_by_author(user.id, page, limit)
            .await?;

        Ok(BookPageResponse {
            books: result
                .books
                .into_iter()
                .map(BookSummaryResponse::from)
                .collect(),
            total_count: result.total_count,
        })
    }
}

/// SearchBooks Handler
pub struct SearchBooksHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
}

impl SearchBooksHandler {
    pub fn new(book_repo: Arc<dyn BookRepositoryPort>) -> Self {
        Self { book_repo }
    }

    pub async fn handle(
        &self,
        query: SearchBooks,
    ) -> Result<Vec<BookSummaryResponse>, ApplicationError> {
        let text = query.query.trim();
        if text.is_empty() {
            return Err(ApplicationError::validation("Search query cannot be empty"));
        }

        let books = self.book_repo.search(text, SEARCH_LIMIT).await?;

        Ok(books.into_iter().map(BookSummaryResponse::from).collect())
    }
}

/// ExportBookPdf Handler
pub struct ExportBookPdfHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    pdf_renderer: Arc<dyn PdfRendererPort>,
}

impl ExportBookPdfHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        pdf_renderer: Arc<dyn PdfRendererPort>,
    ) -> Self {
        Self {
            book_repo,
            pdf_renderer,
        }
    }

    pub async fn handle(&self, query: ExportBookPdf) -> Result<ExportedPdf, ApplicationError> {
        let (book, chapters) = self
            .book_repo
            .find_by_slug(&query.slug)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Book", query.slug.clone()))?;

        let filename = format!("{}.pdf", book.slug);

        // 渲染是纯 CPU 工作，放入 blocking 线程池
        let renderer = self.pdf_renderer.clone();
        let bytes = tokio::task::spawn_blocking(move || renderer.render(&book, &chapters))
            .await
            .map_err(|e| ApplicationError::internal(format!("PDF task panicked: {}", e)))?
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        Ok(ExportedPdf { filename, bytes })
    }
}
