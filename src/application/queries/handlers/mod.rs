//! Query Handlers

mod auth_handlers;
mod book_handlers;

pub use auth_handlers::{CurrentUserResponse, GetCurrentUserHandler};
pub use book_handlers::{
    BookDetailResponse, BookPageResponse, BookSummaryResponse, ChapterResponse,
    ExportBookPdfHandler, ExportedPdf, GetBookHandler, ListBooksHandler, ListUserBooksHandler,
    SearchBooksHandler,
};
