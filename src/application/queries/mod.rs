//! Queries - CQRS 查询定义与处理器

mod auth_queries;
mod book_queries;

pub mod handlers;

pub use auth_queries::GetCurrentUser;
pub use book_queries::{ExportBookPdf, GetBook, ListBooks, ListUserBooks, SearchBooks};
