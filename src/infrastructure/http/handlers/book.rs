//! Book HTTP Handlers

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::application::{
    DeleteBook, ExportBookPdf, GenerateBook, GetBook, ListBooks, ListUserBooks, SearchBooks,
};
use crate::infrastructure::http::dto::{
    ApiResponse, BookDetailDto, BookListData, BookSummaryDto, DeleteBookRequest, Empty,
    ExportBookRequest, GenerateBookRequest, GeneratedBookData, GetBookRequest, ListBooksRequest,
    SearchBooksRequest,
};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

use super::bearer_token;

/// 生成绘本 - 触发完整流水线
///
/// 草稿与插图生成可能耗时数分钟，由外部服务的超时约束兜底
pub async fn generate_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<GenerateBookRequest>,
) -> Result<Json<ApiResponse<GeneratedBookData>>, ApiError> {
    let response = state
        .generate_book_handler
        .handle(GenerateBook {
            topic: request.topic,
            page_count: request.page_count,
            auth_token: bearer_token(&headers),
        })
        .await?;

    Ok(Json(ApiResponse::success(GeneratedBookData::from(
        response,
    ))))
}

/// 获取绘本详情（含章节）
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<GetBookRequest>,
) -> Result<Json<ApiResponse<BookDetailDto>>, ApiError> {
    let response = state
        .get_book_handler
        .handle(GetBook { slug: request.slug })
        .await?;

    Ok(Json(ApiResponse::success(BookDetailDto::from(response))))
}

/// 分页列出所有绘本
pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ListBooksRequest>,
) -> Result<Json<ApiResponse<BookListData>>, ApiError> {
    let response = state
        .list_books_handler
        .handle(ListBooks {
            page: request.page,
            limit: request.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookListData::from(response))))
}

/// 分页列出当前用户的绘本
pub async fn my_books(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ListBooksRequest>,
) -> Result<Json<ApiResponse<BookListData>>, ApiError> {
    let response = state
        .list_user_books_handler
        .handle(ListUserBooks {
            auth_token: bearer_token(&headers),
            page: request.page,
            limit: request.limit,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookListData::from(response))))
}

/// 删除绘本（仅作者本人）
pub async fn delete_book(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<DeleteBookRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_book_handler
        .handle(DeleteBook {
            book_id: request.id,
            auth_token: bearer_token(&headers),
        })
        .await?;

    Ok(Json(ApiResponse::ok()))
}

/// 全文搜索绘本
pub async fn search_books(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SearchBooksRequest>,
) -> Result<Json<ApiResponse<Vec<BookSummaryDto>>>, ApiError> {
    let response = state
        .search_books_handler
        .handle(SearchBooks {
            query: request.query,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        response.into_iter().map(BookSummaryDto::from).collect(),
    )))
}

/// 导出绘本为 PDF
pub async fn export_book(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportBookRequest>,
) -> Result<Response, ApiError> {
    let exported = state
        .export_book_handler
        .handle(ExportBookPdf { slug: request.slug })
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", exported.filename);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        exported.bytes,
    )
        .into_response())
}
