//! Data Transfer Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::{
    BookDetailResponse, BookPageResponse, BookSummaryResponse, ChapterResponse,
    CurrentUserResponse, GenerateBookResponse, LoginResponse,
};

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Auth DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserDto {
    pub id: Uuid,
    pub name: String,
    pub role: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct LoginData {
    pub token: Uuid,
    pub user: UserDto,
}

impl From<LoginResponse> for LoginData {
    fn from(response: LoginResponse) -> Self {
        Self {
            token: response.token,
            user: UserDto {
                id: response.user_id,
                name: response.name,
                role: response.role,
                email: response.email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MessageData {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CurrentUserData {
    pub logged_in: bool,
    pub user: Option<UserDto>,
}

impl From<CurrentUserResponse> for CurrentUserData {
    fn from(response: CurrentUserResponse) -> Self {
        let user = match (
            response.user_id,
            response.name,
            response.role,
            response.email,
        ) {
            (Some(id), Some(name), Some(role), Some(email)) => Some(UserDto {
                id,
                name,
                role,
                email,
            }),
            _ => None,
        };
        Self {
            logged_in: response.logged_in,
            user,
        }
    }
}

// ============================================================================
// Book DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GenerateBookRequest {
    pub topic: String,
    #[serde(default = "default_page_count")]
    pub page_count: u8,
}

fn default_page_count() -> u8 {
    5
}

#[derive(Debug, Serialize)]
pub struct GeneratedBookData {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub chapter_count: usize,
}

impl From<GenerateBookResponse> for GeneratedBookData {
    fn from(response: GenerateBookResponse) -> Self {
        Self {
            id: response.book_id,
            slug: response.slug,
            title: response.title,
            chapter_count: response.chapter_count,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GetBookRequest {
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct ListBooksRequest {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    12
}

#[derive(Debug, Deserialize)]
pub struct DeleteBookRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SearchBooksRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct ExportBookRequest {
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct BookSummaryDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub cover_url: String,
    pub description: String,
    pub author_name: String,
    pub created_at: String,
}

impl From<BookSummaryResponse> for BookSummaryDto {
    fn from(response: BookSummaryResponse) -> Self {
        Self {
            id: response.id,
            title: response.title,
            slug: response.slug,
            cover_url: response.cover_url,
            description: response.description,
            author_name: response.author_name,
            created_at: response.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterDto {
    pub page: u32,
    pub subtitle: String,
    pub text_content: String,
    pub image_url: String,
}

impl From<ChapterResponse> for ChapterDto {
    fn from(response: ChapterResponse) -> Self {
        Self {
            page: response.page_number,
            subtitle: response.subtitle,
            text_content: response.text_content,
            image_url: response.image_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookDetailDto {
    #[serde(flatten)]
    pub summary: BookSummaryDto,
    pub chapters: Vec<ChapterDto>,
}

impl From<BookDetailResponse> for BookDetailDto {
    fn from(response: BookDetailResponse) -> Self {
        Self {
            summary: BookSummaryDto::from(response.summary),
            chapters: response.chapters.into_iter().map(ChapterDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookListData {
    pub books: Vec<BookSummaryDto>,
    pub total_count: u64,
}

impl From<BookPageResponse> for BookListData {
    fn from(response: BookPageResponse) -> Self {
        Self {
            books: response
                .books
                .into_iter()
                .map(BookSummaryDto::from)
                .collect(),
            total_count: response.total_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_default_page_count() {
        let request: GenerateBookRequest =
            serde_json::from_str(r#"{"topic": "a turtle"}"#).unwrap();
        assert_eq!(request.page_count, 5);
    }

    #[test]
    fn test_list_request_defaults() {
        let request: ListBooksRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.page, 1);
        assert_eq!(request.limit, 12);
    }

    #[test]
    fn test_api_response_success_shape() {
        let response = ApiResponse::success(MessageData {
            message: "hi".to_string(),
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["errno"], 0);
        assert_eq!(json["data"]["message"], "hi");
    }
}
