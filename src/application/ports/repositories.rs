//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Book Repository
// ============================================================================

/// 绘本实体（用于持久化）
///
/// 列表查询不携带章节；详情查询同时返回章节记录
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub cover_description: String,
    pub cover_url: String,
    /// 用户输入的原始主题
    pub description: String,
    pub author_id: Uuid,
    /// 作者名称（读取时由 users 表关联填充）
    pub author_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 章节实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ChapterRecord {
    pub id: Uuid,
    pub book_id: Uuid,
    pub page_number: u32,
    pub subtitle: String,
    pub text_content: String,
    pub image_description: String,
    pub image_url: String,
}

/// 分页结果
#[derive(Debug, Clone)]
pub struct BookPage {
    pub books: Vec<BookRecord>,
    pub total_count: u64,
}

/// Book Repository Port
#[async_trait]
pub trait BookRepositoryPort: Send + Sync {
    /// 原子写入绘本及其全部章节（单事务，不存在半成品绘本）
    async fn create(
        &self,
        book: &BookRecord,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError>;

    /// 根据 slug 查找绘本（含章节，按页码排序）
    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(BookRecord, Vec<ChapterRecord>)>, RepositoryError>;

    /// 根据 ID 查找绘本（不含章节）
    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError>;

    /// 按创建时间倒序分页（不含章节）
    async fn find_page(&self, page: u32, limit: u32) -> Result<BookPage, RepositoryError>;

    /// 指定作者的绘本分页（不含章节）
    async fn find_page_by_author(
        &self,
        author_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<BookPage, RepositoryError>;

    /// 删除绘本及其章节
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;

    /// 全文匹配标题 / 章节标题 / 章节正文
    async fn search(&self, query: &str, limit: u32) -> Result<Vec<BookRecord>, RepositoryError>;
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 保存用户
    async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
}

// ============================================================================
// Auth Session Repository
// ============================================================================

/// 会话令牌实体（用于持久化）
#[derive(Debug, Clone)]
pub struct AuthSessionRecord {
    pub token: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl AuthSessionRecord {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Auth Session Repository Port
#[async_trait]
pub trait AuthSessionRepositoryPort: Send + Sync {
    /// 保存会话
    async fn save(&self, session: &AuthSessionRecord) -> Result<(), RepositoryError>;

    /// 根据令牌查找会话
    async fn find_by_token(
        &self,
        token: Uuid,
    ) -> Result<Option<AuthSessionRecord>, RepositoryError>;

    /// 撤销会话
    async fn delete(&self, token: Uuid) -> Result<(), RepositoryError>;

    /// 清理过期会话，返回清理数量
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, RepositoryError>;
}
