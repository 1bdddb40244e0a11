//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping           GET   健康检查
//! - /api/auth/login     POST  登录或注册
//! - /api/auth/logout    POST  登出（撤销会话令牌）
//! - /api/auth/me        POST  当前用户
//! - /api/book/generate  POST  生成绘本（完整流水线）
//! - /api/book/get       POST  获取绘本详情（含章节）
//! - /api/book/list      POST  分页列出所有绘本
//! - /api/book/mine      POST  分页列出当前用户的绘本
//! - /api/book/delete    POST  删除绘本（仅作者）
//! - /api/book/search    POST  全文搜索绘本
//! - /api/book/export    POST  导出绘本为 PDF

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_routes())
        .nest("/book", book_routes())
}

/// Auth 路由
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
        .route("/me", post(handlers::me))
}

/// Book 路由
fn book_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/generate", post(handlers::generate_book))
        .route("/get", post(handlers::get_book))
        .route("/list", post(handlers::list_books))
        .route("/mine", post(handlers::my_books))
        .route("/delete", post(handlers::delete_book))
        .route("/search", post(handlers::search_books))
        .route("/export", post(handlers::export_book))
}
