//! Auth Queries

/// 获取当前用户查询
#[derive(Debug, Clone)]
pub struct GetCurrentUser {
    pub auth_token: Option<String>,
}
