//! Auth Commands

/// 登录或注册命令
///
/// 邮箱未注册时自动注册新账号（名称取邮箱本地部分）
#[derive(Debug, Clone)]
pub struct LoginOrRegister {
    pub email: String,
    pub password: String,
}

/// 登出命令
#[derive(Debug, Clone)]
pub struct Logout {
    pub token: String,
}
