//! Book Commands

use uuid::Uuid;

/// 生成绘本命令 - 触发完整流水线
#[derive(Debug, Clone)]
pub struct GenerateBook {
    /// 用户输入的故事主题
    pub topic: String,
    /// 期望页数（1-10）
    pub page_count: u8,
    /// 会话令牌（持久化阶段校验）
    pub auth_token: Option<String>,
}

/// 删除绘本命令
#[derive(Debug, Clone)]
pub struct DeleteBook {
    pub book_id: Uuid,
    pub auth_token: Option<String>,
}
