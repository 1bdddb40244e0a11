//! Book Queries

/// 根据 slug 获取绘本详情（含章节）
#[derive(Debug, Clone)]
pub struct GetBook {
    pub slug: String,
}

/// 分页列出所有绘本（最新优先，不含章节）
#[derive(Debug, Clone)]
pub struct ListBooks {
    pub page: u32,
    pub limit: u32,
}

/// 分页列出当前用户的绘本
#[derive(Debug, Clone)]
pub struct ListUserBooks {
    pub auth_token: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// 全文搜索绘本
#[derive(Debug, Clone)]
pub struct SearchBooks {
    pub query: String,
}

/// 导出绘本为 PDF
#[derive(Debug, Clone)]
pub struct ExportBookPdf {
    pub slug: String,
}
