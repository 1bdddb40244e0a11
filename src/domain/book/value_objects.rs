//! Book Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 绘本唯一标识
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 绘本标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err("标题不能为空");
        }
        if title.len() > 200 {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL 友好的绘本标识符
///
/// 不变量:
/// - 仅含小写字母、数字和连字符
/// - 携带随机后缀，标题相同的绘本也不会冲突
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slug(String);

impl Slug {
    /// 由标题派生 slug，附加 6 位随机后缀
    pub fn from_title(title: &Title) -> Self {
        let base = slugify(title.as_str());
        let suffix: String = Uuid::new_v4().simple().to_string()[..6].to_string();
        if base.is_empty() {
            Self(suffix)
        } else {
            Self(format!("{}-{}", base, suffix))
        }
    }

    /// 从已持久化的字符串还原
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 将任意文本转为小写连字符形式
///
/// 非字母数字字符折叠为单个连字符，首尾不留连字符
fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last_dash = true; // 抑制开头的连字符

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }

    while out.ends_with('-') {
        out.pop();
    }

    out
}

/// 请求的绘本页数
///
/// 不变量: 1 <= count <= 10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCount(u8);

impl PageCount {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(count: u8) -> Result<Self, &'static str> {
        if !(Self::MIN..=Self::MAX).contains(&count) {
            return Err("页数必须在 1 到 10 之间");
        }
        Ok(Self(count))
    }

    pub fn get(&self) -> u8 {
        self.0
    }
}
