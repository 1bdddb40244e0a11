//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 文本生成服务配置
    #[serde(default)]
    pub text_gen: TextGenConfig,

    /// 图像合成服务配置
    #[serde(default)]
    pub image_gen: ImageGenConfig,

    /// 对象存储配置
    #[serde(default)]
    pub object_storage: ObjectStorageConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            text_gen: TextGenConfig::default(),
            image_gen: ImageGenConfig::default(),
            object_storage: ObjectStorageConfig::default(),
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 文本生成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct TextGenConfig {
    /// 服务基础 URL
    #[serde(default = "default_text_gen_url")]
    pub url: String,

    /// 模型名称
    #[serde(default = "default_text_gen_model")]
    pub model: String,

    /// API Key
    #[serde(default)]
    pub api_key: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_text_gen_timeout")]
    pub timeout_secs: u64,
}

fn default_text_gen_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_text_gen_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_text_gen_timeout() -> u64 {
    120
}

impl Default for TextGenConfig {
    fn default() -> Self {
        Self {
            url: default_text_gen_url(),
            model: default_text_gen_model(),
            api_key: String::new(),
            timeout_secs: default_text_gen_timeout(),
        }
    }
}

/// 图像合成服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenConfig {
    /// 服务基础 URL
    #[serde(default = "default_image_gen_url")]
    pub url: String,

    /// 模型版本标识
    #[serde(default = "default_image_gen_model")]
    pub model: String,

    /// API Token
    #[serde(default)]
    pub api_token: String,

    /// 单次合成超时时间（秒）
    #[serde(default = "default_image_gen_timeout")]
    pub timeout_secs: u64,
}

fn default_image_gen_url() -> String {
    "https://api.replicate.com".to_string()
}

fn default_image_gen_model() -> String {
    "bytedance/sdxl-lightning-4step".to_string()
}

fn default_image_gen_timeout() -> u64 {
    180
}

impl Default for ImageGenConfig {
    fn default() -> Self {
        Self {
            url: default_image_gen_url(),
            model: default_image_gen_model(),
            api_token: String::new(),
            timeout_secs: default_image_gen_timeout(),
        }
    }
}

/// 对象存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStorageConfig {
    /// 上传端点基础 URL
    #[serde(default = "default_storage_url")]
    pub url: String,

    /// API Key
    #[serde(default)]
    pub api_key: String,

    /// 默认上传目录
    #[serde(default = "default_storage_folder")]
    pub folder: String,

    /// 上传超时时间（秒）
    #[serde(default = "default_storage_timeout")]
    pub timeout_secs: u64,
}

fn default_storage_url() -> String {
    "http://localhost:9000".to_string()
}

fn default_storage_folder() -> String {
    "storybooks".to_string()
}

fn default_storage_timeout() -> u64 {
    60
}

impl Default for ObjectStorageConfig {
    fn default() -> Self {
        Self {
            url: default_storage_url(),
            api_key: String::new(),
            folder: default_storage_folder(),
            timeout_secs: default_storage_timeout(),
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/fabula.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 认证配置
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// 会话有效期（秒）
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: u64,
}

fn default_session_ttl() -> u64 {
    7 * 24 * 60 * 60 // 7 天
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: default_session_ttl(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 5080);
        assert_eq!(config.text_gen.model, "gemini-2.0-flash");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.auth.session_ttl_secs, 7 * 24 * 60 * 60);
    }

    #[test]
    fn test_server_addr() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
        };
        assert_eq!(config.addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_database_url() {
        let config = DatabaseConfig {
            path: "data/test.db".to_string(),
            max_connections: 1,
        };
        assert_eq!(config.database_url(), "sqlite:data/test.db?mode=rwc");
    }
}
