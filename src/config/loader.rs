//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FABULA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FABULA_SERVER__PORT=8080`
/// - `FABULA_TEXT_GEN__API_KEY=...`
/// - `FABULA_IMAGE_GEN__API_TOKEN=...`
/// - `FABULA_DATABASE__PATH=/data/fabula.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5080)?
        .set_default("text_gen.url", "https://generativelanguage.googleapis.com")?
        .set_default("text_gen.model", "gemini-2.0-flash")?
        .set_default("text_gen.api_key", "")?
        .set_default("text_gen.timeout_secs", 120)?
        .set_default("image_gen.url", "https://api.replicate.com")?
        .set_default("image_gen.model", "bytedance/sdxl-lightning-4step")?
        .set_default("image_gen.api_token", "")?
        .set_default("image_gen.timeout_secs", 180)?
        .set_default("object_storage.url", "http://localhost:9000")?
        .set_default("object_storage.api_key", "")?
        .set_default("object_storage.folder", "storybooks")?
        .set_default("object_storage.timeout_secs", 60)?
        .set_default("database.path", "data/fabula.db")?
        .set_default("database.max_connections", 5)?
        .set_default("auth.session_ttl_secs", 7 * 24 * 60 * 60)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: FABULA_
    // 层级分隔符: __ (双下划线)
    // 例如: FABULA_TEXT_GEN__API_KEY=xxx
    builder = builder.add_source(
        Environment::with_prefix("FABULA")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证生成服务 URL
    if config.text_gen.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Text generation URL cannot be empty".to_string(),
        ));
    }

    if config.image_gen.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Image generation URL cannot be empty".to_string(),
        ));
    }

    if config.object_storage.url.is_empty() {
        return Err(ConfigError::ValidationError(
            "Object storage URL cannot be empty".to_string(),
        ));
    }

    // 验证数据库路径
    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    // 验证会话有效期
    if config.auth.session_ttl_secs == 0 {
        return Err(ConfigError::ValidationError(
            "Session TTL cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("Text Gen URL: {}", config.text_gen.url);
    tracing::info!("Text Gen Model: {}", config.text_gen.model);
    tracing::info!("Image Gen URL: {}", config.image_gen.url);
    tracing::info!("Image Gen Model: {}", config.image_gen.model);
    tracing::info!("Object Storage URL: {}", config.object_storage.url);
    tracing::info!("Object Storage Folder: {}", config.object_storage.folder);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        "Database Max Connections: {}",
        config.database.max_connections
    );
    tracing::info!("Session TTL: {}s", config.auth.session_ttl_secs);
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5080);
    }

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_text_gen_url() {
        let mut config = AppConfig::default();
        config.text_gen.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_session_ttl() {
        let mut config = AppConfig::default();
        config.auth.session_ttl_secs = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 6001\n\n[text_gen]\nmodel = \"test-model\"\n",
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6001);
        assert_eq!(config.text_gen.model, "test-model");
        // 未覆盖的段保持默认值
        assert_eq!(config.database.max_connections, 5);
    }
}
