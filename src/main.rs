//! Fabula - AI 绘本生成服务
//!
//! 架构:
//! - Domain: book/ (Bounded Context)
//! - Application: commands, queries, generators, ports
//! - Infrastructure: http, adapters, persistence

use std::sync::Arc;

use fabula::config::{load_config, print_config};
use fabula::infrastructure::adapters::{
    HttpImageClient, HttpImageClientConfig, HttpObjectStorage, HttpObjectStorageConfig,
    HttpTextClient, HttpTextClientConfig, SessionAccessControl, TypstBookRenderer,
};
// use fabula::infrastructure::adapters::{FakeImageClient, FakeTextClient};
use fabula::infrastructure::http::{AppState, HttpServer, ServerConfig};
use fabula::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAuthSessionRepository,
    SqliteBookRepository, SqliteUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},fabula={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Fabula - AI 绘本生成服务");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let book_repo = Arc::new(SqliteBookRepository::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));
    let session_repo = Arc::new(SqliteAuthSessionRepository::new(pool.clone()));

    // 创建文本生成客户端
    let text_gen_config =
        HttpTextClientConfig::new(config.text_gen.url.clone(), config.text_gen.api_key.clone())
            .with_model(config.text_gen.model.clone())
            .with_timeout(config.text_gen.timeout_secs);
    let text_gen = Arc::new(HttpTextClient::new(text_gen_config)?);

    // 创建图像合成客户端
    let image_gen_config = HttpImageClientConfig::new(
        config.image_gen.url.clone(),
        config.image_gen.api_token.clone(),
    )
    .with_model(config.image_gen.model.clone())
    .with_timeout(config.image_gen.timeout_secs);
    let image_synthesizer = Arc::new(HttpImageClient::new(image_gen_config)?);

    // // 离线开发用的 Fake 客户端（不调用外部服务）
    // let text_gen = Arc::new(FakeTextClient::new());
    // let image_synthesizer = Arc::new(FakeImageClient::new());

    // 创建对象存储客户端
    let storage_config = HttpObjectStorageConfig::new(
        config.object_storage.url.clone(),
        config.object_storage.api_key.clone(),
    )
    .with_timeout(config.object_storage.timeout_secs);
    let object_storage = Arc::new(HttpObjectStorage::new(storage_config)?);

    // 创建 PDF 渲染器
    let pdf_renderer = Arc::new(TypstBookRenderer::new());

    // 创建访问控制
    let access_control = Arc::new(SessionAccessControl::new(
        session_repo.clone(),
        user_repo.clone(),
    ));

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        text_gen,
        image_synthesizer,
        object_storage,
        pdf_renderer,
        book_repo,
        user_repo,
        session_repo,
        access_control,
        config.object_storage.folder.clone(),
        config.auth.session_ttl_secs,
    );

    let server = HttpServer::new(server_config, state);

    // 优雅关闭: Ctrl+C
    server
        .run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
        })
        .await?;

    Ok(())
}
