//! Fabula - AI 绘本生成服务
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Book Context: 绘本限界上下文（聚合、章节、值对象）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextGenerator, ImageSynthesizer, ObjectStorage,
//!   AccessControl, PdfRenderer, Repositories）
//! - Generators: 内容生成器 / 插图生成器
//! - Commands: CQRS 命令处理器（生成流水线、认证、删除）
//! - Queries: CQRS 查询处理器（详情、分页、搜索、PDF 导出）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Adapters: 文本生成 / 图像合成 / 对象存储 / 访问控制 / PDF 渲染
//! - Persistence: SQLite 存储

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
