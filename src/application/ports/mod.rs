//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod access_control;
mod image_synthesizer;
mod object_storage;
mod pdf_renderer;
mod repositories;
mod text_generator;

pub use access_control::{AccessControlError, AccessControlPort, UserIdentity};
pub use image_synthesizer::{ImageOutputConfig, ImageSynthesizerPort, SynthesisError};
pub use object_storage::{ObjectStorageError, ObjectStoragePort};
pub use pdf_renderer::{PdfRenderError, PdfRendererPort};
pub use repositories::{
    AuthSessionRecord, AuthSessionRepositoryPort, BookPage, BookRecord, BookRepositoryPort,
    ChapterRecord, RepositoryError, UserRecord, UserRepositoryPort,
};
pub use text_generator::{TextGenError, TextGeneratorPort};
