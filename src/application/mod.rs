//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGenerator、ImageSynthesizer、
//!   ObjectStorage、AccessControl、PdfRenderer、Repositories）
//! - generators: 内容生成器 / 插图生成器（流水线叶子组件）
//! - commands: CQRS 命令及处理器（生成流水线、认证、删除）
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod generators;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    handlers::{
        DeleteBookHandler, GenerateBookHandler, GenerateBookResponse, LoginOrRegisterHandler,
        LoginResponse, LogoutHandler, LogoutResponse, PipelineError, PipelineStage,
    },
    DeleteBook, GenerateBook, LoginOrRegister, Logout,
};

pub use error::ApplicationError;

pub use generators::{
    parse_story_draft, ChapterDraft, ContentError, ContentGenerator, ImageGenError,
    ImageGenerator, StoryDraft,
};

pub use ports::{
    AccessControlError, AccessControlPort, AuthSessionRecord, AuthSessionRepositoryPort,
    BookPage, BookRecord, BookRepositoryPort, ChapterRecord, ImageOutputConfig,
    ImageSynthesizerPort, ObjectStorageError, ObjectStoragePort, PdfRenderError, PdfRendererPort,
    RepositoryError, SynthesisError, TextGenError, TextGeneratorPort, UserIdentity, UserRecord,
    UserRepositoryPort,
};

pub use queries::{
    handlers::{
        BookDetailResponse, BookPageResponse, BookSummaryResponse, ChapterResponse,
        CurrentUserResponse, ExportBookPdfHandler, ExportedPdf, GetBookHandler,
        GetCurrentUserHandler, ListBooksHandler, ListUserBooksHandler, SearchBooksHandler,
    },
    ExportBookPdf, GetBook, GetCurrentUser, ListBooks, ListUserBooks, SearchBooks,
};
