//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    ContentGenerator,
    DeleteBookHandler,
    ExportBookPdfHandler,
    GenerateBookHandler,
    // Query handlers
    GetBookHandler,
    GetCurrentUserHandler,
    ImageGenerator,
    ListBooksHandler,
    ListUserBooksHandler,
    LoginOrRegisterHandler,
    LogoutHandler,
    SearchBooksHandler,
    // Ports
    AccessControlPort,
    AuthSessionRepositoryPort,
    BookRepositoryPort,
    ImageSynthesizerPort,
    ObjectStoragePort,
    PdfRendererPort,
    TextGeneratorPort,
    UserRepositoryPort,
};

/// 应用状态
pub struct AppState {
    // ========== Ports ==========
    pub book_repo: Arc<dyn BookRepositoryPort>,
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub session_repo: Arc<dyn AuthSessionRepositoryPort>,
    pub access_control: Arc<dyn AccessControlPort>,

    // ========== Command Handlers ==========
    pub generate_book_handler: GenerateBookHandler,
    pub delete_book_handler: DeleteBookHandler,
    pub login_handler: LoginOrRegisterHandler,
    pub logout_handler: LogoutHandler,

    // ========== Query Handlers ==========
    pub get_book_handler: GetBookHandler,
    pub list_books_handler: ListBooksHandler,
    pub list_user_books_handler: ListUserBooksHandler,
    pub search_books_handler: SearchBooksHandler,
    pub export_book_handler: ExportBookPdfHandler,
    pub current_user_handler: GetCurrentUserHandler,
}

impl AppState {
    /// 创建应用状态
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        text_gen: Arc<dyn TextGeneratorPort>,
        image_synthesizer: Arc<dyn ImageSynthesizerPort>,
        object_storage: Arc<dyn ObjectStoragePort>,
        pdf_renderer: Arc<dyn PdfRendererPort>,
        book_repo: Arc<dyn BookRepositoryPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        session_repo: Arc<dyn AuthSessionRepositoryPort>,
        access_control: Arc<dyn AccessControlPort>,
        storage_folder: String,
        session_ttl_secs: u64,
    ) -> Self {
        let content_generator = ContentGenerator::new(text_gen);
        let image_generator = Arc::new(ImageGenerator::new(
            image_synthesizer,
            object_storage,
            storage_folder,
        ));

        Self {
            // Ports
            book_repo: book_repo.clone(),
            user_repo: user_repo.clone(),
            session_repo: session_repo.clone(),
            access_control: access_control.clone(),

            // Command handlers
            generate_book_handler: GenerateBookHandler::new(
                content_generator,
                image_generator,
                book_repo.clone(),
                access_control.clone(),
            ),
            delete_book_handler: DeleteBookHandler::new(
                book_repo.clone(),
                access_control.clone(),
            ),
            login_handler: LoginOrRegisterHandler::new(
                user_repo.clone(),
                session_repo.clone(),
                session_ttl_secs,
            ),
            logout_handler: LogoutHandler::new(session_repo.clone()),

            // Query handlers
            get_book_handler: GetBookHandler::new(book_repo.clone()),
            list_books_handler: ListBooksHandler::new(book_repo.clone()),
            list_user_books_handler: ListUserBooksHandler::new(
                book_repo.clone(),
                access_control.clone(),
            ),
            search_books_handler: SearchBooksHandler::new(book_repo.clone()),
            export_book_handler: ExportBookPdfHandler::new(book_repo, pdf_renderer),
            current_user_handler: GetCurrentUserHandler::new(access_control),
        }
    }
}
