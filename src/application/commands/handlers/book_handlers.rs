//! Book Command Handlers - 生成流水线与删除
//!
//! GenerateBookHandler 是整个服务的核心编排器:
//!
//! 线性状态机（失败即终止，不自动重试）:
//! 1. Drafting      - 构造提示词，生成故事草稿
//! 2. CoverImaging  - 生成封面插图
//! 3. ChapterImaging - 并发生成全部章节插图（按索引重新关联）
//! 4. Assembly      - 合并 URL，校验页码连续不变量
//! 5. Persisting    - 鉴权后单事务落库
//!
//! 任一阶段失败都不会留下半成品绘本；已上传的插图对象不回收。

use futures::future::try_join_all;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::commands::{DeleteBook, GenerateBook};
use crate::application::error::ApplicationError;
use crate::application::generators::{
    ContentError, ContentGenerator, ImageGenError, ImageGenerator, StoryDraft,
};
use crate::application::ports::{
    AccessControlPort, BookRecord, BookRepositoryPort, ChapterRecord, UserIdentity,
};
use crate::domain::book::{Book, BookError, Chapter, PageCount, Title};

// ============================================================================
// Pipeline error taxonomy
// ============================================================================

/// 流水线阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Drafting,
    CoverImaging,
    ChapterImaging,
    Assembly,
    Persisting,
}

impl PipelineStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineStage::Drafting => "drafting",
            PipelineStage::CoverImaging => "cover-imaging",
            PipelineStage::ChapterImaging => "chapter-imaging",
            PipelineStage::Assembly => "assembly",
            PipelineStage::Persisting => "persisting",
        }
    }
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 流水线终止错误，携带失败阶段标签
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Story drafting failed: {0}")]
    Draft(#[source] ContentError),

    #[error("Cover image failed: {0}")]
    CoverImage(#[source] ImageGenError),

    #[error("Chapter image failed: {0}")]
    ChapterImage(#[source] ImageGenError),

    #[error("Book assembly failed: {0}")]
    Invariant(#[source] BookError),

    #[error("You need to be logged in to create a story book")]
    Unauthenticated,

    #[error("Persisting the book failed: {0}")]
    Persistence(String),
}

impl PipelineError {
    /// 失败所在的阶段
    pub fn stage(&self) -> PipelineStage {
        match self {
            PipelineError::InvalidRequest(_) | PipelineError::Draft(_) => PipelineStage::Drafting,
            PipelineError::CoverImage(_) => PipelineStage::CoverImaging,
            PipelineError::ChapterImage(_) => PipelineStage::ChapterImaging,
            PipelineError::Invariant(_) => PipelineStage::Assembly,
            PipelineError::Unauthenticated | PipelineError::Persistence(_) => {
                PipelineStage::Persisting
            }
        }
    }
}

// ============================================================================
// GenerateBook
// ============================================================================

/// 生成响应
#[derive(Debug, Clone)]
pub struct GenerateBookResponse {
    pub book_id: Uuid,
    pub slug: String,
    pub title: String,
    pub chapter_count: usize,
}

/// GenerateBook Handler - 流水线编排器
pub struct GenerateBookHandler {
    content_generator: ContentGenerator,
    image_generator: Arc<ImageGenerator>,
    book_repo: Arc<dyn BookRepositoryPort>,
    access_control: Arc<dyn AccessControlPort>,
}

impl GenerateBookHandler {
    pub fn new(
        content_generator: ContentGenerator,
        image_generator: Arc<ImageGenerator>,
        book_repo: Arc<dyn BookRepositoryPort>,
        access_control: Arc<dyn AccessControlPort>,
    ) -> Self {
        Self {
            content_generator,
            image_generator,
            book_repo,
            access_control,
        }
    }

    /// 执行一次完整的生成流水线
    pub async fn handle(
        &self,
        command: GenerateBook,
    ) -> Result<GenerateBookResponse, PipelineError> {
        let page_count = PageCount::new(command.page_count)
            .map_err(|e| PipelineError::InvalidRequest(e.to_string()))?;
        if command.topic.trim().is_empty() {
            return Err(PipelineError::InvalidRequest(
                "topic cannot be empty".to_string(),
            ));
        }

        // Stage 1: Drafting
        let prompt = build_prompt(&command.topic, page_count.get());
        let draft = self
            .content_generator
            .generate(&prompt)
            .await
            .map_err(PipelineError::Draft)?;

        tracing::info!(
            stage = %PipelineStage::Drafting,
            title = %draft.title,
            chapters = draft.chapters.len(),
            "Draft ready"
        );

        // Stage 2: CoverImaging
        let cover_url = self
            .image_generator
            .generate(&draft.cover_description)
            .await
            .map_err(PipelineError::CoverImage)?;

        tracing::info!(stage = %PipelineStage::CoverImaging, "Cover image ready");

        // Stage 3: ChapterImaging - 并发生成，按索引重新关联
        let chapter_urls = self.generate_chapter_images(&draft).await?;

        tracing::info!(
            stage = %PipelineStage::ChapterImaging,
            images = chapter_urls.len(),
            "Chapter images ready"
        );

        // Stage 4: Assembly
        let book = assemble_book(&command.topic, draft, cover_url, chapter_urls)?;

        // Stage 5: Persisting - 鉴权一次，单事务写入
        let user = self
            .access_control
            .current_user(command.auth_token.as_deref())
            .await
            .map_err(|e| PipelineError::Persistence(e.to_string()))?
            .ok_or(PipelineError::Unauthenticated)?;

        let (record, chapter_records) = to_records(&book, &user);
        self.book_repo
            .create(&record, &chapter_records)
            .await
            .map_err(|e| {
                // 插图对象已上传且不回收，记录以便存储侧对账
                tracing::warn!(
                    stage = %PipelineStage::Persisting,
                    orphaned_images = chapter_records.len() + 1,
                    "Pipeline failed after image upload"
                );
                PipelineError::Persistence(e.to_string())
            })?;

        tracing::info!(
            book_id = %book.id(),
            slug = %book.slug(),
            author_id = %user.id,
            chapters = book.chapter_count(),
            "Book persisted"
        );

        Ok(GenerateBookResponse {
            book_id: *book.id().as_uuid(),
            slug: book.slug().as_str().to_string(),
            title: book.title().as_str().to_string(),
            chapter_count: book.chapter_count(),
        })
    }

    /// 章节插图 fan-out/fan-in
    ///
    /// 全部请求一起发起、联合等待；首个错误即终止 join，其余
    /// in-flight 的 future 随之丢弃。结果按章节索引重新关联，
    /// 与完成顺序无关。
    async fn generate_chapter_images(
        &self,
        draft: &StoryDraft,
    ) -> Result<Vec<String>, PipelineError> {
        let tasks = draft.chapters.iter().enumerate().map(|(index, chapter)| {
            let image_generator = self.image_generator.clone();
            let description = chapter.image_description.clone();
            async move {
                let url = image_generator.generate(&description).await?;
                Ok::<(usize, String), ImageGenError>((index, url))
            }
        });

        let indexed = try_join_all(tasks)
            .await
            .map_err(PipelineError::ChapterImage)?;

        let mut urls = vec![String::new(); draft.chapters.len()];
        for (index, url) in indexed {
            urls[index] = url;
        }
        Ok(urls)
    }
}

/// 构造故事生成提示词
///
/// 期望章节数嵌入提示词文本；模型按 JSON 契约返回
fn build_prompt(topic: &str, page_count: u8) -> String {
    format!(
        r#"Your job is to write a kids story book.
The topic of the story is: {topic}
The story must have exactly {page_count} chapters in an array format.

I need the response in JSON format with the following details:
- book title
- book cover description
- book chapters in an array format with each object containing story
  subTitle, textContent, page and imageDescription to generate
  a vibrant, cartoon-style illustration.

Example:
{{
  "bookTitle": "The Three Little Acorns learn about AI",
  "bookCoverDescription": "A vibrant, cartoon-style illustration of three acorns learning about AI under a large oak tree",
  "chapters": [
    {{
      "subTitle": "A Curious Acorn",
      "textContent": "Once upon a time...",
      "imageDescription": "A cartoon-style acorn looking at a computer screen",
      "page": 1
    }}
  ]
}}"#
    )
}

/// 合并草稿与插图 URL，组装聚合并校验不变量
fn assemble_book(
    topic: &str,
    draft: StoryDraft,
    cover_url: String,
    chapter_urls: Vec<String>,
) -> Result<Book, PipelineError> {
    let title = Title::new(draft.title)
        .map_err(|e| PipelineError::Invariant(BookError::InvalidTitle(e.to_string())))?;

    let chapters = draft
        .chapters
        .into_iter()
        .zip(chapter_urls)
        .map(|(chapter, url)| {
            Chapter::new(
                chapter.page_number,
                chapter.subtitle,
                chapter.text_content,
                chapter.image_description,
                url,
            )
            .map_err(|e| PipelineError::Invariant(BookError::InvalidChapter(e.to_string())))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Book::assemble(
        title,
        draft.cover_description,
        cover_url,
        topic.to_string(),
        chapters,
    )
    .map_err(PipelineError::Invariant)
}

/// 聚合转持久化记录
fn to_records(book: &Book, user: &UserIdentity) -> (BookRecord, Vec<ChapterRecord>) {
    let book_id = *book.id().as_uuid();

    let record = BookRecord {
        id: book_id,
        title: book.title().as_str().to_string(),
        slug: book.slug().as_str().to_string(),
        cover_description: book.cover_description().to_string(),
        cover_url: book.cover_url().to_string(),
        description: book.description().to_string(),
        author_id: user.id,
        author_name: Some(user.name.clone()),
        created_at: book.created_at(),
        updated_at: book.updated_at(),
    };

    let chapters = book
        .chapters()
        .iter()
        .map(|chapter| ChapterRecord {
            id: Uuid::new_v4(),
            book_id,
            page_number: chapter.page_number(),
            subtitle: chapter.subtitle().to_string(),
            text_content: chapter.text_content().to_string(),
            image_description: chapter.image_description().to_string(),
            image_url: chapter.image_url().to_string(),
        })
        .collect();

    (record, chapters)
}

// ============================================================================
// DeleteBook
// ============================================================================

/// DeleteBook Handler - 仅作者本人可删除
pub struct DeleteBookHandler {
    book_repo: Arc<dyn BookRepositoryPort>,
    access_control: Arc<dyn AccessControlPort>,
}

impl DeleteBookHandler {
    pub fn new(
        book_repo: Arc<dyn BookRepositoryPort>,
        access_control: Arc<dyn AccessControlPort>,
    ) -> Self {
        Self {
            book_repo,
            access_control,
        }
    }

    pub async fn handle(&self, command: DeleteBook) -> Result<(), ApplicationError> {
        let user = self
            .access_control
            .current_user(command.auth_token.as_deref())
            .await?
            .ok_or(ApplicationError::Unauthenticated)?;

        let book = self
            .book_repo
            .find_by_id(command.book_id)
            .await?
            .ok_or_else(|| {
                ApplicationError::not_found("Book", command.book_id.to_string())
            })?;

        if book.author_id != user.id {
            return Err(ApplicationError::Unauthorized);
        }

        self.book_repo.delete(command.book_id).await?;

        tracing::info!(
            book_id = %command.book_id,
            title = %book.title,
            "Book deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        AccessControlError, BookPage, ImageOutputConfig, ImageSynthesizerPort,
        ObjectStorageError, ObjectStoragePort, RepositoryError, SynthesisError, TextGenError,
        TextGeneratorPort,
    };
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    // ------------------------------------------------------------------
    // Fakes
    // ------------------------------------------------------------------

    fn draft_json(pages: &[u32]) -> String {
        let chapters: Vec<String> = pages
            .iter()
            .map(|p| {
                format!(
                    r#"{{"subTitle": "Chapter {p}", "textContent": "Text {p}", "imageDescription": "scene {p}", "page": {p}}}"#
                )
            })
            .collect();
        format!(
            r#"{{"bookTitle": "The Brave Turtle", "bookCoverDescription": "a turtle cover", "chapters": [{}]}}"#,
            chapters.join(",")
        )
    }

    struct FakeTextGen {
        response: String,
    }

    #[async_trait]
    impl TextGeneratorPort for FakeTextGen {
        async fn complete(&self, _prompt: &str) -> Result<String, TextGenError> {
            Ok(self.response.clone())
        }
    }

    /// 可注入失败与乱序完成的合成服务
    struct FakeSynthesizer {
        calls: AtomicUsize,
        /// 第 N 次调用返回失败（1-based），0 表示不失败
        fail_on_call: usize,
        /// 以调用序号反比延迟，打乱完成顺序
        scramble: bool,
    }

    impl FakeSynthesizer {
        fn ok() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on_call: 0,
                scramble: false,
            }
        }
    }

    #[async_trait]
    impl ImageSynthesizerPort for FakeSynthesizer {
        async fn synthesize(
            &self,
            description: &str,
            _config: &ImageOutputConfig,
        ) -> Result<String, SynthesisError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail_on_call == call {
                return Err(SynthesisError::NoOutput);
            }
            if self.scramble {
                // 后发的先完成
                let delay = 50u64.saturating_sub(call as u64 * 10);
                tokio::time::sleep(tokio::time::Duration::from_millis(delay)).await;
            }
            Ok(format!("https://transient.example.com/{}", description))
        }

        async fn download(&self, url: &str) -> Result<Vec<u8>, SynthesisError> {
            Ok(url.as_bytes().to_vec())
        }
    }

    struct FakeStorage;

    #[async_trait]
    impl ObjectStoragePort for FakeStorage {
        async fn upload(
            &self,
            bytes: &[u8],
            folder: &str,
            object_name: &str,
        ) -> Result<String, ObjectStorageError> {
            // durable URL 带上原描述，便于断言关联关系
            let tag = String::from_utf8_lossy(bytes).replace("https://transient.example.com/", "");
            Ok(format!(
                "https://cdn.example.com/{}/{}#{}",
                folder, object_name, tag
            ))
        }
    }

    struct RecordingRepo {
        created: Mutex<Vec<(BookRecord, Vec<ChapterRecord>)>>,
        fail_create: bool,
    }

    impl RecordingRepo {
        fn new() -> Self {
            Self {
                created: Mutex::new(Vec::new()),
                fail_create: false,
            }
        }
    }

    #[async_trait]
    impl BookRepositoryPort for RecordingRepo {
        async fn create(
            &self,
            book: &BookRecord,
            chapters: &[ChapterRecord],
        ) -> Result<(), RepositoryError> {
            if self.fail_create {
                return Err(RepositoryError::DatabaseError("disk full".to_string()));
            }
            self.created
                .lock()
                .unwrap()
                .push((book.clone(), chapters.to_vec()));
            Ok(())
        }

        async fn find_by_slug(
            &self,
            _slug: &str,
        ) -> Result<Option<(BookRecord, Vec<ChapterRecord>)>, RepositoryError> {
            Ok(None)
        }

        async fn find_by_id(&self, _id: Uuid) -> Result<Option<BookRecord>, RepositoryError> {
            Ok(None)
        }

        async fn find_page(&self, _page: u32, _limit: u32) -> Result<BookPage, RepositoryError> {
            Ok(BookPage {
                books: vec![],
                total_count: 0,
            })
        }

        async fn find_page_by_author(
            &self,
            _author_id: Uuid,
            _page: u32,
            _limit: u32,
        ) -> Result<BookPage, RepositoryError> {
            Ok(BookPage {
                books: vec![],
                total_count: 0,
            })
        }

        async fn delete(&self, _id: Uuid) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn search(
            &self,
            _query: &str,
            _limit: u32,
        ) -> Result<Vec<BookRecord>, RepositoryError> {
            Ok(vec![])
        }
    }

    struct FakeAccess {
        user: Option<UserIdentity>,
    }

    impl FakeAccess {
        fn logged_in() -> Self {
            Self {
                user: Some(UserIdentity {
                    id: Uuid::new_v4(),
                    name: "tester".to_string(),
                    role: "user".to_string(),
                    email: "tester@example.com".to_string(),
                }),
            }
        }

        fn anonymous() -> Self {
            Self { user: None }
        }
    }

    #[async_trait]
    impl AccessControlPort for FakeAccess {
        async fn current_user(
            &self,
            _token: Option<&str>,
        ) -> Result<Option<UserIdentity>, AccessControlError> {
            Ok(self.user.clone())
        }
    }

    fn handler_with(
        response: String,
        synthesizer: FakeSynthesizer,
        repo: Arc<RecordingRepo>,
        access: FakeAccess,
    ) -> (GenerateBookHandler, Arc<FakeSynthesizer>) {
        let synthesizer = Arc::new(synthesizer);
        let image_generator = Arc::new(ImageGenerator::new(
            synthesizer.clone(),
            Arc::new(FakeStorage),
            "storybooks",
        ));
        let content_generator =
            ContentGenerator::new(Arc::new(FakeTextGen { response }));
        (
            GenerateBookHandler::new(
                content_generator,
                image_generator,
                repo,
                Arc::new(access),
            ),
            synthesizer,
        )
    }

    fn command(topic: &str, page_count: u8) -> GenerateBook {
        GenerateBook {
            topic: topic.to_string(),
            page_count,
            auth_token: Some("token".to_string()),
        }
    }

    // ------------------------------------------------------------------
    // Tests
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_successful_run_persists_book_in_page_order() {
        let repo = Arc::new(RecordingRepo::new());
        let (handler, synthesizer) = handler_with(
            draft_json(&[1, 2, 3]),
            FakeSynthesizer::ok(),
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let response = handler.handle(command("a brave turtle", 3)).await.unwrap();

        assert_eq!(response.chapter_count, 3);
        assert!(response.slug.starts_with("the-brave-turtle-"));
        // 1 封面 + 3 章节
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 4);

        let created = repo.created.lock().unwrap();
        assert_eq!(created.len(), 1);
        let (book, chapters) = &created[0];
        assert_eq!(book.title, "The Brave Turtle");
        let pages: Vec<u32> = chapters.iter().map(|c| c.page_number).collect();
        assert_eq!(pages, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_chapter_order_stable_under_scrambled_completion() {
        let repo = Arc::new(RecordingRepo::new());
        let synthesizer = FakeSynthesizer {
            calls: AtomicUsize::new(0),
            fail_on_call: 0,
            scramble: true,
        };
        let (handler, _) = handler_with(
            draft_json(&[1, 2, 3, 4]),
            synthesizer,
            repo.clone(),
            FakeAccess::logged_in(),
        );

        handler.handle(command("scrambled", 4)).await.unwrap();

        let created = repo.created.lock().unwrap();
        let (_, chapters) = &created[0];
        // 插图按章节索引关联，与完成顺序无关
        for chapter in chapters {
            assert!(
                chapter.image_url.ends_with(&format!("#scene {}", chapter.page_number)),
                "chapter {} got {}",
                chapter.page_number,
                chapter.image_url
            );
        }
    }

    #[tokio::test]
    async fn test_chapter_count_follows_draft_not_request() {
        // 请求 5 页，模型只给 2 章：结构合法即接受
        let repo = Arc::new(RecordingRepo::new());
        let (handler, _) = handler_with(
            draft_json(&[1, 2]),
            FakeSynthesizer::ok(),
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let response = handler.handle(command("short story", 5)).await.unwrap();
        assert_eq!(response.chapter_count, 2);
    }

    #[tokio::test]
    async fn test_malformed_draft_fails_before_any_image_call() {
        let repo = Arc::new(RecordingRepo::new());
        let (handler, synthesizer) = handler_with(
            "definitely not json".to_string(),
            FakeSynthesizer::ok(),
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("broken", 3)).await.unwrap_err();

        assert_eq!(err.stage(), PipelineStage::Drafting);
        assert!(matches!(
            err,
            PipelineError::Draft(ContentError::MalformedResponse(_))
        ));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
        assert!(repo.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_single_chapter_image_failure_aborts_pipeline() {
        let repo = Arc::new(RecordingRepo::new());
        // 第 3 次调用失败 = 封面成功后第 2 个章节插图失败
        let synthesizer = FakeSynthesizer {
            calls: AtomicUsize::new(0),
            fail_on_call: 3,
            scramble: false,
        };
        let (handler, _) = handler_with(
            draft_json(&[1, 2, 3]),
            synthesizer,
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("doomed", 3)).await.unwrap_err();

        assert_eq!(err.stage(), PipelineStage::ChapterImaging);
        assert!(repo.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cover_failure_tagged_cover_imaging() {
        let repo = Arc::new(RecordingRepo::new());
        let synthesizer = FakeSynthesizer {
            calls: AtomicUsize::new(0),
            fail_on_call: 1,
            scramble: false,
        };
        let (handler, _) = handler_with(
            draft_json(&[1]),
            synthesizer,
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("no cover", 1)).await.unwrap_err();
        assert_eq!(err.stage(), PipelineStage::CoverImaging);
    }

    #[tokio::test]
    async fn test_unauthenticated_fails_at_persisting_without_write() {
        let repo = Arc::new(RecordingRepo::new());
        let (handler, synthesizer) = handler_with(
            draft_json(&[1, 2]),
            FakeSynthesizer::ok(),
            repo.clone(),
            FakeAccess::anonymous(),
        );

        let err = handler.handle(command("anonymous", 2)).await.unwrap_err();

        assert!(matches!(err, PipelineError::Unauthenticated));
        assert_eq!(err.stage(), PipelineStage::Persisting);
        // 草稿与插图已经发生，但没有任何持久化写入
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 3);
        assert!(repo.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_page_gap_fails_at_assembly() {
        let repo = Arc::new(RecordingRepo::new());
        let (handler, _) = handler_with(
            draft_json(&[1, 3]),
            FakeSynthesizer::ok(),
            repo.clone(),
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("gap", 2)).await.unwrap_err();

        assert_eq!(err.stage(), PipelineStage::Assembly);
        assert!(matches!(err, PipelineError::Invariant(_)));
        assert!(repo.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_tagged_persisting() {
        let repo = Arc::new(RecordingRepo {
            created: Mutex::new(Vec::new()),
            fail_create: true,
        });
        let (handler, _) = handler_with(
            draft_json(&[1]),
            FakeSynthesizer::ok(),
            repo,
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("db down", 1)).await.unwrap_err();
        assert_eq!(err.stage(), PipelineStage::Persisting);
        assert!(matches!(err, PipelineError::Persistence(_)));
    }

    #[tokio::test]
    async fn test_page_count_out_of_range_rejected() {
        let repo = Arc::new(RecordingRepo::new());
        let (handler, synthesizer) = handler_with(
            draft_json(&[1]),
            FakeSynthesizer::ok(),
            repo,
            FakeAccess::logged_in(),
        );

        let err = handler.handle(command("too many", 11)).await.unwrap_err();
        assert!(matches!(err, PipelineError::InvalidRequest(_)));
        assert_eq!(synthesizer.calls.load(Ordering::SeqCst), 0);
    }
}
