//! SQLite Book Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    BookPage, BookRecord, BookRepositoryPort, ChapterRecord, RepositoryError,
};

/// SQLite Book Repository
pub struct SqliteBookRepository {
    pool: DbPool,
}

impl SqliteBookRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// books 行（LEFT JOIN users 带出作者名）
#[derive(FromRow)]
struct BookRow {
    id: String,
    title: String,
    slug: String,
    cover_description: String,
    cover_url: String,
    description: String,
    author_id: String,
    author_name: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<BookRow> for BookRecord {
    type Error = RepositoryError;

    fn try_from(row: BookRow) -> Result<Self, Self::Error> {
        Ok(BookRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            slug: row.slug,
            cover_description: row.cover_description,
            cover_url: row.cover_url,
            description: row.description,
            author_id: Uuid::parse_str(&row.author_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            author_name: row.author_name,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct ChapterRow {
    id: String,
    book_id: String,
    page_number: i64,
    subtitle: String,
    text_content: String,
    image_description: String,
    image_url: String,
}

impl TryFrom<ChapterRow> for ChapterRecord {
    type Error = RepositoryError;

    fn try_from(row: ChapterRow) -> Result<Self, Self::Error> {
        Ok(ChapterRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            book_id: Uuid::parse_str(&row.book_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            page_number: row.page_number as u32,
            subtitle: row.subtitle,
            text_content: row.text_content,
            image_description: row.image_description,
            image_url: row.image_url,
        })
    }
}

const BOOK_COLUMNS: &str = "b.id, b.title, b.slug, b.cover_description, b.cover_url, \
     b.description, b.author_id, u.name AS author_name, b.created_at, b.updated_at";

fn map_db_error(e: sqlx::Error, context: &str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            return RepositoryError::Duplicate(context.to_string());
        }
    }
    RepositoryError::DatabaseError(e.to_string())
}

#[async_trait]
impl BookRepositoryPort for SqliteBookRepository {
    async fn create(
        &self,
        book: &BookRecord,
        chapters: &[ChapterRecord],
    ) -> Result<(), RepositoryError> {
        // 使用事务保证绘本与章节的原子写入
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO books (id, title, slug, cover_description, cover_url, description, author_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(book.id.to_string())
        .bind(&book.title)
        .bind(&book.slug)
        .bind(&book.cover_description)
        .bind(&book.cover_url)
        .bind(&book.description)
        .bind(book.author_id.to_string())
        .bind(book.created_at.to_rfc3339())
        .bind(book.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| map_db_error(e, &book.slug))?;

        for chapter in chapters {
            sqlx::query(
                r#"
                INSERT INTO chapters (id, book_id, page_number, subtitle, text_content, image_description, image_url)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(chapter.id.to_string())
            .bind(chapter.book_id.to_string())
            .bind(chapter.page_number as i64)
            .bind(&chapter.subtitle)
            .bind(&chapter.text_content)
            .bind(&chapter.image_description)
            .bind(&chapter.image_url)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_db_error(e, &book.slug))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_slug(
        &self,
        slug: &str,
    ) -> Result<Option<(BookRecord, Vec<ChapterRecord>)>, RepositoryError> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books b LEFT JOIN users u ON b.author_id = u.id WHERE b.slug = ?",
            BOOK_COLUMNS
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let book = BookRecord::try_from(row)?;

        let chapter_rows: Vec<ChapterRow> = sqlx::query_as(
            "SELECT id, book_id, page_number, subtitle, text_content, image_description, image_url \
             FROM chapters WHERE book_id = ? ORDER BY page_number ASC",
        )
        .bind(book.id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let chapters = chapter_rows
            .into_iter()
            .map(ChapterRecord::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some((book, chapters)))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BookRecord>, RepositoryError> {
        let row: Option<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books b LEFT JOIN users u ON b.author_id = u.id WHERE b.id = ?",
            BOOK_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(BookRecord::try_from).transpose()
    }

    async fn find_page(&self, page: u32, limit: u32) -> Result<BookPage, RepositoryError> {
        let offset = (page.saturating_sub(1)) as i64 * limit as i64;

        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books b LEFT JOIN users u ON b.author_id = u.id \
             ORDER BY b.created_at DESC LIMIT ? OFFSET ?",
            BOOK_COLUMNS
        ))
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let total_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(BookPage {
            books: rows
                .into_iter()
                .map(BookRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total_count: total_count as u64,
        })
    }

    async fn find_page_by_author(
        &self,
        author_id: Uuid,
        page: u32,
        limit: u32,
    ) -> Result<BookPage, RepositoryError> {
        let offset = (page.saturating_sub(1)) as i64 * limit as i64;

        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books b LEFT JOIN users u ON b.author_id = u.id \
             WHERE b.author_id = ? ORDER BY b.created_at DESC LIMIT ? OFFSET ?",
            BOOK_COLUMNS
        ))
        .bind(author_id.to_string())
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        let total_count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = ?")
                .bind(author_id.to_string())
                .fetch_one(&self.pool)
                .await
                .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(BookPage {
            books: rows
                .into_iter()
                .map(BookRecord::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            total_count: total_count as u64,
        })
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保原子性
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM chapters WHERE book_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM books WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn search(&self, query: &str, limit: u32) -> Result<Vec<BookRecord>, RepositoryError> {
        let pattern = format!("%{}%", query);

        let rows: Vec<BookRow> = sqlx::query_as(&format!(
            "SELECT {} FROM books b LEFT JOIN users u ON b.author_id = u.id \
             WHERE b.title LIKE ?1 OR EXISTS (\
                 SELECT 1 FROM chapters c WHERE c.book_id = b.id \
                 AND (c.subtitle LIKE ?1 OR c.text_content LIKE ?1)\
             ) \
             ORDER BY b.created_at DESC LIMIT ?2",
            BOOK_COLUMNS
        ))
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(BookRecord::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig, SqliteUserRepository};
    use super::*;
    use crate::application::ports::{UserRecord, UserRepositoryPort};

    async fn setup() -> (SqliteBookRepository, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let user_repo = SqliteUserRepository::new(pool.clone());
        let author_id = Uuid::new_v4();
        user_repo
            .save(&UserRecord {
                id: author_id,
                email: "author@example.com".to_string(),
                password_hash: "hash".to_string(),
                name: "author".to_string(),
                role: "user".to_string(),
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await
            .unwrap();

        (SqliteBookRepository::new(pool), author_id)
    }

    fn book(author_id: Uuid, slug: &str) -> BookRecord {
        BookRecord {
            id: Uuid::new_v4(),
            title: "The Brave Turtle".to_string(),
            slug: slug.to_string(),
            cover_description: "a turtle cover".to_string(),
            cover_url: "https://cdn.example.com/cover.png".to_string(),
            description: "a brave turtle".to_string(),
            author_id,
            author_name: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn chapter(book_id: Uuid, page: u32, text: &str) -> ChapterRecord {
        ChapterRecord {
            id: Uuid::new_v4(),
            book_id,
            page_number: page,
            subtitle: format!("Chapter {}", page),
            text_content: text.to_string(),
            image_description: "scene".to_string(),
            image_url: format!("https://cdn.example.com/{}.png", page),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_by_slug() {
        let (repo, author_id) = setup().await;
        let record = book(author_id, "turtle-abc123");
        let chapters = vec![
            chapter(record.id, 1, "Once upon a time"),
            chapter(record.id, 2, "The long swim"),
        ];

        repo.create(&record, &chapters).await.unwrap();

        let (found, found_chapters) = repo.find_by_slug("turtle-abc123").await.unwrap().unwrap();
        assert_eq!(found.title, "The Brave Turtle");
        // 作者名由 JOIN 填充
        assert_eq!(found.author_name.as_deref(), Some("author"));
        assert_eq!(found_chapters.len(), 2);
        assert_eq!(found_chapters[0].page_number, 1);
        assert_eq!(found_chapters[1].page_number, 2);
    }

    #[tokio::test]
    async fn test_duplicate_slug_rejected() {
        let (repo, author_id) = setup().await;
        repo.create(&book(author_id, "same-slug"), &[]).await.unwrap();

        let result = repo.create(&book(author_id, "same-slug"), &[]).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_page_counts_and_paginates() {
        let (repo, author_id) = setup().await;
        for i in 0..3 {
            repo.create(&book(author_id, &format!("slug-{}", i)), &[])
                .await
                .unwrap();
        }

        let page = repo.find_page(1, 2).await.unwrap();
        assert_eq!(page.books.len(), 2);
        assert_eq!(page.total_count, 3);

        let page2 = repo.find_page(2, 2).await.unwrap();
        assert_eq!(page2.books.len(), 1);
    }

    #[tokio::test]
    async fn test_find_page_by_author_filters() {
        let (repo, author_id) = setup().await;
        repo.create(&book(author_id, "mine"), &[]).await.unwrap();

        let other = Uuid::new_v4();
        let page = repo.find_page_by_author(other, 1, 10).await.unwrap();
        assert_eq!(page.total_count, 0);

        let mine = repo.find_page_by_author(author_id, 1, 10).await.unwrap();
        assert_eq!(mine.total_count, 1);
    }

    #[tokio::test]
    async fn test_delete_removes_chapters() {
        let (repo, author_id) = setup().await;
        let record = book(author_id, "to-delete");
        repo.create(&record, &[chapter(record.id, 1, "text")])
            .await
            .unwrap();

        repo.delete(record.id).await.unwrap();

        assert!(repo.find_by_slug("to-delete").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_chapter_text() {
        let (repo, author_id) = setup().await;
        let record = book(author_id, "searchable");
        repo.create(
            &record,
            &[chapter(record.id, 1, "the turtle crossed the wide bay")],
        )
        .await
        .unwrap();

        let hits = repo.search("wide bay", 100).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].slug, "searchable");

        let misses = repo.search("spaceship", 100).await.unwrap();
        assert!(misses.is_empty());
    }
}
