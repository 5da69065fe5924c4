//! News article storage.

use sqlx::sqlite::SqlitePool;

#[derive(Clone)]
pub struct NewsStore {
    pool: SqlitePool,
}

/// A news article.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NewsArticle {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
    pub published_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(sqlx::FromRow)]
struct NewsRow {
    id: i64,
    title: String,
    slug: String,
    excerpt: Option<String>,
    content: String,
    image_url: Option<String>,
    published: bool,
    published_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<NewsRow> for NewsArticle {
    fn from(row: NewsRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            content: row.content,
            image_url: row.image_url,
            published: row.published,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct NewsInput {
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub published: bool,
}

const NEWS_COLUMNS: &str = "id, title, slug, excerpt, content, image_url, published, published_at, created_at, updated_at";

impl NewsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an article. Returns its ID.
    /// `published_at` is stamped when the article is created already published.
    pub async fn create(&self, input: &NewsInput) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO news (title, slug, excerpt, content, image_url, published, published_at)
             VALUES (?, ?, ?, ?, ?, ?, CASE WHEN ? THEN datetime('now') END)",
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(input.published)
        .bind(input.published)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    /// Get an article by ID, published or not.
    pub async fn get(&self, id: i64) -> Result<Option<NewsArticle>, sqlx::Error> {
        let row: Option<NewsRow> =
            sqlx::query_as(&format!("SELECT {} FROM news WHERE id = ?", NEWS_COLUMNS))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(NewsArticle::from))
    }

    /// Get an article by slug, published or not.
    pub async fn get_by_slug(&self, slug: &str) -> Result<Option<NewsArticle>, sqlx::Error> {
        let row: Option<NewsRow> =
            sqlx::query_as(&format!("SELECT {} FROM news WHERE slug = ?", NEWS_COLUMNS))
                .bind(slug)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(NewsArticle::from))
    }

    /// List articles, newest first. Drafts are only included when asked for.
    pub async fn list(&self, include_unpublished: bool) -> Result<Vec<NewsArticle>, sqlx::Error> {
        let rows: Vec<NewsRow> = sqlx::query_as(&format!(
            "SELECT {} FROM news WHERE published = 1 OR ?
             ORDER BY COALESCE(published_at, created_at) DESC, id DESC",
            NEWS_COLUMNS
        ))
        .bind(include_unpublished)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(NewsArticle::from).collect())
    }

    /// Update an article. Returns true if it existed.
    /// The first transition to published stamps `published_at`; later edits keep it.
    pub async fn update(&self, id: i64, input: &NewsInput) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE news SET title = ?, slug = ?, excerpt = ?, content = ?, image_url = ?, published = ?,
                published_at = CASE WHEN ? AND published_at IS NULL THEN datetime('now') ELSE published_at END,
                updated_at = datetime('now')
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.slug)
        .bind(&input.excerpt)
        .bind(&input.content)
        .bind(&input.image_url)
        .bind(input.published)
        .bind(input.published)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an article. Returns true if it existed.
    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM news WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
