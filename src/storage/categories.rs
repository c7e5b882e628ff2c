use anyhow::{bail, Result};

use sqlx::SqliteConnection;

use super::schema::Database;
use super::types::{Category, ImportError, NewFeed, StoredFeed};
use crate::util::strip_control_chars;

/// Strips control characters (terminal escape injection), trims whitespace
/// and rejects names that end up empty.
pub(crate) fn sanitize_name(name: &str, what: &str) -> Result<String> {
    let sanitized = strip_control_chars(name);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() {
        bail!("{} name cannot be empty or whitespace-only", what);
    }
    Ok(trimmed.to_owned())
}

impl Database {
    // ========================================================================
    // Category Operations
    // ========================================================================

    /// All categories ordered by name.
    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        let categories = sqlx::query_as("SELECT id, name FROM categories ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    /// Look up a category by name. Names are matched after sanitization.
    pub async fn find_category(&self, name: &str) -> Result<Option<Category>> {
        let Ok(clean_name) = sanitize_name(name, "Category") else {
            return Ok(None);
        };

        let category = sqlx::query_as("SELECT id, name FROM categories WHERE name = ?")
            .bind(&clean_name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    /// Return the category with this name, creating it first if needed.
    ///
    /// The name is sanitized (control chars stripped, whitespace trimmed)
    /// before lookup and insertion.
    pub async fn find_or_create_category(&self, name: &str) -> Result<Category> {
        let clean_name = sanitize_name(name, "Category")?;

        let inserted =
            sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
                .bind(&clean_name)
                .execute(&self.pool)
                .await?;
        if inserted.rows_affected() > 0 {
            tracing::info!(category = %clean_name, "Created category");
        }

        let category = sqlx::query_as("SELECT id, name FROM categories WHERE name = ?")
            .bind(&clean_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(category)
    }

    // ========================================================================
    // Category Feed Operations
    // ========================================================================

    /// Add a feed to a category.
    ///
    /// Returns the new row ID, or [`ImportError::DuplicateFeed`] when the
    /// category already holds a feed with the same URL.
    pub async fn create_category_feed(
        &self,
        category: &Category,
        feed: &NewFeed,
    ) -> Result<i64, ImportError> {
        let mut conn = self.pool.acquire().await?;
        insert_category_feed(&mut *conn, category, feed).await
    }

    /// Feeds in the named category, oldest first. Unknown names yield an
    /// empty list.
    pub async fn get_feeds_by_category(&self, name: &str) -> Result<Vec<StoredFeed>> {
        let Ok(clean_name) = sanitize_name(name, "Category") else {
            return Ok(Vec::new());
        };

        let feeds = sqlx::query_as(
            r#"
            SELECT f.id, f.title, f.feed_url, f.domain, f.description,
                   c.name AS group_name, f.imported_at
            FROM category_feeds f
            JOIN categories c ON c.id = f.category_id
            WHERE c.name = ?
            ORDER BY f.id
            "#,
        )
        .bind(&clean_name)
        .fetch_all(&self.pool)
        .await?;
        Ok(feeds)
    }

    /// Every category feed, grouped by category name.
    pub async fn get_all_category_feeds(&self) -> Result<Vec<StoredFeed>> {
        let feeds = sqlx::query_as(
            r#"
            SELECT f.id, f.title, f.feed_url, f.domain, f.description,
                   c.name AS group_name, f.imported_at
            FROM category_feeds f
            JOIN categories c ON c.id = f.category_id
            ORDER BY c.name, f.id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(feeds)
    }
}

/// Inserts a category feed on `conn`, which may be an open transaction.
pub(crate) async fn insert_category_feed(
    conn: &mut SqliteConnection,
    category: &Category,
    feed: &NewFeed,
) -> Result<i64, ImportError> {
    let now = chrono::Utc::now().timestamp();

    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO category_feeds
            (title, feed_url, domain, description, category_id, imported_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(category_id, feed_url) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&feed.title)
    .bind(&feed.feed_url)
    .bind(&feed.domain)
    .bind(&feed.description)
    .bind(category.id)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(ImportError::DuplicateFeed {
            grouping: format!("category '{}'", category.name),
            url: feed.feed_url.clone(),
        }),
    }
}
