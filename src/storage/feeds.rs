use anyhow::Result;

use super::schema::Database;
use super::types::StoredFeed;

impl Database {
    // ========================================================================
    // Cross-grouping Feed Lookups
    // ========================================================================

    /// First stored row for a feed URL across categories and countries.
    ///
    /// Category rows win ties, so `group_name` is a category name when the
    /// feed is filed under one.
    pub async fn find_feed_by_url(&self, feed_url: &str) -> Result<Option<StoredFeed>> {
        let feed = sqlx::query_as(
            r#"
            SELECT id, title, feed_url, domain, description, group_name, imported_at
            FROM (
                SELECT f.id, f.title, f.feed_url, f.domain, f.description,
                       c.name AS group_name, f.imported_at, 0 AS source
                FROM category_feeds f
                JOIN categories c ON c.id = f.category_id
                WHERE f.feed_url = ?
                UNION ALL
                SELECT f.id, f.title, f.feed_url, f.domain, f.description,
                       c.code AS group_name, f.imported_at, 1 AS source
                FROM country_feeds f
                JOIN countries c ON c.id = f.country_id
                WHERE f.feed_url = ?
            )
            ORDER BY imported_at, source, id
            LIMIT 1
            "#,
        )
        .bind(feed_url)
        .bind(feed_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(feed)
    }

    /// Number of distinct feed URLs in the catalogue.
    pub async fn count_distinct_feeds(&self) -> Result<i64> {
        let row: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM (
                SELECT feed_url FROM category_feeds
                UNION
                SELECT feed_url FROM country_feeds
            )
            "#,
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(row.0)
    }
}
