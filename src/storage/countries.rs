use anyhow::Result;
use sqlx::SqliteConnection;

use super::categories::sanitize_name;
use super::schema::Database;
use super::types::{Country, ImportError, NewFeed, StoredFeed};

/// Country codes are stored uppercased.
fn normalize_code(code: &str) -> Result<String> {
    Ok(sanitize_name(code, "Country code")?.to_uppercase())
}

impl Database {
    // ========================================================================
    // Country Operations
    // ========================================================================

    /// All countries ordered by code.
    pub async fn list_countries(&self) -> Result<Vec<Country>> {
        let countries = sqlx::query_as("SELECT id, name, code FROM countries ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        Ok(countries)
    }

    /// Look up a country by code (case-insensitive).
    pub async fn find_country(&self, code: &str) -> Result<Option<Country>> {
        let Ok(code) = normalize_code(code) else {
            return Ok(None);
        };

        let country = sqlx::query_as("SELECT id, name, code FROM countries WHERE code = ?")
            .bind(&code)
            .fetch_optional(&self.pool)
            .await?;
        Ok(country)
    }

    /// Return the country with this code, creating it with `name` if needed.
    ///
    /// An existing country keeps its stored name. A blank `name` falls back to
    /// the code.
    pub async fn find_or_create_country(&self, code: &str, name: &str) -> Result<Country> {
        let code = normalize_code(code)?;
        let name = sanitize_name(name, "Country").unwrap_or_else(|_| code.clone());

        let inserted = sqlx::query(
            "INSERT INTO countries (name, code) VALUES (?, ?) ON CONFLICT(code) DO NOTHING",
        )
        .bind(&name)
        .bind(&code)
        .execute(&self.pool)
        .await?;
        if inserted.rows_affected() > 0 {
            tracing::info!(code = %code, name = %name, "Created country");
        }

        let country = sqlx::query_as("SELECT id, name, code FROM countries WHERE code = ?")
            .bind(&code)
            .fetch_one(&self.pool)
            .await?;
        Ok(country)
    }

    // ========================================================================
    // Country Feed Operations
    // ========================================================================

    /// Add a feed to a country.
    ///
    /// Returns the new row ID, or [`ImportError::DuplicateFeed`] when the
    /// country already holds a feed with the same URL.
    pub async fn create_country_feed(
        &self,
        country: &Country,
        feed: &NewFeed,
    ) -> Result<i64, ImportError> {
        let mut conn = self.pool.acquire().await?;
        insert_country_feed(&mut *conn, country, feed).await
    }

    /// Feeds for a country code, oldest first. Unknown codes yield an empty
    /// list.
    pub async fn get_feeds_by_country(&self, code: &str) -> Result<Vec<StoredFeed>> {
        let Ok(code) = normalize_code(code) else {
            return Ok(Vec::new());
        };

        let feeds = sqlx::query_as(
            r#"
            SELECT f.id, f.title, f.feed_url, f.domain, f.description,
                   c.code AS group_name, f.imported_at
            FROM country_feeds f
            JOIN countries c ON c.id = f.country_id
            WHERE c.code = ?
            ORDER BY f.id
            "#,
        )
        .bind(&code)
        .fetch_all(&self.pool)
        .await?;
        Ok(feeds)
    }
}

/// Inserts a country feed on `conn`, which may be an open transaction.
pub(crate) async fn insert_country_feed(
    conn: &mut SqliteConnection,
    country: &Country,
    feed: &NewFeed,
) -> Result<i64, ImportError> {
    let now = chrono::Utc::now().timestamp();

    let row: Option<(i64,)> = sqlx::query_as(
        r#"
        INSERT INTO country_feeds
            (title, feed_url, domain, description, country_id, imported_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(country_id, feed_url) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(&feed.title)
    .bind(&feed.feed_url)
    .bind(&feed.domain)
    .bind(&feed.description)
    .bind(country.id)
    .bind(now)
    .fetch_optional(&mut *conn)
    .await?;

    match row {
        Some((id,)) => Ok(id),
        None => Err(ImportError::DuplicateFeed {
            grouping: format!("country {}", country.code),
            url: feed.feed_url.clone(),
        }),
    }
}
