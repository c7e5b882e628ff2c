use serde::Serialize;
use thiserror::Error;

use crate::feed::FeedRecord;

// ============================================================================
// Error Types
// ============================================================================

/// Database-specific errors with user-friendly messages
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Another process holds a lock on the database file
    #[error("The catalogue database is locked by another process. Please try again.")]
    Locked,

    /// Migration failed
    #[error("Database migration failed: {0}")]
    Migration(String),

    /// Generic database error
    #[error("Database error: {0}")]
    Other(#[from] sqlx::Error),
}

impl DatabaseError {
    /// Check if a sqlx error indicates database locking
    pub(crate) fn from_sqlx(err: sqlx::Error) -> Self {
        if is_lock_message(&err.to_string()) {
            return DatabaseError::Locked;
        }
        DatabaseError::Other(err)
    }
}

/// SQLITE_BUSY (5), SQLITE_LOCKED (6) and SQLITE_CANTOPEN (14) messages.
pub(crate) fn is_lock_message(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("database is locked")
        || message.contains("database table is locked")
        || message.contains("sqlite_busy")
        || message.contains("sqlite_locked")
        || message.contains("unable to open database file")
}

/// Per-record failures raised while importing into the catalogue.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The grouping already holds a feed with this URL
    #[error("Feed already exists in {grouping}: {url}")]
    DuplicateFeed { grouping: String, url: String },

    /// A category or country needed for the record could not be resolved
    #[error("Could not resolve {kind} '{name}'")]
    StorageLookupFailed { kind: &'static str, name: String },

    /// The record itself is unusable (bad URL, empty title)
    #[error("Invalid feed '{url}': {reason}")]
    InvalidFeed { url: String, reason: String },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl ImportError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, ImportError::DuplicateFeed { .. })
    }
}

// ============================================================================
// Data Structures
// ============================================================================

/// Country grouping row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
}

/// Category grouping row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Feed stored under a country or category.
///
/// `group_name` is the owning category name or country code, depending on the
/// query that produced the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StoredFeed {
    pub id: i64,
    pub title: String,
    pub feed_url: String,
    pub domain: String,
    pub description: Option<String>,
    pub group_name: String,
    /// Unix timestamp of insertion
    pub imported_at: i64,
}

/// Feed to be inserted into a grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeed {
    pub title: String,
    pub feed_url: String,
    pub domain: String,
    pub description: Option<String>,
}

impl From<&FeedRecord> for NewFeed {
    fn from(record: &FeedRecord) -> Self {
        NewFeed {
            title: record.title.clone(),
            feed_url: record.feed_url.clone(),
            domain: record.domain.clone(),
            description: record.description.clone(),
        }
    }
}

/// Fallback groupings for records without their own tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDefaults {
    pub category: String,
    pub country_code: String,
}

impl ImportDefaults {
    pub fn new(category: impl Into<String>, country_code: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            country_code: country_code.into(),
        }
    }
}

/// Outcome of a bulk import batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub success: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub errors: Vec<String>,
}

impl ImportSummary {
    /// Records seen by the batch.
    pub fn total(&self) -> usize {
        self.success + self.failed + self.duplicates
    }
}
