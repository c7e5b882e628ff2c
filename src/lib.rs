//! Country/category RSS feed catalogue with awesome-list importers.
//!
//! The crate is split into three layers:
//!
//! - [`feed`] - fetches awesome-list markdown and extracts [`feed::FeedRecord`]s
//! - [`storage`] - SQLite catalogue of countries, categories and their feeds,
//!   including the bulk import contract
//! - [`config`] - optional TOML configuration
//!
//! ```ignore
//! use feedatlas::feed::{extract, fetch_source, CountryCodes, SourceFormat};
//! use feedatlas::storage::{Database, ImportDefaults};
//!
//! let countries = CountryCodes::default();
//! let text = fetch_source(&client, "https://raw.githubusercontent.com/.../README.md", None).await?;
//! let records = extract(&text, SourceFormat::BulletList, &countries);
//! let summary = db
//!     .bulk_import(&records, &ImportDefaults::new("General", "US"), &countries)
//!     .await;
//! ```

pub mod config;
pub mod feed;
pub mod storage;
pub mod util;
