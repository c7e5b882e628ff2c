//! Feed discovery from awesome-list markdown documents.
//!
//! - **Fetching**: single-attempt HTTP retrieval of a source document
//! - **Extraction**: pure, line-oriented scanning of the document into
//!   [`FeedRecord`]s, one function per [`SourceFormat`]
//! - **Sources**: the preset source catalogue, GitHub raw URL rewriting and
//!   the curated built-in feed list
//!
//! # Example
//!
//! ```ignore
//! use feedatlas::feed::{extract_all, fetch_source, github_raw_url, CountryCodes, SourceFormat};
//!
//! let url = "https://github.com/WAI-laboratory/awesome-rss-feeds/blob/master/README.md";
//! let text = fetch_source(&client, &github_raw_url(url), None).await?;
//! let records = extract_all(&text, SourceFormat::hints_for_url(url), &CountryCodes::default());
//! ```

mod countries;
mod extractor;
mod fetcher;
mod patterns;
mod record;
mod sources;

pub use countries::CountryCodes;
pub use extractor::{
    extract, extract_all, extract_bullet_list, extract_category_table, extract_country_table,
    extract_generic, extract_link_table, SourceFormat,
};
pub use fetcher::{build_client, fetch_source, FetchCause, FetchError, MAX_SOURCE_SIZE};
pub use record::{domain_of, FeedRecord, RecordStats};
pub use sources::{
    curated_ai_feeds, github_raw_url, preset, SourcePreset, CURATED_DEFAULT_CATEGORY,
    CURATED_DEFAULT_COUNTRY, PRESET_SOURCES,
};
