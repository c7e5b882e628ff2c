use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use url::Url;

/// One normalized feed entry extracted from a source document.
///
/// Serialized in the camelCase shape the bulk import contract expects
/// (`feedUrl`, `categoryName`, `countryCode`). Optional fields are omitted
/// when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    /// Display name of the feed. Never empty.
    pub title: String,
    /// Absolute `http`/`https` URL of the feed; the catalogue-wide key.
    pub feed_url: String,
    /// Host of `feed_url` without a leading `www.`, unless the source
    /// supplied an explicit domain column.
    pub domain: String,
    /// Description captured by formats that carry one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category section active where the record was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    /// Country section active where the record was found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl FeedRecord {
    /// Builds an untagged record, deriving the domain from `parsed`.
    ///
    /// `feed_url` is kept exactly as written in the source; `parsed` is its
    /// already-validated form.
    pub(crate) fn new(title: impl Into<String>, feed_url: &str, parsed: &Url) -> Self {
        Self {
            title: title.into(),
            feed_url: feed_url.to_string(),
            domain: domain_of(parsed),
            description: None,
            category_name: None,
            country_code: None,
        }
    }
}

/// Returns the host of `url` with a single leading `www.` removed.
///
/// # Examples
///
/// ```
/// use feedatlas::feed::domain_of;
/// use url::Url;
///
/// let url = Url::parse("https://www.theverge.com/rss/index.xml").unwrap();
/// assert_eq!(domain_of(&url), "theverge.com");
/// ```
pub fn domain_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match host.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => rest.to_string(),
        _ => host.to_string(),
    }
}

/// Counts over an extracted record list, reported by dry runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordStats {
    pub total: usize,
    pub unique_urls: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_country: BTreeMap<String, usize>,
    /// Records carrying neither a category nor a country.
    pub untagged: usize,
}

impl RecordStats {
    pub fn from_records(records: &[FeedRecord]) -> Self {
        let mut stats = RecordStats {
            total: records.len(),
            ..Default::default()
        };
        let mut urls = HashSet::new();

        for record in records {
            urls.insert(record.feed_url.as_str());
            if let Some(category) = &record.category_name {
                *stats.by_category.entry(category.clone()).or_default() += 1;
            }
            if let Some(country) = &record.country_code {
                *stats.by_country.entry(country.clone()).or_default() += 1;
            }
            if record.category_name.is_none() && record.country_code.is_none() {
                stats.untagged += 1;
            }
        }

        stats.unique_urls = urls.len();
        stats
    }
}
