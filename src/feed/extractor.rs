use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::countries::CountryCodes;
use super::patterns::{
    heading, is_table_artifact, looks_like_feed_url, trim_url_punctuation, BULLET_FEED,
    COUNTRY_HEADING, DOMAIN_COLUMN_ROW, EMBEDDED_URL, LINK_TABLE_ROW,
    RECOMMENDED_SOURCES_MARKER, TWO_COLUMN_ROW,
};
use super::record::FeedRecord;
use crate::util::{parse_http_url, plain_cell, strip_control_chars};

/// Layout of an awesome-list document, chosen by the caller.
///
/// Formats are never auto-detected from content. Use
/// [`SourceFormat::hints_for_url`] to derive a hint from a known source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceFormat {
    /// `### 🇬🇧 United Kingdom` sections holding `| title | url |` rows.
    CountryTable,
    /// `### Category` sections after `## Recommended Sources`, holding
    /// `| title | url | domain |` rows.
    CategoryTable,
    /// `## Category` sections holding
    /// `* title \- description (RSS feed: <url>)` bullets.
    BulletList,
    /// `## Category` sections holding `| [title](site) | <url> |` rows.
    LinkTable,
    /// Any line; every embedded URL that looks like a feed.
    Generic,
}

impl SourceFormat {
    pub const ALL: [SourceFormat; 5] = [
        SourceFormat::CountryTable,
        SourceFormat::CategoryTable,
        SourceFormat::BulletList,
        SourceFormat::LinkTable,
        SourceFormat::Generic,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::CountryTable => "country-table",
            SourceFormat::CategoryTable => "category-table",
            SourceFormat::BulletList => "bullet-list",
            SourceFormat::LinkTable => "link-table",
            SourceFormat::Generic => "generic",
        }
    }

    /// Formats to try for a source URL, based on the awesome-list repository
    /// it points at. Unknown sources fall back to [`SourceFormat::Generic`].
    pub fn hints_for_url(url: &str) -> &'static [SourceFormat] {
        if url.contains("allainews_sources") {
            &[SourceFormat::BulletList]
        } else if url.contains("awesome-AI-feeds") || url.contains("awesome-AI-news-feeds") {
            &[SourceFormat::LinkTable]
        } else if url.contains("awesome-rss-feeds") {
            &[SourceFormat::CountryTable, SourceFormat::CategoryTable]
        } else {
            &[SourceFormat::Generic]
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        SourceFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = SourceFormat::ALL.iter().map(|f| f.as_str()).collect();
                format!("unknown format '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Extracts feed records from markdown text in document order.
///
/// Lines that match no rule are skipped silently, so malformed input only
/// ever yields fewer records. Empty input yields an empty list. The same
/// URL may appear more than once; de-duplication belongs to the importer.
///
/// # Examples
///
/// ```
/// use feedatlas::feed::{extract, CountryCodes, SourceFormat};
///
/// let text = "See updates at https://example.com/feed.xml for details";
/// let records = extract(text, SourceFormat::Generic, &CountryCodes::default());
/// assert_eq!(records[0].title, "RSS Feed from example.com");
/// ```
pub fn extract(text: &str, format: SourceFormat, countries: &CountryCodes) -> Vec<FeedRecord> {
    let records = match format {
        SourceFormat::CountryTable => extract_country_table(text, countries),
        SourceFormat::CategoryTable => extract_category_table(text),
        SourceFormat::BulletList => extract_bullet_list(text),
        SourceFormat::LinkTable => extract_link_table(text),
        SourceFormat::Generic => extract_generic(text),
    };

    tracing::debug!(format = %format, records = records.len(), "Extracted feed records");
    records
}

/// Runs [`extract`] once per format and concatenates the results in the
/// order the formats are given.
pub fn extract_all(
    text: &str,
    formats: &[SourceFormat],
    countries: &CountryCodes,
) -> Vec<FeedRecord> {
    formats
        .iter()
        .flat_map(|format| extract(text, *format, countries))
        .collect()
}

// ============================================================================
// Per-format extraction
// ============================================================================

/// Country sections are block-scoped: a flag heading opens one, any other
/// heading (including `####` subheadings) closes it, and rows outside a
/// section are ignored.
pub fn extract_country_table(text: &str, countries: &CountryCodes) -> Vec<FeedRecord> {
    let mut records = Vec::new();
    let mut current_country: Option<String> = None;

    for line in text.lines() {
        if heading(line).is_some() {
            current_country = COUNTRY_HEADING
                .captures(line)
                .map(|caps| countries.code_for(&strip_control_chars(&caps[1])));
            continue;
        }

        let Some(code) = &current_country else {
            continue;
        };

        let Some(caps) = TWO_COLUMN_ROW.captures(line) else {
            tracing::trace!(line = %line, "No feed row on line");
            continue;
        };

        if let Some(mut record) = table_record(&caps[1], &caps[2]) {
            record.country_code = Some(code.clone());
            records.push(record);
        }
    }

    records
}

/// Only the part of the document after the `## Recommended Sources` line is
/// read. Level-3 headings open category sections; level 1-2 headings close
/// them.
pub fn extract_category_table(text: &str) -> Vec<FeedRecord> {
    let mut records = Vec::new();
    let mut lines = text.lines();

    if !lines
        .by_ref()
        .any(|line| line.trim_end() == RECOMMENDED_SOURCES_MARKER)
    {
        tracing::debug!(
            marker = RECOMMENDED_SOURCES_MARKER,
            "Section marker not found, nothing to extract"
        );
        return records;
    }

    let mut current_category: Option<String> = None;

    for line in lines {
        if let Some((level, text)) = heading(line) {
            match level {
                3 => current_category = clean_name(text),
                1 | 2 => current_category = None,
                _ => {}
            }
            continue;
        }

        let Some(category) = &current_category else {
            continue;
        };

        let Some(caps) = DOMAIN_COLUMN_ROW.captures(line) else {
            continue;
        };

        if let Some(mut record) = table_record(&caps[1], &caps[2]) {
            if let Some(domain) = caps.get(3).map(|m| plain_cell(m.as_str())) {
                if !domain.is_empty() {
                    record.domain = domain.to_string();
                }
            }
            record.category_name = Some(category.clone());
            records.push(record);
        }
    }

    records
}

/// Level-2 headings (except Contents/About) set the active category;
/// bullets before the first one are emitted untagged.
pub fn extract_bullet_list(text: &str) -> Vec<FeedRecord> {
    let mut records = Vec::new();
    let mut current_category: Option<String> = None;

    for line in text.lines() {
        if let Some((2, text)) = heading(line) {
            if !text.contains("Contents") && !text.contains("About") {
                current_category = clean_name(text);
            }
            continue;
        }

        let Some(caps) = BULLET_FEED.captures(line) else {
            continue;
        };

        let title = caps[1].trim();
        if title.is_empty() {
            continue;
        }

        if let Some(mut record) = feed_record(title, caps[3].trim()) {
            let description = strip_control_chars(caps[2].trim()).into_owned();
            record.description = Some(description).filter(|d| !d.is_empty());
            record.category_name = current_category.clone();
            records.push(record);
        }
    }

    records
}

/// Level-2 headings (except About) set the active category; rows before the
/// first one are emitted untagged.
pub fn extract_link_table(text: &str) -> Vec<FeedRecord> {
    let mut records = Vec::new();
    let mut current_category: Option<String> = None;

    for line in text.lines() {
        if let Some((2, text)) = heading(line) {
            if !text.contains("About") {
                current_category = clean_name(text);
            }
            continue;
        }

        let Some(caps) = LINK_TABLE_ROW.captures(line) else {
            continue;
        };

        if let Some(mut record) = table_record(&caps[1], &caps[2]) {
            record.category_name = current_category.clone();
            records.push(record);
        }
    }

    records
}

/// Every embedded URL containing a feed hint becomes an untagged record
/// titled after its domain.
pub fn extract_generic(text: &str) -> Vec<FeedRecord> {
    let mut records = Vec::new();

    for line in text.lines() {
        for found in EMBEDDED_URL.find_iter(line) {
            let url = trim_url_punctuation(found.as_str());
            if !looks_like_feed_url(url) {
                continue;
            }

            let Ok(parsed) = parse_http_url(url) else {
                tracing::debug!(url = %url, "Skipping unparseable embedded URL");
                continue;
            };

            let mut record = FeedRecord::new(String::new(), url, &parsed);
            record.title = format!("RSS Feed from {}", record.domain);
            records.push(record);
        }
    }

    records
}

// ============================================================================
// Helpers
// ============================================================================

/// Builds a record from a table's title and URL cells.
fn table_record(title_cell: &str, url_cell: &str) -> Option<FeedRecord> {
    feed_record(plain_cell(title_cell), plain_cell(url_cell))
}

/// Builds a record when `url` is an absolute http(s) URL and `title` is a
/// real name rather than a header label or separator run.
fn feed_record(title: &str, url: &str) -> Option<FeedRecord> {
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return None;
    }

    let title = clean_name(title)?;
    if is_table_artifact(&title) {
        tracing::trace!(title = %title, "Skipping header or separator title");
        return None;
    }

    match parse_http_url(url) {
        Ok(parsed) => Some(FeedRecord::new(title, url, &parsed)),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "Skipping feed row with invalid URL");
            None
        }
    }
}

fn clean_name(text: &str) -> Option<String> {
    let cleaned = strip_control_chars(text.trim());
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}
