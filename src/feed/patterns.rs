//! Line patterns recognised by the markdown extractor.
//!
//! Each rule is a named constant so the policy for what counts as a header,
//! a feed row or a decorative artifact can be changed without touching the
//! scanning loops in [`super::extractor`].

use regex::Regex;
use std::sync::LazyLock;

/// Any ATX heading. Group 1 is the run of `#`, group 2 the heading text.
pub static HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(#{1,6})[ \t]+(.+?)[ \t]*$").expect("heading pattern compiles")
});

/// Level-3 heading opening with a flag emoji (two regional indicator
/// symbols), e.g. `### 🇬🇧 United Kingdom`. Group 1 is the country name.
pub static COUNTRY_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^###[ \t]+[\x{1F1E6}-\x{1F1FF}]{2}\x{FE0F}?[ \t]*(.+?)[ \t]*$")
        .expect("country heading pattern compiles")
});

/// Line that opens the part of a document the category-table format reads.
pub const RECOMMENDED_SOURCES_MARKER: &str = "## Recommended Sources";

/// Two-column pipe row `| title | url |`. Wider rows match on their first
/// two cells.
pub static TWO_COLUMN_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|([^|]+)\|([^|]+)\|").expect("two-column row pattern compiles")
});

/// Pipe row `| title | url | domain |` where the domain cell is optional.
/// Group 3 is absent for two-column rows.
pub static DOMAIN_COLUMN_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|([^|]+)\|([^|]+)\|(?:([^|]*)\|)?")
        .expect("domain-column row pattern compiles")
});

/// Bullet line `* <title> \- <description> (RSS feed: <<url>>)`.
/// Only the escaped `\-` separates title from description, so titles may
/// contain a plain ` - `.
pub static BULLET_FEED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\* (.+?) \\- (.+?) \(RSS feed: <(.+?)>\)")
        .expect("bullet feed pattern compiles")
});

/// Row `| [title](site) | <url> |` used by the awesome-AI-feeds lists.
pub static LINK_TABLE_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*\|\s*\[(.+?)\]\([^)]*\)\s*\|\s*<(.+?)>\s*\|")
        .expect("link table row pattern compiles")
});

/// Absolute URL embedded anywhere in a line of prose or markup.
pub static EMBEDDED_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>()\[\]"'`|]+"#).expect("embedded url pattern compiles")
});

/// Case-insensitive substrings that make an embedded URL a feed candidate.
pub const FEED_URL_HINTS: &[&str] = &["/rss", "/feed", "/atom", ".xml", ".rss"];

/// Header-row labels that are never feed titles.
pub const HEADER_ROW_LABELS: &[&str] = &["Source", "Title"];

/// Trailing characters trimmed from URLs found in prose.
const URL_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?'];

/// Returns `true` when a table title cell is decoration rather than a feed:
/// empty, a separator run like `---` or `:---:`, or a header-row label.
pub fn is_table_artifact(title: &str) -> bool {
    let title = title.trim();
    title.is_empty()
        || title.contains("---")
        || title.chars().all(|c| matches!(c, '-' | ':' | ' '))
        || HEADER_ROW_LABELS
            .iter()
            .any(|label| title.eq_ignore_ascii_case(label))
}

/// Returns `true` when an embedded URL looks like an RSS/Atom endpoint.
pub fn looks_like_feed_url(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    FEED_URL_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Strips sentence punctuation that the URL pattern swallowed.
pub fn trim_url_punctuation(url: &str) -> &str {
    url.trim_end_matches(URL_TRAILING_PUNCTUATION)
}

/// Parses a line as a heading, returning `(level, text)`.
pub fn heading(line: &str) -> Option<(usize, &str)> {
    let caps = HEADING.captures(line)?;
    let level = caps.get(1)?.as_str().len();
    let text = caps.get(2)?.as_str();
    Some((level, text))
}
