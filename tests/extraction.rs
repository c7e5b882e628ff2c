//! Integration tests for markdown extraction over whole documents.
//!
//! The documents below mirror the layout of the public awesome-lists the
//! extractor targets, trimmed to a few sections each.

use feedatlas::feed::{extract, extract_all, CountryCodes, FeedRecord, SourceFormat};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

const AWESOME_RSS_FEEDS: &str = "\
# Awesome RSS Feeds

A curated list of RSS feeds by country and category.

## Countries

### 🇦🇺 Australia
| Source | Primary Feed Url |
|--------|------------------|
| ABC News | https://www.abc.net.au/news/feed/51120/rss.xml |
| Sydney Morning Herald | https://www.smh.com.au/rss/feed.xml |

### 🇬🇧 United Kingdom
| Source | Primary Feed Url |
|--------|------------------|
| BBC News | http://feeds.bbci.co.uk/news/rss.xml |
| The Guardian | https://www.theguardian.com/uk/rss |

### 🇲🇲 Myanmar (Burma)
| Source | Primary Feed Url |
|--------|------------------|
| The Irrawaddy | https://www.irrawaddy.com/feed |

## Recommended Sources

### Android
| Title | RSS Feed Url | Domain |
|-------|--------------|--------|
| Android Police | https://www.androidpolice.com/feed/ | androidpolice.com |
| Android Central | https://www.androidcentral.com/feed | androidcentral.com |

### Tech
| Title | RSS Feed Url | Domain |
|-------|--------------|--------|
| [TechCrunch](https://techcrunch.com) | <https://techcrunch.com/feed/> | |
| The Verge | https://www.theverge.com/rss/index.xml | theverge.com |
";

const ALLAINEWS_SOURCES: &str = r"
# All AI News Sources

## Contents
* [News](#news)
* [Research](#research)

## News
* VentureBeat AI \- AI news and analysis (RSS feed: <https://venturebeat.com/category/ai/feed/>)
* The Gradient \- essays on AI (RSS feed: <https://thegradient.pub/rss/>)

## Research
* OpenAI Blog \- Official blog (RSS feed: <https://openai.com/blog/rss/>)
* Not a feed line (see https://example.com)

## About
Maintained by volunteers.
";

const AWESOME_AI_FEEDS: &str = "\
# awesome-AI-feeds

## Blogs
| Name | Feed |
|------|------|
| [Distill](https://distill.pub) | <https://distill.pub/rss.xml> |
| [BAIR](https://bair.berkeley.edu/blog/) | <https://bair.berkeley.edu/blog/feed.xml> |

## About
| [Ignored Source](https://x.example) | <https://x.example/feed> |
";

fn urls(records: &[FeedRecord]) -> Vec<&str> {
    records.iter().map(|r| r.feed_url.as_str()).collect()
}

// ============================================================================
// awesome-rss-feeds layout
// ============================================================================

#[test]
fn test_country_sections() {
    let records = extract(
        AWESOME_RSS_FEEDS,
        SourceFormat::CountryTable,
        &CountryCodes::default(),
    );

    let tagged: Vec<_> = records
        .iter()
        .map(|r| (r.title.as_str(), r.country_code.as_deref()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("ABC News", Some("AU")),
            ("Sydney Morning Herald", Some("AU")),
            ("BBC News", Some("GB")),
            ("The Guardian", Some("GB")),
            ("The Irrawaddy", Some("MM")),
        ]
    );
    assert!(records.iter().all(|r| r.category_name.is_none()));
}

#[test]
fn test_category_sections() {
    let records = extract(
        AWESOME_RSS_FEEDS,
        SourceFormat::CategoryTable,
        &CountryCodes::default(),
    );

    assert_eq!(
        urls(&records),
        vec![
            "https://www.androidpolice.com/feed/",
            "https://www.androidcentral.com/feed",
            "https://techcrunch.com/feed/",
            "https://www.theverge.com/rss/index.xml",
        ]
    );
    assert_eq!(records[2].title, "TechCrunch");
    assert_eq!(records[2].domain, "techcrunch.com");
    assert_eq!(records[2].category_name.as_deref(), Some("Tech"));
    assert_eq!(records[0].category_name.as_deref(), Some("Android"));
}

#[test]
fn test_combined_hints_for_awesome_rss_feeds() {
    let url = "https://raw.githubusercontent.com/WAI-laboratory/awesome-rss-feeds/master/README.md";
    let records = extract_all(
        AWESOME_RSS_FEEDS,
        SourceFormat::hints_for_url(url),
        &CountryCodes::default(),
    );
    assert_eq!(records.len(), 9);
    assert!(records[..5].iter().all(|r| r.country_code.is_some()));
    assert!(records[5..].iter().all(|r| r.category_name.is_some()));
}

// ============================================================================
// allainews_sources and awesome-AI-feeds layouts
// ============================================================================

#[test]
fn test_bullet_document() {
    let records = extract(
        ALLAINEWS_SOURCES,
        SourceFormat::BulletList,
        &CountryCodes::default(),
    );

    let tagged: Vec<_> = records
        .iter()
        .map(|r| (r.title.as_str(), r.category_name.as_deref()))
        .collect();
    assert_eq!(
        tagged,
        vec![
            ("VentureBeat AI", Some("News")),
            ("The Gradient", Some("News")),
            ("OpenAI Blog", Some("Research")),
        ]
    );
    assert_eq!(
        records[2].description.as_deref(),
        Some("Official blog")
    );
}

#[test]
fn test_link_table_document() {
    let records = extract(
        AWESOME_AI_FEEDS,
        SourceFormat::LinkTable,
        &CountryCodes::default(),
    );

    assert_eq!(
        urls(&records),
        vec![
            "https://distill.pub/rss.xml",
            "https://bair.berkeley.edu/blog/feed.xml",
            "https://x.example/feed",
        ]
    );
    // "About" is not a section header, so the last row stays under Blogs
    assert!(records
        .iter()
        .all(|r| r.category_name.as_deref() == Some("Blogs")));
}

#[test]
fn test_generic_fallback_on_table_document() {
    let records = extract(
        AWESOME_AI_FEEDS,
        SourceFormat::Generic,
        &CountryCodes::default(),
    );
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].title, "RSS Feed from distill.pub");
    assert!(records.iter().all(|r| r.category_name.is_none()));
}

// ============================================================================
// Properties
// ============================================================================

fn document_line() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z ]{0,20}".prop_map(|t| format!("### 🇫🇷 {t}")),
        "[a-zA-Z ]{1,20}".prop_map(|t| format!("## {t}")),
        "[a-zA-Z ]{1,20}".prop_map(|t| format!("### {t}")),
        Just("## Recommended Sources".to_string()),
        ("[a-zA-Z ]{0,12}", "[a-z:/.<>-]{0,24}").prop_map(|(t, u)| format!("| {t} | {u} |")),
        ("[a-zA-Z ]{1,12}", "[a-z]{1,8}")
            .prop_map(|(t, h)| format!("| {t} | https://{h}.example/rss |")),
        ("[a-zA-Z ]{1,12}", "[a-z]{1,8}")
            .prop_map(|(t, h)| format!("* {t} \\- news (RSS feed: <https://{h}.example/feed>)")),
        ("[a-zA-Z ]{1,12}", "[a-z]{1,8}")
            .prop_map(|(t, h)| format!("| [{t}](https://{h}.example) | <http://{h}.example/atom> |")),
        "[ -~]{0,40}",
        Just("| --- | --- |".to_string()),
    ]
}

fn document() -> impl Strategy<Value = String> {
    prop::collection::vec(document_line(), 0..40).prop_map(|lines| lines.join("\n"))
}

fn any_format() -> impl Strategy<Value = SourceFormat> {
    prop::sample::select(SourceFormat::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_every_feed_url_is_http(text in document(), format in any_format()) {
        for record in extract(&text, format, &CountryCodes::default()) {
            prop_assert!(
                record.feed_url.starts_with("http://") || record.feed_url.starts_with("https://"),
                "bad url {:?}",
                record.feed_url
            );
            prop_assert!(!record.title.trim().is_empty());
            prop_assert!(!record.domain.is_empty());
        }
    }

    #[test]
    fn prop_extraction_is_idempotent(text in document(), format in any_format()) {
        let codes = CountryCodes::default();
        prop_assert_eq!(extract(&text, format, &codes), extract(&text, format, &codes));
    }

    #[test]
    fn prop_arbitrary_text_never_panics(text in ".{0,400}", format in any_format()) {
        let _ = extract(&text, format, &CountryCodes::default());
    }
}
