//! Integration tests for the extract → import → query lifecycle.
//!
//! Each test runs against a fresh in-memory catalogue.

use feedatlas::feed::{
    build_client, curated_ai_feeds, extract, extract_all, fetch_source, CountryCodes,
    FeedRecord, SourceFormat, CURATED_DEFAULT_CATEGORY, CURATED_DEFAULT_COUNTRY,
};
use feedatlas::storage::{Database, ImportDefaults, ImportSummary};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn test_db() -> Database {
    Database::open(":memory:")
        .await
        .expect("in-memory catalogue opens")
}

fn defaults() -> ImportDefaults {
    ImportDefaults::new("General", "US")
}

fn untagged(title: &str, url: &str) -> FeedRecord {
    FeedRecord {
        title: title.to_string(),
        feed_url: url.to_string(),
        domain: url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_string))
            .unwrap_or_default(),
        description: None,
        category_name: None,
        country_code: None,
    }
}

const COUNTRY_DOCUMENT: &str = "\
### 🇬🇧 United Kingdom
| Source | Primary Feed Url |
|--------|------------------|
| BBC News | http://feeds.bbci.co.uk/news/rss.xml |
| The Guardian | https://www.theguardian.com/uk/rss |

### 🇯🇵 Japan
| Source | Primary Feed Url |
|--------|------------------|
| NHK World | https://www3.nhk.or.jp/rss/news/cat0.xml |
";

// ============================================================================
// Extract then import
// ============================================================================

#[tokio::test]
async fn test_extracted_records_round_trip() {
    let db = test_db().await;
    let countries = CountryCodes::default();
    let records = extract(COUNTRY_DOCUMENT, SourceFormat::CountryTable, &countries);
    assert_eq!(records.len(), 3);

    let summary = db.bulk_import(&records, &defaults(), &countries).await;
    assert_eq!(summary.success, 3);
    assert_eq!(summary.failed, 0);

    for record in &records {
        let stored = db
            .find_feed_by_url(&record.feed_url)
            .await
            .unwrap()
            .expect("imported feed is stored");
        assert_eq!(stored.title, record.title);
        assert_eq!(stored.domain, record.domain);
    }

    let gb = db.get_feeds_by_country("gb").await.unwrap();
    let titles: Vec<_> = gb.iter().map(|f| f.title.as_str()).collect();
    assert_eq!(titles, vec!["BBC News", "The Guardian"]);

    let jp = db.find_country("JP").await.unwrap().unwrap();
    assert_eq!(jp.name, "Japan");

    // Untagged category side lands in the default
    assert_eq!(db.get_feeds_by_category("General").await.unwrap().len(), 3);
    assert_eq!(db.count_distinct_feeds().await.unwrap(), 3);
}

#[tokio::test]
async fn test_reimport_reports_duplicates() {
    let db = test_db().await;
    let countries = CountryCodes::default();
    let records = extract(COUNTRY_DOCUMENT, SourceFormat::CountryTable, &countries);

    db.bulk_import(&records, &defaults(), &countries).await;
    let second = db.bulk_import(&records, &defaults(), &countries).await;

    assert_eq!(
        second,
        ImportSummary {
            success: 0,
            failed: 0,
            duplicates: 3,
            errors: vec![],
        }
    );
    assert_eq!(db.count_distinct_feeds().await.unwrap(), 3);
}

#[tokio::test]
async fn test_combined_formats_file_one_url_under_both_groupings() {
    let document = "\
### 🇨🇦 Canada
| Source | Primary Feed Url |
|--------|------------------|
| CBC | https://www.cbc.ca/cmlink/rss-topstories |

## Recommended Sources

### News
| Title | RSS Feed Url | Domain |
|-------|--------------|--------|
| CBC | https://www.cbc.ca/cmlink/rss-topstories | cbc.ca |
";
    let db = test_db().await;
    let countries = CountryCodes::default();
    let records = extract_all(
        document,
        &[SourceFormat::CountryTable, SourceFormat::CategoryTable],
        &countries,
    );
    assert_eq!(records.len(), 2);

    let summary = db.bulk_import(&records, &defaults(), &countries).await;
    // The second record adds the News category row; its country row (US
    // default) is new as well
    assert_eq!(summary.success, 2);
    assert_eq!(db.get_feeds_by_category("News").await.unwrap().len(), 1);
    assert_eq!(db.get_feeds_by_country("CA").await.unwrap().len(), 1);
    assert_eq!(db.count_distinct_feeds().await.unwrap(), 1);
}

// ============================================================================
// Defaults and failures
// ============================================================================

#[tokio::test]
async fn test_custom_defaults() {
    let db = test_db().await;
    let summary = db
        .bulk_import(
            &[untagged("Example", "https://example.com/feed.xml")],
            &ImportDefaults::new("Science", "de"),
            &CountryCodes::default(),
        )
        .await;
    assert_eq!(summary.success, 1);

    let categories = db.list_categories().await.unwrap();
    assert_eq!(categories.len(), 1);
    assert_eq!(categories[0].name, "Science");

    let germany = db.find_country("DE").await.unwrap().unwrap();
    assert_eq!(germany.name, "Germany");
}

#[tokio::test]
async fn test_failures_are_collected_not_fatal() {
    let db = test_db().await;
    let records = [
        untagged("Loopback", "http://127.0.0.1/rss"),
        untagged("Good", "https://example.org/rss"),
        untagged("Scheme", "ftp://example.org/rss"),
    ];

    let summary = db
        .bulk_import(&records, &defaults(), &CountryCodes::default())
        .await;
    assert_eq!(summary.success, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total(), 3);
    assert!(summary.errors[0].starts_with("Failed to import Loopback"));
    assert!(summary.errors[1].starts_with("Failed to import Scheme"));
    assert!(db
        .find_feed_by_url("http://127.0.0.1/rss")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_blank_default_country_fails_untagged_records() {
    let db = test_db().await;
    let summary = db
        .bulk_import(
            &[untagged("Example", "https://example.com/rss")],
            &ImportDefaults::new("General", ""),
            &CountryCodes::default(),
        )
        .await;
    assert_eq!(summary.failed, 1);
    assert!(summary.errors[0].contains("Could not resolve country"));
}

#[tokio::test]
async fn test_records_loaded_from_json() {
    let json = r#"[
        {"title": "Hacker News", "feedUrl": "https://news.ycombinator.com/rss",
         "domain": "news.ycombinator.com", "categoryName": "Tech"},
        {"title": "Le Monde", "feedUrl": "https://www.lemonde.fr/rss/une.xml",
         "domain": "lemonde.fr", "countryCode": "FR"}
    ]"#;
    let records: Vec<FeedRecord> = serde_json::from_str(json).unwrap();

    let db = test_db().await;
    let summary = db
        .bulk_import(&records, &defaults(), &CountryCodes::default())
        .await;
    assert_eq!(summary.success, 2);

    let tech = db.get_feeds_by_category("Tech").await.unwrap();
    assert_eq!(tech[0].feed_url, "https://news.ycombinator.com/rss");
    let france = db.find_country("FR").await.unwrap().unwrap();
    assert_eq!(france.name, "France");
}

// ============================================================================
// Curated list
// ============================================================================

#[tokio::test]
async fn test_curated_list_imports_cleanly() {
    let db = test_db().await;
    let records = curated_ai_feeds();
    let defaults = ImportDefaults::new(CURATED_DEFAULT_CATEGORY, CURATED_DEFAULT_COUNTRY);

    let summary = db
        .bulk_import(&records, &defaults, &CountryCodes::default())
        .await;
    assert_eq!(summary.success, records.len());
    assert!(summary.errors.is_empty());

    let again = db
        .bulk_import(&records, &defaults, &CountryCodes::default())
        .await;
    assert_eq!(again.duplicates, records.len());
}

// ============================================================================
// Fetch → extract → import
// ============================================================================

#[tokio::test]
async fn test_fetched_document_pipeline() {
    let server = MockServer::start().await;
    let body = "\
## Research
| Name | Feed |
|------|------|
| [Distill](https://distill.pub) | <https://distill.pub/rss.xml> |
";
    Mock::given(method("GET"))
        .and(path("/awesome-AI-feeds/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let url = format!("{}/awesome-AI-feeds/README.md", server.uri());
    let client = build_client("feedatlas-test", None).unwrap();
    let text = fetch_source(&client, &url, None).await.unwrap();

    let countries = CountryCodes::default();
    let records = extract_all(&text, SourceFormat::hints_for_url(&url), &countries);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].category_name.as_deref(), Some("Research"));

    let db = test_db().await;
    let summary = db
        .bulk_import(&records, &ImportDefaults::new("AI Research", "US"), &countries)
        .await;
    assert_eq!(summary.success, 1);

    let stored = db
        .find_feed_by_url("https://distill.pub/rss.xml")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.group_name, "Research");
}
