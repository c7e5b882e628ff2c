use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::path::{Path, PathBuf};

use feedatlas::config::Config;
use feedatlas::feed::{
    build_client, curated_ai_feeds, extract_all, fetch_source, github_raw_url, preset,
    FeedRecord, RecordStats, SourceFormat, CURATED_DEFAULT_CATEGORY,
    CURATED_DEFAULT_COUNTRY, PRESET_SOURCES,
};
use feedatlas::storage::{Database, DatabaseError, ImportDefaults, ImportSummary, StoredFeed};

/// Get the config directory path (~/.config/feedatlas/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("feedatlas"))
}

#[derive(Parser, Debug)]
#[command(
    name = "feedatlas",
    version,
    about = "Extract RSS feed lists from awesome-list READMEs and import them into a country/category catalogue"
)]
struct Args {
    /// Source document URL, or the number of a preset (see --list-sources)
    #[arg(long, value_name = "URL|NUMBER", conflicts_with = "file")]
    source: Option<String>,

    /// Local markdown file to extract from
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Document layout; derived from the source URL when omitted
    #[arg(long, value_name = "FORMAT")]
    format: Option<SourceFormat>,

    /// Extract and print statistics without importing
    #[arg(short = 'd', long, conflicts_with = "import")]
    dry_run: bool,

    /// Import extracted feeds into the catalogue
    #[arg(long)]
    import: bool,

    /// Import the built-in curated AI/ML feed list
    #[arg(long)]
    predefined: bool,

    /// Save extracted records as JSON
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Category for feeds whose section names none
    #[arg(long, value_name = "NAME")]
    default_category: Option<String>,

    /// Country code for feeds whose section names none
    #[arg(long, value_name = "CODE")]
    default_country: Option<String>,

    /// List preset sources
    #[arg(long)]
    list_sources: bool,

    /// List countries in the catalogue
    #[arg(long)]
    list_countries: bool,

    /// List categories in the catalogue
    #[arg(long)]
    list_categories: bool,

    /// Show feeds stored for a country code
    #[arg(long, value_name = "CODE")]
    country: Option<String>,

    /// Show feeds stored for a category
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Catalogue database path
    #[arg(long, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

impl Args {
    fn needs_database(&self) -> bool {
        self.import
            || (self.predefined && !self.dry_run)
            || self.list_countries
            || self.list_categories
            || self.country.is_some()
            || self.category.is_some()
    }

    fn has_action(&self) -> bool {
        self.source.is_some()
            || self.file.is_some()
            || self.predefined
            || self.list_sources
            || self.list_countries
            || self.list_categories
            || self.country.is_some()
            || self.category.is_some()
    }
}

/// Where extracted records come from.
struct Document {
    label: String,
    text: String,
    formats: Vec<SourceFormat>,
    default_category: Option<&'static str>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if !args.has_action() {
        Args::command().print_help()?;
        println!();
        return Ok(());
    }

    if args.list_sources {
        print_sources();
        if !args.needs_database() && args.source.is_none() && args.file.is_none() {
            return Ok(());
        }
    }

    let config_dir = get_config_dir()?;
    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    let countries = config.country_table();

    let db = if args.needs_database() {
        Some(open_database(&args, &config, &config_dir).await?)
    } else {
        None
    };

    // Extraction from a remote or local document
    if args.source.is_some() || args.file.is_some() {
        let document = match load_document(&args, &config).await {
            Ok(document) => document,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                std::process::exit(1);
            }
        };

        let records = extract_all(&document.text, &document.formats, &countries);
        let format_names: Vec<_> = document.formats.iter().map(|f| f.as_str()).collect();
        println!(
            "Extracted {} feeds from {} ({})",
            records.len(),
            document.label,
            format_names.join(", ")
        );

        if let Some(output) = &args.output {
            save_records(output, &records)?;
            println!("Saved records to {}", output.display());
        }

        print_stats(&RecordStats::from_records(&records));

        match &db {
            Some(db) if args.import => {
                let mut defaults = config.import_defaults();
                if let Some(category) = document.default_category {
                    defaults.category = category.to_string();
                }
                apply_default_overrides(&args, &mut defaults);

                let summary = db.bulk_import(&records, &defaults, &countries).await;
                print_summary(&summary);
            }
            _ if !args.dry_run => {
                println!("Run with --import to add these feeds to the catalogue.");
            }
            _ => {}
        }
    }

    // Curated built-in list
    if args.predefined {
        let records = curated_ai_feeds();
        println!("Curated AI/ML list: {} feeds", records.len());

        match &db {
            Some(db) if !args.dry_run => {
                let mut defaults =
                    ImportDefaults::new(CURATED_DEFAULT_CATEGORY, CURATED_DEFAULT_COUNTRY);
                apply_default_overrides(&args, &mut defaults);

                let summary = db.bulk_import(&records, &defaults, &countries).await;
                print_summary(&summary);
            }
            _ => print_stats(&RecordStats::from_records(&records)),
        }
    }

    // Catalogue queries
    if let Some(db) = &db {
        if args.list_countries {
            let rows = db.list_countries().await.context("Failed to list countries")?;
            println!("Countries ({}):", rows.len());
            for country in rows {
                println!("  {}  {}", country.code, country.name);
            }
        }

        if args.list_categories {
            let rows = db
                .list_categories()
                .await
                .context("Failed to list categories")?;
            println!("Categories ({}):", rows.len());
            for category in rows {
                println!("  {}", category.name);
            }
        }

        if let Some(code) = &args.country {
            let feeds = db
                .get_feeds_by_country(code)
                .await
                .context("Failed to load country feeds")?;
            print_feeds(&format!("Feeds for country {}", code.to_uppercase()), &feeds);
        }

        if let Some(name) = &args.category {
            let feeds = db
                .get_feeds_by_category(name)
                .await
                .context("Failed to load category feeds")?;
            print_feeds(&format!("Feeds in category '{}'", name), &feeds);
        }
    }

    Ok(())
}

async fn open_database(args: &Args, config: &Config, config_dir: &Path) -> Result<Database> {
    let db_path = args
        .db
        .clone()
        .or_else(|| config.database_path.clone())
        .unwrap_or_else(|| config_dir.join("feeds.db"));

    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;

    match Database::open(db_path_str).await {
        Ok(db) => Ok(db),
        Err(DatabaseError::Locked) => {
            eprintln!("Error: {}", DatabaseError::Locked);
            std::process::exit(1);
        }
        Err(e) => Err(anyhow::anyhow!("Failed to open database: {}", e)),
    }
}

async fn load_document(args: &Args, config: &Config) -> Result<Document> {
    if let Some(path) = &args.file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let formats = match args.format {
            Some(format) => vec![format],
            None => SourceFormat::hints_for_url(&path.to_string_lossy()).to_vec(),
        };
        return Ok(Document {
            label: path.display().to_string(),
            text,
            formats,
            default_category: None,
        });
    }

    let source = args
        .source
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No source given"))?;

    let (url, default_category) = match source.trim().parse::<u32>() {
        Ok(number) => {
            let preset = preset(number).ok_or_else(|| {
                anyhow::anyhow!(
                    "Unknown preset {} (choose 1-{}, see --list-sources)",
                    number,
                    PRESET_SOURCES.len()
                )
            })?;
            (preset.url.to_string(), Some(preset.default_category))
        }
        Err(_) => (source.trim().to_string(), None),
    };

    let formats = match args.format {
        Some(format) => vec![format],
        None => SourceFormat::hints_for_url(&url).to_vec(),
    };

    let client = build_client(&config.user_agent, config.request_timeout())
        .context("Failed to build HTTP client")?;
    let raw_url = github_raw_url(&url);
    let text = fetch_source(&client, &raw_url, None).await?;

    Ok(Document {
        label: raw_url,
        text,
        formats,
        default_category,
    })
}

fn apply_default_overrides(args: &Args, defaults: &mut ImportDefaults) {
    if let Some(category) = &args.default_category {
        defaults.category = category.clone();
    }
    if let Some(country) = &args.default_country {
        defaults.country_code = country.clone();
    }
}

fn save_records(path: &Path, records: &[FeedRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn print_sources() {
    println!("Preset sources:");
    for source in PRESET_SOURCES {
        let formats: Vec<_> = source.formats().iter().map(|f| f.as_str()).collect();
        println!("{}. {}", source.number, source.name);
        println!("   Category: {}", source.default_category);
        println!("   Format:   {}", formats.join(", "));
        println!("   Source:   {}", source.url);
    }
    println!();
    println!("--predefined imports the built-in curated AI/ML feed list.");
}

fn print_stats(stats: &RecordStats) {
    println!(
        "Records: {} ({} unique URLs, {} untagged)",
        stats.total, stats.unique_urls, stats.untagged
    );
    if !stats.by_category.is_empty() {
        println!("By category:");
        for (category, count) in &stats.by_category {
            println!("  {:<32} {}", category, count);
        }
    }
    if !stats.by_country.is_empty() {
        println!("By country:");
        for (code, count) in &stats.by_country {
            println!("  {:<32} {}", code, count);
        }
    }
}

fn print_summary(summary: &ImportSummary) {
    println!("Import completed:");
    println!("  Imported:   {}", summary.success);
    println!("  Duplicates: {}", summary.duplicates);
    println!("  Failed:     {}", summary.failed);
    for error in &summary.errors {
        println!("    - {}", error);
    }
}

fn print_feeds(heading: &str, feeds: &[StoredFeed]) {
    println!("{} ({}):", heading, feeds.len());
    for feed in feeds {
        println!("  {} <{}>", feed.title, feed.feed_url);
    }
}

