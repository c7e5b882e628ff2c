//! Known awesome-list sources and the built-in curated feed list.

use super::extractor::SourceFormat;
use super::record::FeedRecord;

/// A well-known awesome-list document that can be imported by number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourcePreset {
    /// Menu number, starting at 1.
    pub number: u32,
    pub name: &'static str,
    /// Location as published (a GitHub `blob` page); see [`github_raw_url`].
    pub url: &'static str,
    /// Category applied to records whose section carries none.
    pub default_category: &'static str,
}

impl SourcePreset {
    /// Formats to extract from this source's document.
    pub fn formats(&self) -> &'static [SourceFormat] {
        SourceFormat::hints_for_url(self.url)
    }
}

pub const PRESET_SOURCES: &[SourcePreset] = &[
    SourcePreset {
        number: 1,
        name: "All AI News Sources",
        url: "https://github.com/foorilla/allainews_sources/blob/main/README.md",
        default_category: "AI/ML News",
    },
    SourcePreset {
        number: 2,
        name: "Awesome AI Feeds",
        url: "https://github.com/RSS-Renaissance/awesome-AI-feeds/blob/master/README.md",
        default_category: "AI Research",
    },
    SourcePreset {
        number: 3,
        name: "Awesome AI News Feeds",
        url: "https://github.com/RSS-Renaissance/awesome-AI-news-feeds/blob/master/README.md",
        default_category: "AI News",
    },
    SourcePreset {
        number: 4,
        name: "Awesome RSS Feeds (by country and category)",
        url: "https://github.com/WAI-laboratory/awesome-rss-feeds/blob/master/README.md",
        default_category: "General",
    },
];

/// Looks up a preset by its menu number.
pub fn preset(number: u32) -> Option<&'static SourcePreset> {
    PRESET_SOURCES.iter().find(|p| p.number == number)
}

/// Rewrites a GitHub `blob` page URL to the raw file it displays.
///
/// Other URLs are returned unchanged.
///
/// # Examples
///
/// ```
/// use feedatlas::feed::github_raw_url;
///
/// assert_eq!(
///     github_raw_url("https://github.com/foorilla/allainews_sources/blob/main/README.md"),
///     "https://raw.githubusercontent.com/foorilla/allainews_sources/main/README.md"
/// );
/// assert_eq!(github_raw_url("https://example.com/list.md"), "https://example.com/list.md");
/// ```
pub fn github_raw_url(url: &str) -> String {
    let Some(rest) = url
        .strip_prefix("https://github.com/")
        .or_else(|| url.strip_prefix("http://github.com/"))
    else {
        return url.to_string();
    };

    // owner/repo/blob/<ref>/<path>
    let mut parts = rest.splitn(4, '/');
    match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), Some("blob"), Some(tail)) if !tail.is_empty() => {
            format!("https://raw.githubusercontent.com/{owner}/{repo}/{tail}")
        }
        _ => url.to_string(),
    }
}

/// Category applied to curated feeds that carry none.
pub const CURATED_DEFAULT_CATEGORY: &str = "AI/ML";

/// Country applied to every curated feed.
pub const CURATED_DEFAULT_COUNTRY: &str = "US";

struct CuratedFeed {
    title: &'static str,
    feed_url: &'static str,
    domain: &'static str,
    description: &'static str,
    category: &'static str,
}

const CURATED_AI_FEEDS: &[CuratedFeed] = &[
    CuratedFeed {
        title: "OpenAI Blog",
        feed_url: "https://openai.com/blog/rss/",
        domain: "openai.com",
        description: "Latest news and updates from OpenAI",
        category: "AI News",
    },
    CuratedFeed {
        title: "DeepMind Blog",
        feed_url: "https://deepmind.com/blog/feed/basic/",
        domain: "deepmind.com",
        description: "Research breakthroughs from DeepMind",
        category: "AI Research",
    },
    CuratedFeed {
        title: "The Gradient",
        feed_url: "https://thegradient.pub/rss/",
        domain: "thegradient.pub",
        description: "AI publication about artificial intelligence",
        category: "AI News",
    },
    CuratedFeed {
        title: "Towards Data Science",
        feed_url: "https://towardsdatascience.com/feed",
        domain: "towardsdatascience.com",
        description: "Data science and machine learning articles",
        category: "Data Science",
    },
    CuratedFeed {
        title: "Machine Learning Mastery",
        feed_url: "https://machinelearningmastery.com/blog/feed",
        domain: "machinelearningmastery.com",
        description: "Machine learning tutorials and guides",
        category: "Machine Learning",
    },
    CuratedFeed {
        title: "AI News - VentureBeat",
        feed_url: "https://venturebeat.com/category/ai/feed/",
        domain: "venturebeat.com",
        description: "AI news and analysis from VentureBeat",
        category: "AI News",
    },
    CuratedFeed {
        title: "MIT Technology Review AI",
        feed_url: "https://www.technologyreview.com/feed/",
        domain: "technologyreview.com",
        description: "AI coverage from MIT Technology Review",
        category: "AI News",
    },
    CuratedFeed {
        title: "Artificial Intelligence News - ScienceDaily",
        feed_url: "https://www.sciencedaily.com/rss/computers_math/artificial_intelligence.xml",
        domain: "sciencedaily.com",
        description: "Latest AI research news from ScienceDaily",
        category: "AI Research",
    },
    CuratedFeed {
        title: "Google AI Blog",
        feed_url: "http://googleaiblog.blogspot.com/atom.xml",
        domain: "ai.googleblog.com",
        description: "Research and updates from Google AI",
        category: "AI Research",
    },
    CuratedFeed {
        title: "Hugging Face Blog",
        feed_url: "https://huggingface.co/blog/feed.xml",
        domain: "huggingface.co",
        description: "NLP and machine learning from Hugging Face",
        category: "NLP",
    },
    CuratedFeed {
        title: "arXiv Computer Science - Machine Learning",
        feed_url: "https://arxiv.org/rss/cs.LG",
        domain: "arxiv.org",
        description: "Latest machine learning papers from arXiv",
        category: "Academic Papers",
    },
    CuratedFeed {
        title: "arXiv Computer Science - Computer Vision",
        feed_url: "https://arxiv.org/rss/cs.CV",
        domain: "arxiv.org",
        description: "Latest computer vision papers from arXiv",
        category: "Academic Papers",
    },
    CuratedFeed {
        title: "arXiv Computer Science - Computation and Language",
        feed_url: "https://arxiv.org/rss/cs.CL",
        domain: "arxiv.org",
        description: "Latest NLP papers from arXiv",
        category: "Academic Papers",
    },
    CuratedFeed {
        title: "TechCrunch AI",
        feed_url: "https://techcrunch.com/feed/",
        domain: "techcrunch.com",
        description: "Tech news including AI developments",
        category: "Tech News",
    },
    CuratedFeed {
        title: "The Verge AI",
        feed_url: "https://www.theverge.com/rss/index.xml",
        domain: "theverge.com",
        description: "Technology news including AI coverage",
        category: "Tech News",
    },
];

/// The built-in AI/ML feed list, ready for bulk import.
///
/// Import with [`CURATED_DEFAULT_CATEGORY`] and [`CURATED_DEFAULT_COUNTRY`]
/// as defaults.
pub fn curated_ai_feeds() -> Vec<FeedRecord> {
    CURATED_AI_FEEDS
        .iter()
        .map(|feed| FeedRecord {
            title: feed.title.to_string(),
            feed_url: feed.feed_url.to_string(),
            domain: feed.domain.to_string(),
            description: Some(feed.description.to_string()),
            category_name: Some(feed.category.to_string()),
            country_code: None,
        })
        .collect()
}
