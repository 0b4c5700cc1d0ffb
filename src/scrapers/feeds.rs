//! Syndication feed indexing.
//!
//! Reads each configured feed and lists its entries, keeping at most
//! `max_per_feed` of them in document order. RSS 2.0, RSS 1.0 (RDF) and Atom
//! documents are understood.
//!
//! A feed that cannot be fetched or parsed contributes nothing; the failure is
//! logged and the next feed is read.

use crate::http::FetchText;
use crate::models::FeedEntry;
use feed_rs::model::Link;
use feed_rs::parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Label used when a feed does not declare its own title.
pub const UNKNOWN_SOURCE: &str = "Unknown Source";

/// A parsed feed document.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    pub title: Option<String>,
    pub items: Vec<ParsedItem>,
}

/// One `<item>` or `<entry>` of a feed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ParsedItem {
    pub title: Option<String>,
    pub link: Option<String>,
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// Atom entries may carry several links; rel="alternate" (or no rel) wins.
fn entry_link(links: &[Link]) -> Option<String> {
    links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|r| r == "alternate"))
        .or_else(|| links.first())
        .and_then(|l| non_blank(l.href.clone()))
}

/// Parse an RSS 2.0, RSS 1.0 or Atom document from its raw bytes.
///
/// The bytes are handed over undecoded so the document's own `encoding=`
/// declaration is honoured.
///
/// # Errors
///
/// Returns an error on malformed XML, or when the document is not a feed.
pub fn parse_feed(bytes: &[u8]) -> Result<ParsedFeed, Box<dyn Error>> {
    let feed = parser::parse(bytes)?;
    let items = feed
        .entries
        .into_iter()
        .map(|entry| ParsedItem {
            title: entry.title.and_then(|t| non_blank(t.content)),
            link: entry_link(&entry.links),
        })
        .collect();
    Ok(ParsedFeed {
        title: feed.title.and_then(|t| non_blank(t.content)),
        items,
    })
}

/// Resolve an entry link against the feed URL.
///
/// Relative links become absolute; anything that is not http(s) afterwards
/// is treated as no link at all.
pub fn resolve_link(base: Option<&Url>, link: &str) -> Option<String> {
    let resolved = match base {
        Some(base) => base.join(link).ok()?,
        None => Url::parse(link).ok()?,
    };
    matches!(resolved.scheme(), "http" | "https").then(|| resolved.to_string())
}

/// Turn a parsed feed into at most `max_per_feed` entries, in document order.
pub fn feed_entries(feed: ParsedFeed, max_per_feed: usize) -> Vec<FeedEntry> {
    let source_title = feed.title.unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
    feed.items
        .into_iter()
        .take(max_per_feed)
        .map(|item| FeedEntry {
            link: item.link,
            entry_title: item.title,
            source_title: source_title.clone(),
        })
        .collect()
}

/// Fetch and parse a single feed.
#[instrument(level = "info", skip(fetcher))]
pub async fn index_feed<F: FetchText>(
    fetcher: &F,
    feed_url: &str,
    max_per_feed: usize,
) -> Result<Vec<FeedEntry>, Box<dyn Error>> {
    let base = Url::parse(feed_url).ok();
    let bytes = fetcher.fetch_bytes(feed_url).await?;
    let feed = parse_feed(&bytes)?;
    let total = feed.items.len();
    let mut entries = feed_entries(feed, max_per_feed);
    for entry in &mut entries {
        entry.link = entry
            .link
            .take()
            .and_then(|link| resolve_link(base.as_ref(), &link));
    }
    debug!(total, kept = entries.len(), "Parsed feed");
    Ok(entries)
}

/// Visit every feed in order and concatenate their entries.
///
/// Feed order and per-feed entry order are preserved.
#[instrument(level = "info", skip_all, fields(feeds = feeds.len()))]
pub async fn collect_entries<F: FetchText>(
    fetcher: &F,
    feeds: &[String],
    max_per_feed: usize,
) -> Vec<FeedEntry> {
    let mut entries = Vec::new();
    for feed_url in feeds {
        info!(%feed_url, "Fetching feed list");
        match index_feed(fetcher, feed_url, max_per_feed).await {
            Ok(found) => {
                info!(%feed_url, count = found.len(), "Indexed feed entries");
                entries.extend(found);
            }
            Err(e) => error!(%feed_url, error = %e, "Error fetching or parsing feed"),
        }
    }
    info!(count = entries.len(), "Found total entries to process");
    entries
}
