//! Article page download and content extraction.
//!
//! Given a [`FeedEntry`], downloads the linked page and pulls out the
//! headline, the body text and the publish date. Any failure along the way
//! yields no article: the entry is logged and skipped, never surfaced to the
//! caller as an error.
//!
//! # Extraction Order
//!
//! - **Title**: `og:title`, then `<title>`, then the first `<h1>`; then the
//!   feed's title for the entry; then a placeholder
//! - **Body**: the first known article container, else document-wide paragraphs
//! - **Date**: publish-time meta tags, `<time datetime>`, JSON-LD; else the run date

use crate::http::FetchText;
use crate::models::{Article, FeedEntry, UNTITLED};
use crate::utils::normalize_whitespace;
use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use serde_json::Value;
use std::error::Error;
use tracing::{debug, instrument, warn};

/// Containers known to hold the article text on the configured outlets,
/// tried in order.
const BODY_CONTAINERS: &[&str] = &[
    "[itemprop=articleBody]",
    "#articleBody",
    "#article-body",
    "#articleBodyContents",
    "#newsct_article",
    ".article_body",
    ".article-body",
    ".news_body",
    "article",
];

/// Paragraphs shorter than this are treated as navigation noise when no
/// article container was found.
const MIN_LOOSE_PARAGRAPH_CHARS: usize = 20;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("built-in selector is valid")
}

static BODY_SELECTORS: Lazy<Vec<Selector>> =
    Lazy::new(|| BODY_CONTAINERS.iter().map(|css| selector(css)).collect());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| selector("p"));
static OG_TITLE: Lazy<Selector> = Lazy::new(|| selector("meta[property='og:title']"));
static TITLE: Lazy<Selector> = Lazy::new(|| selector("title"));
static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static DATE_META: Lazy<Selector> = Lazy::new(|| {
    selector(
        "meta[property='article:published_time'], meta[property='og:published_time'], \
         meta[name='pubdate'], meta[itemprop='datePublished'], meta[name='date']",
    )
});
static TIME: Lazy<Selector> = Lazy::new(|| selector("time[datetime]"));
static JSON_LD: Lazy<Selector> = Lazy::new(|| selector("script[type='application/ld+json']"));
static DATE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").expect("valid regex")
});

/// What could be read from an article page.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Extracted {
    pub title: Option<String>,
    pub body: String,
    pub publish_date: Option<NaiveDate>,
}

/// Parse a date in any of the forms outlets put in their markup.
///
/// RFC 3339 and RFC 2822 timestamps keep the calendar date of their own
/// offset; anything else must start with a `YYYY-MM-DD`-like date.
pub fn parse_publish_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    let caps = DATE_PREFIX.captures(raw)?;
    NaiveDate::from_ymd_opt(
        caps[1].parse().ok()?,
        caps[2].parse().ok()?,
        caps[3].parse().ok()?,
    )
}

fn element_text(element: ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Text of `element`, skipping anything inside script, style or noscript.
fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        let Some(text) = node.value().as_text() else { continue };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .is_some_and(|e| matches!(e.name(), "script" | "style" | "noscript"))
        });
        if !hidden {
            out.push_str(text);
            out.push('\n');
        }
    }
    out.lines()
        .map(normalize_whitespace)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn container_text(container: ElementRef<'_>) -> String {
    let paragraphs: Vec<String> = container
        .select(&PARAGRAPH)
        .map(element_text)
        .filter(|p| !p.is_empty())
        .collect();
    if paragraphs.is_empty() {
        visible_text(container)
    } else {
        paragraphs.join("\n\n")
    }
}

fn extract_body(document: &Html) -> String {
    for container in BODY_SELECTORS.iter() {
        if let Some(element) = document.select(container).next() {
            let text = container_text(element);
            if !text.is_empty() {
                return text;
            }
        }
    }
    document
        .select(&PARAGRAPH)
        .map(element_text)
        .filter(|p| p.chars().count() >= MIN_LOOSE_PARAGRAPH_CHARS)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn extract_title(document: &Html) -> Option<String> {
    let og = document
        .select(&OG_TITLE)
        .filter_map(|m| m.value().attr("content"))
        .map(normalize_whitespace)
        .find(|t| !t.is_empty());
    og.or_else(|| {
        document
            .select(&TITLE)
            .chain(document.select(&H1))
            .map(element_text)
            .find(|t| !t.is_empty())
    })
}

fn extract_date(document: &Html) -> Option<NaiveDate> {
    let from_meta = document
        .select(&DATE_META)
        .filter_map(|m| m.value().attr("content"))
        .chain(document.select(&TIME).filter_map(|t| t.value().attr("datetime")))
        .find_map(parse_publish_date);
    from_meta.or_else(|| {
        document.select(&JSON_LD).find_map(|script| {
            let json = script.text().collect::<String>();
            let value: Value = serde_json::from_str(json.trim()).ok()?;
            json_ld_date(&value)
        })
    })
}

// JSON-LD nests the article anywhere: top level, an array, or under "@graph".
fn json_ld_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Object(map) => map
            .get("datePublished")
            .and_then(Value::as_str)
            .and_then(parse_publish_date)
            .or_else(|| map.values().find_map(json_ld_date)),
        Value::Array(items) => items.iter().find_map(json_ld_date),
        _ => None,
    }
}

/// Pull title, body and publish date out of an HTML page.
pub fn extract_article(html: &str) -> Extracted {
    let document = Html::parse_document(html);
    Extracted {
        title: extract_title(&document),
        body: extract_body(&document),
        publish_date: extract_date(&document),
    }
}

/// Build the article for `entry` from its extracted page content.
///
/// Returns `None` when the page had no body text.
pub fn build_article(
    entry: &FeedEntry,
    link: &str,
    extracted: Extracted,
    today: NaiveDate,
) -> Option<Article> {
    if extracted.body.trim().is_empty() {
        return None;
    }
    let title = extracted
        .title
        .or_else(|| entry.entry_title.clone())
        .unwrap_or_else(|| UNTITLED.to_string());
    Some(Article {
        date: extracted.publish_date.unwrap_or(today),
        title,
        source: entry.source_title.clone(),
        body: extracted.body,
        link: link.to_string(),
    })
}

/// Fetch one entry's page and extract its article.
///
/// Never fails: a missing link, a download or extraction error, or an
/// empty body all yield `None`, with the reason logged.
#[instrument(level = "info", skip_all, fields(link = entry.link.as_deref().unwrap_or("")))]
pub async fn fetch_article<F: FetchText>(
    fetcher: &F,
    entry: &FeedEntry,
    today: NaiveDate,
) -> Option<Article> {
    let Some(link) = entry.link.as_deref() else {
        debug!(source = %entry.source_title, "Entry has no link; skipping");
        return None;
    };
    match try_fetch_article(fetcher, entry, link, today).await {
        Ok(Some(article)) => {
            debug!(%link, bytes = article.body.len(), "Parsed article");
            Some(article)
        }
        Ok(None) => {
            warn!(%link, "Article page produced no text; skipping");
            None
        }
        Err(e) => {
            warn!(%link, error = %e, "Error processing article");
            None
        }
    }
}

async fn try_fetch_article<F: FetchText>(
    fetcher: &F,
    entry: &FeedEntry,
    link: &str,
    today: NaiveDate,
) -> Result<Option<Article>, Box<dyn Error>> {
    let html = fetcher.fetch_text(link).await?;
    let extracted = extract_article(&html);
    Ok(build_article(entry, link, extracted, today))
}
