//! Data models flowing through the report pipeline.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FeedEntry`]: One item listed by a syndication feed, before its page is fetched
//! - [`Article`]: The extracted content behind a feed entry's link
//! - [`ReportItem`]: One summarized row of a report
//! - [`Report`]: The ordered rows rendered into one HTML document
//!
//! None of these outlive a single run; nothing is persisted.

use chrono::NaiveDate;

/// Placeholder title used when neither the page nor the feed provides one.
pub const UNTITLED: &str = "제목 없음";

/// A single item discovered in a syndication feed.
///
/// # Fields
///
/// * `link` - The article URL; entries without one are dropped at fetch time
/// * `entry_title` - The title the feed gave this item, used as a fallback
/// * `source_title` - The title of the feed the entry came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    /// The linked article page, if the feed item had one.
    pub link: Option<String>,
    /// The item's own title as listed in the feed.
    pub entry_title: Option<String>,
    /// The owning feed's title (or a fallback label).
    pub source_title: String,
}

/// A fetched and text-extracted news article.
///
/// `body` is never empty: extraction results without text are discarded
/// before an `Article` is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// Publish date from the page, or the run date when the page has none.
    pub date: NaiveDate,
    /// The article headline.
    pub title: String,
    /// The title of the feed this article was listed in.
    pub source: String,
    /// Extracted plain-text content.
    pub body: String,
    /// The article URL.
    pub link: String,
}

impl Article {
    /// The text keyword matching runs against: title immediately followed by body.
    pub fn searchable_text(&self) -> String {
        format!("{}{}", self.title, self.body).to_lowercase()
    }
}

/// A single summarized row in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportItem {
    /// The article date in `YYYY-MM-DD` form.
    pub date: String,
    /// Matched report keywords, in report order, joined by `", "`.
    pub keywords: String,
    pub title: String,
    pub summary: String,
    pub link: String,
    pub source: String,
}

/// A named report ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// The report's configured name, also used in the output filename.
    pub name: String,
    /// The run date the report was produced on.
    pub date: NaiveDate,
    /// Rows in corpus order.
    pub items: Vec<ReportItem>,
}

impl Report {
    /// The output filename, `{name}_{YYYY-MM-DD}.html`.
    pub fn file_name(&self) -> String {
        format!("{}_{}.html", self.name, self.date.format("%Y-%m-%d"))
    }
}
