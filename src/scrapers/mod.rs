//! Feed and article scrapers.
//!
//! Scraping follows a two-phase pattern:
//!
//! 1. **Indexing**: Read each syndication feed and list its entries ([`feeds`])
//! 2. **Fetching**: Download each entry's page and extract the article ([`article`])
//!
//! | Phase | Module | Input | Output | On failure |
//! |-------|--------|-------|--------|------------|
//! | Indexing | [`feeds`] | feed URL | `Vec<FeedEntry>` | feed contributes nothing |
//! | Fetching | [`article`] | `FeedEntry` | `Option<Article>` | entry is skipped |
//!
//! Both phases log and skip failures; neither ever aborts a run.

pub mod article;
pub mod feeds;
