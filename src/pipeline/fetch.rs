//! Concurrent article fetching.
//!
//! Fans every collected feed entry out to [`fetch_article`] with at most
//! `max_workers` fetches in flight, waits for all of them, and keeps the
//! articles that came back. One entry failing never affects another.

use crate::http::FetchText;
use crate::models::{Article, FeedEntry};
use crate::scrapers::article::fetch_article;
use chrono::NaiveDate;
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{info, instrument};

/// Fetch all entries under a concurrency ceiling.
///
/// Results arrive in completion order and are put back into submission
/// order (feed order, then entry order) before returning, so the corpus is
/// deterministic for a given set of successes.
#[instrument(level = "info", skip_all, fields(entries = entries.len(), max_workers = max_workers))]
pub async fn fetch_all<F: FetchText>(
    fetcher: &F,
    entries: &[FeedEntry],
    max_workers: usize,
    today: NaiveDate,
) -> Vec<Article> {
    let t0 = Instant::now();
    let mut results: Vec<(usize, Option<Article>)> = stream::iter(entries.iter().enumerate())
        .map(|(i, entry)| async move { (i, fetch_article(fetcher, entry, today).await) })
        .buffer_unordered(max_workers.max(1))
        .collect()
        .await;
    results.sort_unstable_by_key(|(i, _)| *i);

    let articles: Vec<Article> = results.into_iter().filter_map(|(_, a)| a).collect();
    info!(
        total = entries.len(),
        parsed = articles.len(),
        failed = entries.len() - articles.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Successfully parsed articles"
    );
    articles
}
