//! Per-article summarization for one report.

use crate::api::AskAsync;
use crate::models::ReportItem;
use crate::pipeline::classify::Matched;
use futures::stream::{self, StreamExt};
use tracing::{info, instrument, warn};

/// Summarize matched articles one at a time, in order.
///
/// A failed call drops that article from the report and the loop moves on;
/// nothing is retried.
#[instrument(level = "info", skip_all, fields(matched = matched.len()))]
pub async fn summarize_matches<S>(summarizer: &S, matched: &[Matched<'_>]) -> Vec<ReportItem>
where
    S: AskAsync<Response = String>,
{
    let items: Vec<ReportItem> = stream::iter(matched)
        .then(|m| async move {
            let article = m.article;
            info!(title = %article.title, "Summarizing");
            match summarizer.ask(&article.body).await {
                Ok(summary) => Some(ReportItem {
                    date: article.date.format("%Y-%m-%d").to_string(),
                    keywords: m.keyword_label(),
                    title: article.title.clone(),
                    summary,
                    link: article.link.clone(),
                    source: article.source.clone(),
                }),
                Err(e) => {
                    warn!(title = %article.title, error = %e, "Failed to summarize article");
                    None
                }
            }
        })
        .filter_map(std::future::ready)
        .collect()
        .await;

    info!(
        summarized = items.len(),
        failed = matched.len() - items.len(),
        "Summarization finished"
    );
    items
}
