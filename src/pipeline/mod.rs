//! The report pipeline.
//!
//! One run moves strictly through these stages:
//!
//! 1. **Collecting**: read every feed and list its entries ([`collect_entries`])
//! 2. **Fetching**: download and extract all entries concurrently ([`fetch::fetch_all`])
//! 3. For each report, in order:
//!    - **Classifying**: select matching articles ([`classify::classify`])
//!    - **Summarizing**: one LLM call per match ([`summarize::summarize_matches`])
//!    - **Rendering**: write the HTML page, or skip the report when nothing survived
//!
//! No report starts before the previous one has been rendered or skipped.
//! Per-item failures are logged and skipped; a run always completes.

pub mod classify;
pub mod fetch;
pub mod summarize;

use crate::api::AskAsync;
use crate::config::{ReportConfig, Settings};
use crate::http::FetchText;
use crate::models::{Article, Report};
use crate::outputs::html::{publish_report, write_report};
use crate::scrapers::feeds::collect_entries;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

/// Run-wide knobs that are not part of [`Settings`].
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub max_articles_per_feed: usize,
    pub max_concurrent_workers: usize,
    pub output_dir: PathBuf,
    pub publish_dir: Option<PathBuf>,
    /// The run date: report file dates and the fallback article date.
    pub today: NaiveDate,
}

/// What happened to one report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The report was written to `path` with `items` rows.
    Written { path: PathBuf, items: usize },
    /// Nothing survived classification and summarization; no file was written.
    Skipped { matched: usize },
    /// The report had rows but could not be written.
    Failed { error: String },
}

/// Counts and per-report outcomes of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub entries: usize,
    pub articles: usize,
    pub reports: Vec<(String, ReportOutcome)>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|(_, o)| matches!(o, ReportOutcome::Written { .. }))
            .count()
    }
}

/// Classify, summarize and render a single report from the shared corpus.
#[instrument(level = "info", skip_all, fields(report = %report.name))]
pub async fn build_report<S>(
    corpus: &[Article],
    report: &ReportConfig,
    summarizer: &S,
    options: &PipelineOptions,
) -> ReportOutcome
where
    S: AskAsync<Response = String>,
{
    info!("Generating report");
    let matched = classify::classify(corpus, report);
    let items = summarize::summarize_matches(summarizer, &matched).await;

    if items.is_empty() {
        info!(matched = matched.len(), "No data to generate report");
        return ReportOutcome::Skipped {
            matched: matched.len(),
        };
    }

    let rendered = Report {
        name: report.name.clone(),
        date: options.today,
        items,
    };
    let path = match write_report(&rendered, &options.output_dir).await {
        Ok(path) => path,
        Err(e) => {
            error!(error = %e, "Failed to write report");
            return ReportOutcome::Failed {
                error: e.to_string(),
            };
        }
    };

    if let Some(publish_dir) = &options.publish_dir {
        if let Err(e) = publish_report(&path, publish_dir).await {
            warn!(error = %e, path = %path.display(), "Failed to publish report; local copy kept");
        }
    }

    ReportOutcome::Written {
        path,
        items: rendered.items.len(),
    }
}

/// Run the whole pipeline for `settings`.
#[instrument(level = "info", skip_all, fields(today = %options.today))]
pub async fn run<F, S>(
    settings: &Settings,
    fetcher: &F,
    summarizer: &S,
    options: &PipelineOptions,
) -> RunSummary
where
    F: FetchText,
    S: AskAsync<Response = String>,
{
    info!(stage = "collecting", feeds = settings.feeds.len(), "Collecting feed entries");
    let entries = collect_entries(fetcher, &settings.feeds, options.max_articles_per_feed).await;

    info!(
        stage = "fetching",
        entries = entries.len(),
        workers = options.max_concurrent_workers,
        "Fetching articles concurrently"
    );
    let corpus = fetch::fetch_all(
        fetcher,
        &entries,
        options.max_concurrent_workers,
        options.today,
    )
    .await;

    let mut reports = Vec::with_capacity(settings.reports.len());
    for report in &settings.reports {
        let outcome = build_report(&corpus, report, summarizer, options).await;
        reports.push((report.name.clone(), outcome));
    }

    RunSummary {
        entries: entries.len(),
        articles: corpus.len(),
        reports,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::ScriptedSummarizer;
    use crate::http::testing::StaticFetcher;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 6).unwrap()
    }

    fn options(tag: &str) -> PipelineOptions {
        PipelineOptions {
            max_articles_per_feed: 20,
            max_concurrent_workers: 10,
            output_dir: std::env::temp_dir().join(format!("dnr_run_{tag}_{}", std::process::id())),
            publish_dir: None,
            today: today(),
        }
    }

    fn page(title: &str, body: &str) -> String {
        format!(
            r#"<html><head><meta property="og:title" content="{title}"></head>
<body><div id="articleBody"><p>{body}</p></div></body></html>"#
        )
    }

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>테스트 뉴스</title>
<item><title>A</title><link>https://news.test/a</link></item>
<item><title>B</title><link>https://news.test/b</link></item>
<item><title>C</title><link>https://news.test/c</link></item>
</channel></rss>"#;

    fn fetcher() -> StaticFetcher {
        // https://news.test/a is deliberately missing: its extraction fails
        StaticFetcher::new()
            .with_page("https://feeds.test/rss", FEED)
            .with_page("https://news.test/b", &page("농가 소식", "지역 농협이 새 사업을 시작했다."))
            .with_page("https://news.test/c", &page("외환 시장", "원달러 환율이 크게 올랐다."))
    }

    fn settings(reports: Vec<ReportConfig>) -> Settings {
        Settings {
            feeds: vec!["https://feeds.test/rss".to_string()],
            reports,
        }
    }

    #[tokio::test]
    async fn test_end_to_end_two_reports() {
        let settings = settings(vec![
            ReportConfig::new("농업_리포트", &["농협"]),
            ReportConfig::new("경제_리포트", &["환율"]),
        ]);
        let options = options("e2e");
        let summarizer = ScriptedSummarizer::new();

        let summary = run(&settings, &fetcher(), &summarizer, &options).await;
        assert_eq!(summary.entries, 3);
        assert_eq!(summary.articles, 2);
        assert_eq!(summary.written(), 2);

        let farm_path = options.output_dir.join("농업_리포트_2025-05-06.html");
        let economy_path = options.output_dir.join("경제_리포트_2025-05-06.html");
        assert_eq!(
            summary.reports,
            vec![
                (
                    "농업_리포트".to_string(),
                    ReportOutcome::Written { path: farm_path.clone(), items: 1 }
                ),
                (
                    "경제_리포트".to_string(),
                    ReportOutcome::Written { path: economy_path.clone(), items: 1 }
                ),
            ]
        );

        let farm = std::fs::read_to_string(&farm_path).unwrap();
        assert!(farm.contains("농가 소식"));
        assert!(farm.contains("<td>농협</td>"));
        assert!(!farm.contains("외환 시장"));
        let economy = std::fs::read_to_string(&economy_path).unwrap();
        assert!(economy.contains("외환 시장"));
        assert!(economy.contains("<td>환율</td>"));
        assert!(economy.contains("테스트 뉴스"));

        // corpus order: B's body is summarized before C's
        assert_eq!(
            summarizer.asked(),
            vec!["지역 농협이 새 사업을 시작했다.", "원달러 환율이 크게 올랐다."]
        );
        let _ = std::fs::remove_dir_all(&options.output_dir);
    }

    #[tokio::test]
    async fn test_report_without_matches_is_skipped() {
        let settings = settings(vec![ReportConfig::new("빈_리포트", &["반도체"])]);
        let options = options("skip");
        let summarizer = ScriptedSummarizer::new();

        let summary = run(&settings, &fetcher(), &summarizer, &options).await;
        assert_eq!(
            summary.reports,
            vec![("빈_리포트".to_string(), ReportOutcome::Skipped { matched: 0 })]
        );
        assert!(!options.output_dir.join("빈_리포트_2025-05-06.html").exists());
        assert!(summarizer.asked().is_empty());
    }

    #[tokio::test]
    async fn test_report_whose_summaries_all_fail_is_skipped() {
        let settings = settings(vec![ReportConfig::new("경제_리포트", &["환율"])]);
        let options = options("allfail");
        let summarizer = ScriptedSummarizer::new().failing_on("환율");

        let summary = run(&settings, &fetcher(), &summarizer, &options).await;
        assert_eq!(
            summary.reports,
            vec![("경제_리포트".to_string(), ReportOutcome::Skipped { matched: 1 })]
        );
        assert_eq!(summary.written(), 0);
    }

    #[tokio::test]
    async fn test_same_article_in_two_reports() {
        let settings = settings(vec![
            ReportConfig::new("하나", &["환율"]),
            ReportConfig::new("둘", &["원달러", "환율"]),
        ]);
        let options = options("shared");
        let summarizer = ScriptedSummarizer::new();

        let summary = run(&settings, &fetcher(), &summarizer, &options).await;
        assert_eq!(summary.written(), 2);
        let second = std::fs::read_to_string(options.output_dir.join("둘_2025-05-06.html")).unwrap();
        assert!(second.contains("<td>원달러, 환율</td>"));
        assert_eq!(summarizer.asked().len(), 2);
        let _ = std::fs::remove_dir_all(&options.output_dir);
    }

    #[tokio::test]
    async fn test_unreachable_feeds_yield_empty_run() {
        let settings = Settings {
            feeds: vec!["https://down.test/rss".to_string()],
            reports: vec![ReportConfig::new("경제_리포트", &["환율"])],
        };
        let options = options("down");
        let summary = run(&settings, &StaticFetcher::new(), &ScriptedSummarizer::new(), &options).await;
        assert_eq!(summary.entries, 0);
        assert_eq!(summary.articles, 0);
        assert_eq!(
            summary.reports,
            vec![("경제_리포트".to_string(), ReportOutcome::Skipped { matched: 0 })]
        );
    }

    #[tokio::test]
    async fn test_publish_dir_receives_a_copy() {
        let settings = settings(vec![ReportConfig::new("경제_리포트", &["환율"])]);
        let mut options = options("pub");
        let publish = std::env::temp_dir().join(format!("dnr_run_pubdir_{}", std::process::id()));
        options.publish_dir = Some(publish.clone());

        let summary = run(&settings, &fetcher(), &ScriptedSummarizer::new(), &options).await;
        assert_eq!(summary.written(), 1);
        assert!(publish.join("경제_리포트_2025-05-06.html").exists());
        let _ = std::fs::remove_dir_all(&options.output_dir);
        let _ = std::fs::remove_dir_all(&publish);
    }
}
