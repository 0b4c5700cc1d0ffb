//! Command-line interface definitions for the daily news report.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables.

use clap::Parser;

/// Command-line arguments for the daily news report.
///
/// # Examples
///
/// ```sh
/// # Built-in feeds and reports, HTML written to ./reports
/// OPENAI_API_KEY=sk-... daily_news_report
///
/// # Custom settings, copy finished reports into a web root
/// daily_news_report -c reports.yaml -o ./out -p /var/www/reports
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML file listing feeds and reports
    #[arg(short, long, env = "REPORT_CONFIG")]
    pub config: Option<String>,

    /// Output directory for the HTML reports
    #[arg(short, long, default_value = "reports")]
    pub output_dir: String,

    /// Optional directory finished reports are copied into
    #[arg(short, long, env = "REPORT_PUBLISH_DIR")]
    pub publish_dir: Option<String>,

    /// API key for the summarization service
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible summarization API
    #[arg(long, env = "OPENAI_API_BASE", default_value = "https://api.openai.com/v1")]
    pub api_base: String,

    /// Model used for summaries
    #[arg(long, env = "OPENAI_MODEL", default_value = "gpt-4o-mini")]
    pub model: String,

    /// Maximum number of entries taken from each feed
    #[arg(long, default_value_t = 20)]
    pub max_articles_per_feed: usize,

    /// Maximum number of article pages fetched at once
    #[arg(long, default_value_t = 10)]
    pub max_concurrent_workers: usize,

    /// Per-request timeout, in seconds, for feeds, pages and the summarization API
    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,
}

impl Cli {
    /// The summarization API key, if one was given and is not blank.
    ///
    /// A run without a key cannot summarize anything, so `main` stops before
    /// any fetching when this is `None`.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["daily_news_report", "--api-key", "sk-test"]);

        assert_eq!(cli.output_dir, "reports");
        assert_eq!(cli.max_articles_per_feed, 20);
        assert_eq!(cli.max_concurrent_workers, 10);
        assert_eq!(cli.api_key(), Some("sk-test"));
    }

    #[test]
    fn test_api_key_missing_or_blank() {
        let mut cli = Cli::parse_from(["daily_news_report", "--api-key", "   "]);
        assert_eq!(cli.api_key(), None);

        cli.api_key = None;
        assert_eq!(cli.api_key(), None);

        cli.api_key = Some(" sk-padded \n".to_string());
        assert_eq!(cli.api_key(), Some("sk-padded"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "daily_news_report",
            "-c",
            "/tmp/reports.yaml",
            "-o",
            "/tmp/out",
            "-p",
            "/tmp/publish",
        ]);

        assert_eq!(cli.config.as_deref(), Some("/tmp/reports.yaml"));
        assert_eq!(cli.output_dir, "/tmp/out");
        assert_eq!(cli.publish_dir.as_deref(), Some("/tmp/publish"));
    }

    #[test]
    fn test_cli_limits() {
        let cli = Cli::parse_from([
            "daily_news_report",
            "--max-articles-per-feed",
            "5",
            "--max-concurrent-workers",
            "3",
            "--request-timeout-secs",
            "10",
        ]);

        assert_eq!(cli.max_articles_per_feed, 5);
        assert_eq!(cli.max_concurrent_workers, 3);
        assert_eq!(cli.request_timeout_secs, 10);
    }
}
