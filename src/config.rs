//! Feed list and report vocabularies.
//!
//! The run is driven by a [`Settings`] value: which feeds to read and which
//! keyword reports to build. It is loaded once at startup, either from a YAML
//! file or from the built-in defaults, validated, and then only ever borrowed.
//!
//! # File Format
//!
//! ```yaml
//! feeds:
//!   - https://www.yna.co.kr/rss/politics-economy.xml
//! reports:
//!   - name: 경제_리포트
//!     keywords: [경제, 금리, 환율]
//! ```

use itertools::Itertools;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use tokio::fs;
use tracing::{info, instrument};

/// Feeds read when no configuration file is given.
pub const DEFAULT_FEEDS: &[&str] = &[
    "https://news.google.com/rss?hl=ko&gl=KR&ceid=KR:ko",
    "https://www.yonhapnewstv.co.kr/browse/feed/",
    "https://www.hankyung.com/feed/all-news",
    "https://www.mk.co.kr/rss/40300009/",
    "https://biz.chosun.com/rss-feed/",
    "https://rss.donga.com/total.xml",
    "https://www.seoul.co.kr/rss/economy.xml",
    "https://www.newsfarm.co.kr/rss/allArticle.xml",
    "https://www.agriculture.co.kr/rss/rss.xml",
    "https://www.yna.co.kr/rss/politics-economy.xml",
];

/// One report's identity and matching vocabulary.
///
/// Keyword order is significant: matched keywords are listed in this order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportConfig {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ReportConfig {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Everything the pipeline needs to know about what to read and what to build.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Feed URLs, visited in order.
    pub feeds: Vec<String>,
    /// Reports, built in order.
    pub reports: Vec<ReportConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feeds: DEFAULT_FEEDS.iter().map(|f| f.to_string()).collect(),
            reports: vec![
                ReportConfig::new(
                    "농업_농협_리포트",
                    &["농협중앙회", "농협", "농촌", "농업", "축산업"],
                ),
                ReportConfig::new(
                    "경제_리포트",
                    &["경제", "금리", "환율", "증시", "부동산", "물가", "수출", "무역", "투자"],
                ),
            ],
        }
    }
}

/// A settings value that cannot drive a run.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    NoFeeds,
    NoReports,
    UnnamedReport,
    NoKeywords(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoFeeds => write!(f, "no feeds configured"),
            ConfigError::NoReports => write!(f, "no reports configured"),
            ConfigError::UnnamedReport => write!(f, "a report has an empty name"),
            ConfigError::NoKeywords(name) => write!(f, "report {name:?} has no keywords"),
        }
    }
}

impl Error for ConfigError {}

impl Settings {
    /// Parse settings from YAML text and validate them.
    pub fn from_yaml(text: &str) -> Result<Self, Box<dyn Error>> {
        let mut settings: Settings = serde_yaml::from_str(text)?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`, or fall back to the built-in defaults when `None`.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        let settings = match path {
            Some(path) => {
                let text = fs::read_to_string(path).await?;
                Self::from_yaml(&text)?
            }
            None => Self::default(),
        };
        info!(
            feeds = settings.feeds.len(),
            reports = settings.reports.len(),
            source = path.unwrap_or("built-in defaults"),
            "Loaded settings"
        );
        Ok(settings)
    }

    // Blank feeds and keywords are config noise, not matches-everything vocabulary.
    fn normalize(&mut self) {
        self.feeds = self
            .feeds
            .drain(..)
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect();
        for report in &mut self.reports {
            report.name = report.name.trim().to_string();
            report.keywords = report
                .keywords
                .drain(..)
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .unique()
                .collect();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.feeds.is_empty() {
            return Err(ConfigError::NoFeeds);
        }
        if self.reports.is_empty() {
            return Err(ConfigError::NoReports);
        }
        for report in &self.reports {
            if report.name.is_empty() {
                return Err(ConfigError::UnnamedReport);
            }
            if report.keywords.is_empty() {
                return Err(ConfigError::NoKeywords(report.name.clone()));
            }
        }
        Ok(())
    }
}
