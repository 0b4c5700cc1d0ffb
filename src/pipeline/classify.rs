//! Keyword classification of the article corpus into reports.
//!
//! An article belongs to a report when any of the report's keywords occurs,
//! case-insensitively, anywhere in its title followed by its body. Each
//! report is matched against the whole corpus on its own, so one article can
//! land in several reports.

use crate::config::ReportConfig;
use crate::models::Article;
use tracing::{info, instrument};

/// An article selected for a report, with the keywords that selected it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matched<'a> {
    pub article: &'a Article,
    /// Matching keywords in the report's own keyword order; never empty.
    pub keywords: Vec<&'a str>,
}

impl Matched<'_> {
    /// Keywords as shown in the report: `"농협, 농업"`.
    pub fn keyword_label(&self) -> String {
        self.keywords.join(", ")
    }
}

/// The report keywords found in `article`, in the report's keyword order.
pub fn matched_keywords<'k>(article: &Article, keywords: &'k [String]) -> Vec<&'k str> {
    let haystack = article.searchable_text();
    keywords
        .iter()
        .filter(|k| haystack.contains(&k.to_lowercase()))
        .map(String::as_str)
        .collect()
}

/// Select the articles of `corpus` that match `report`, in corpus order.
#[instrument(level = "info", skip_all, fields(report = %report.name))]
pub fn classify<'a>(corpus: &'a [Article], report: &'a ReportConfig) -> Vec<Matched<'a>> {
    let matched: Vec<Matched<'a>> = corpus
        .iter()
        .filter_map(|article| {
            let keywords = matched_keywords(article, &report.keywords);
            (!keywords.is_empty()).then_some(Matched { article, keywords })
        })
        .collect();
    info!(count = matched.len(), "Found articles for this report");
    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn article(title: &str, body: &str) -> Article {
        Article {
            date: NaiveDate::from_ymd_opt(2025, 5, 6).unwrap(),
            title: title.to_string(),
            source: "Feed".to_string(),
            body: body.to_string(),
            link: format!("https://news.test/{title}"),
        }
    }

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_substring_match_in_title_or_body() {
        let kws = keywords(&["금리"]);
        assert_eq!(matched_keywords(&article("기준금리 동결", "본문"), &kws), vec!["금리"]);
        assert_eq!(matched_keywords(&article("제목", "시장 금리가 올랐다"), &kws), vec!["금리"]);
        assert!(matched_keywords(&article("제목", "본문"), &kws).is_empty());
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let kws = keywords(&["Fed", "KOSPI"]);
        let a = article("the FED holds", "kospi rallied");
        assert_eq!(matched_keywords(&a, &kws), vec!["Fed", "KOSPI"]);
    }

    #[test]
    fn test_match_spans_title_body_boundary() {
        // title and body are concatenated without a separator
        let kws = keywords(&["농협"]);
        assert_eq!(matched_keywords(&article("지역 농", "협 소식"), &kws), vec!["농협"]);
    }

    #[test]
    fn test_matched_keywords_follow_report_order() {
        let kws = keywords(&["농협", "농촌", "축산업"]);
        let a = article("축산업 위기", "농협이 대책을 내놨다");
        let matched = matched_keywords(&a, &kws);
        assert_eq!(matched, vec!["농협", "축산업"]);
    }

    #[test]
    fn test_classify_keeps_corpus_order_and_labels() {
        let corpus = vec![
            article("a", "환율 상승"),
            article("b", "날씨"),
            article("c", "수출 증가와 환율"),
        ];
        let report = ReportConfig::new("경제_리포트", &["환율", "수출"]);
        let matched = classify(&corpus, &report);
        assert_eq!(matched.len(), 2);
        assert_eq!(matched[0].article.title, "a");
        assert_eq!(matched[1].keyword_label(), "환율, 수출");
    }

    #[test]
    fn test_reports_are_independent() {
        let corpus = vec![article("농협 환율 대응", "본문")];
        let farm = ReportConfig::new("농업", &["농협"]);
        let economy = ReportConfig::new("경제", &["환율"]);

        let a = classify(&corpus, &farm);
        let b = classify(&corpus, &economy);
        assert_eq!(a.len(), 1);
        assert_eq!(b.len(), 1);
        assert!(std::ptr::eq(a[0].article, b[0].article));
        assert_eq!(corpus[0].title, "농협 환율 대응");
    }

    #[test]
    fn test_no_matches() {
        let corpus = vec![article("x", "y")];
        let report = ReportConfig::new("empty", &["없는단어"]);
        assert!(classify(&corpus, &report).is_empty());
    }
}
