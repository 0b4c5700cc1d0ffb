//! HTML report rendering.
//!
//! Each non-empty report becomes one standalone UTF-8 HTML page with a table
//! of dated, keyword-tagged, summarized articles.
//!
//! # Output Path
//!
//! ```text
//! output_dir/
//! ├── 농업_농협_리포트_2025-05-06.html
//! └── 경제_리포트_2025-05-06.html
//! ```

use crate::models::Report;
use crate::utils::escape_html;
use std::error::Error;
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

const STYLE: &str = r#"
    body { font-family: Arial, sans-serif; margin: 20px; }
    h1 { color: #333; }
    table { width: 100%; border-collapse: collapse; }
    th, td { border: 1px solid #ddd; padding: 8px; text-align: left; vertical-align: top; }
    th { background-color: #f2f2f2; }
    tr:nth-child(even) { background-color: #f9f9f9; }
    a { color: #0066cc; text-decoration: none; }
    a:hover { text-decoration: underline; }
    td.date { white-space: nowrap; }
"#;

/// Render a report as a complete HTML document.
///
/// All article-derived text is escaped; links open in a new tab.
pub fn render_report(report: &Report) -> String {
    let name = escape_html(&report.name);
    let date = report.date.format("%Y-%m-%d");
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="ko">
<head>
  <meta charset="UTF-8">
  <title>{name} - {date}</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>{name} ({date})</h1>
  <table>
    <thead>
      <tr>
        <th>날짜</th>
        <th>주요 키워드</th>
        <th>제목 / 요약</th>
        <th>출처</th>
      </tr>
    </thead>
    <tbody>
"#
    );

    for item in &report.items {
        let _ = write!(
            html,
            r#"      <tr>
        <td class="date">{}</td>
        <td>{}</td>
        <td>
          <strong><a href="{}" target="_blank" rel="noopener noreferrer">{}</a></strong>
          <br>
          {}
        </td>
        <td>{}</td>
      </tr>
"#,
            escape_html(&item.date),
            escape_html(&item.keywords),
            escape_html(&item.link),
            escape_html(&item.title),
            escape_html(&item.summary),
            escape_html(&item.source),
        );
    }

    html.push_str(
        r#"    </tbody>
  </table>
</body>
</html>
"#,
    );
    html
}

/// Render `report` and write it to `{output_dir}/{name}_{date}.html`.
///
/// The directory is created when missing. Returns the written path.
#[instrument(level = "info", skip_all, fields(report = %report.name, output_dir = %output_dir.display()))]
pub async fn write_report(report: &Report, output_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(report.file_name());
    fs::write(&path, render_report(report)).await?;
    info!(path = %path.display(), items = report.items.len(), "Successfully generated report");
    Ok(path)
}

/// Copy a written report into the publish directory.
#[instrument(level = "info", skip_all, fields(publish_dir = %publish_dir.display()))]
pub async fn publish_report(path: &Path, publish_dir: &Path) -> Result<PathBuf, Box<dyn Error>> {
    let file_name = path
        .file_name()
        .ok_or_else(|| format!("{} has no file name", path.display()))?;
    fs::create_dir_all(publish_dir).await?;
    let target = publish_dir.join(file_name);
    fs::copy(path, &target).await?;
    info!(path = %target.display(), "Published report");
    Ok(target)
}
