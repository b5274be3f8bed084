// src/report/html.rs
// =============================================================================
// Renders a Report as a standalone HTML page and writes it to disk.
//
// render_html is a pure function: same Report + same timestamp = same page.
// Everything that came from the crawled site (URLs, error messages) is
// HTML-escaped before it goes into the page.
// =============================================================================

use super::{DurationBand, LinkOutcome, Report};
use chrono::{DateTime, Local};
use reqwest::StatusCode;
use std::path::Path;

const STYLE: &str = r#"
    body { padding: 2rem; font-family: system-ui, sans-serif; }
    h1 { margin-bottom: 2rem; }
    a { word-break: break-all; }
    table { border-collapse: collapse; width: 100%; }
    th, td { border: 1px solid #dee2e6; padding: .4rem .6rem; text-align: left; }
    .badge { background: #6c757d; color: #fff; border-radius: .4rem; padding: 0 .5rem; }
    .status-badge.success { color: #198754; }
    .status-badge.redirect { color: #0d6efd; }
    .status-badge.error { color: #dc3545; }
    .duration-fast { color: #198754; }
    .duration-medium { color: #b58900; }
    .duration-slow { color: #fd7e14; }
    .duration-very-slow { color: #dc3545; }
    .empty-state { color: #6c757d; font-style: italic; }
"#;

// Renders the whole report page
//
// Sections, in order: Summary, Working Links, Broken Links, Failed Checks
pub fn render_html(report: &Report, generated_at: DateTime<Local>) -> String {
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    page.push_str("  <meta charset=\"UTF-8\">\n");
    page.push_str("  <title>Broken Link Crawler Report</title>\n");
    page.push_str(&format!("  <style>{}</style>\n", STYLE));
    page.push_str("</head>\n<body>\n");
    page.push_str("  <h1>Broken Link Crawler Report</h1>\n");

    page.push_str(&render_summary(report));
    page.push_str(&render_section("Working Links", &report.ok));
    page.push_str(&render_section("Broken Links", &report.broken));
    page.push_str(&render_section("Failed Checks", &report.failed));

    page.push_str(&format!(
        "  <p class=\"generated\">Generated on {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    page.push_str("</body>\n</html>\n");
    page
}

// Writes the rendered report, creating parent directories if needed
pub fn write_report(path: &Path, report: &Report) -> std::io::Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)?;
        }
    }
    std::fs::write(path, render_html(report, Local::now()))
}

// Totals and success rate, shown above the tables
fn render_summary(report: &Report) -> String {
    let total = report.total();
    format!(
        "  <section id=\"summary\" class=\"summary\">\n    <h3>Summary</h3>\n    <ul>\n      \
         <li>Total Links Checked: <strong>{}</strong></li>\n      \
         <li>Success Rate: <strong>{}%</strong></li>\n      \
         <li>Broken Links: <strong>{}</strong></li>\n      \
         <li>Failed Checks: <strong>{}</strong></li>\n    </ul>\n  </section>\n",
        total,
        success_rate(report.ok.len(), total),
        report.broken.len(),
        report.failed.len()
    )
}

// Whole percent of working links; an empty report is 0%
fn success_rate(ok: usize, total: usize) -> usize {
    if total == 0 {
        0
    } else {
        ok * 100 / total
    }
}

fn render_section(title: &str, outcomes: &[LinkOutcome]) -> String {
    let mut html = String::new();
    let id = slug(title);

    html.push_str(&format!(
        "  <section id=\"{}\">\n    <h3>{} <span class=\"badge\">{}</span></h3>\n",
        id,
        escape(title),
        outcomes.len()
    ));

    if outcomes.is_empty() {
        html.push_str(&format!(
            "    <p class=\"empty-state\">No {} found</p>\n  </section>\n",
            escape(&title.to_lowercase())
        ));
        return html;
    }

    html.push_str("    <table>\n");
    html.push_str(
        "      <thead><tr><th>Link</th><th>Status</th><th>Source Page</th><th>Duration</th></tr></thead>\n",
    );
    html.push_str("      <tbody>\n");
    for outcome in outcomes {
        html.push_str(&render_row(outcome));
    }
    html.push_str("      </tbody>\n    </table>\n  </section>\n");
    html
}

fn render_row(outcome: &LinkOutcome) -> String {
    let url = escape(outcome.url());
    let source = escape(outcome.source());
    let duration = outcome.duration_ms();

    let status_cell = match outcome {
        LinkOutcome::Failed { error_message, .. } => format!(
            "<span class=\"status-badge error\">error</span> {}",
            escape(error_message)
        ),
        LinkOutcome::Ok { status, .. } | LinkOutcome::Broken { status, .. } => format!(
            "<span class=\"status-badge {}\">{}</span>",
            status_class(*status),
            escape(&status_text(*status))
        ),
    };

    // "root" isn't a link, don't make it one
    let source_cell = if outcome.source() == super::ROOT_SOURCE {
        source
    } else {
        format!("<a href=\"{0}\" target=\"_blank\">{0}</a>", source)
    };

    format!(
        "        <tr><td><a href=\"{0}\" target=\"_blank\">{0}</a></td><td>{1}</td><td>{2}</td><td class=\"{3}\">{4}ms</td></tr>\n",
        url,
        status_cell,
        source_cell,
        DurationBand::from_ms(duration).css_class(),
        duration
    )
}

// "404" -> "404 - Not Found"
fn status_text(status: u16) -> String {
    let reason = StatusCode::from_u16(status)
        .ok()
        .and_then(|code| code.canonical_reason());

    match reason {
        Some(reason) => format!("{} - {}", status, reason),
        None => status.to_string(),
    }
}

fn status_class(status: u16) -> &'static str {
    match status {
        0..=299 => "success",
        300..=399 => "redirect",
        _ => "error",
    }
}

// "Failed Checks" -> "failed-checks"
fn slug(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ')
        .map(|c| if c == ' ' { '-' } else { c.to_ascii_lowercase() })
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
