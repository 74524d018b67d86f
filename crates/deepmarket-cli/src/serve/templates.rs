//! HTML template rendering for the report preview.
//!
//! Templates are stored as separate files and embedded at compile time
//! using `include_str!`:
//! - `templates/home.html` - topic form
//! - `templates/report.html` - rendered report
//! - `templates/styles.css` - shared styles

use deepmarket_core::Report;

const HOME_TEMPLATE: &str = include_str!("templates/home.html");
const REPORT_TEMPLATE: &str = include_str!("templates/report.html");
const STYLES: &str = include_str!("templates/styles.css");

/// Render the topic form, optionally with a validation error.
pub fn render_home(error: Option<&str>, topic: &str) -> String {
    let error_html = error
        .map(|e| format!("<p class=\"error\">{}</p>", html_escape(e)))
        .unwrap_or_default();

    HOME_TEMPLATE
        .replace("{{STYLES}}", STYLES)
        .replace("{{ERROR}}", &error_html)
        .replace("{{TOPIC}}", &html_escape(topic))
}

/// Render a finished report.
///
/// Placeholders:
/// - `{{TOPIC}}` - escaped topic
/// - `{{GENERATED}}` - generation timestamp
/// - `{{SECTIONS}}` - one `<section>` per report section
/// - `{{CITATIONS}}` - citation list items
/// - `{{DOWNLOAD_URL}}` - link to the downloadable document
pub fn render_report(report: &Report) -> String {
    let sections: String = report
        .sections
        .iter()
        .map(|section| {
            let class = if section.is_failed() { "section failed" } else { "section" };
            format!(
                "<section class=\"{}\" id=\"{}\">\n<h2>{}</h2>\n<div class=\"body\">{}</div>\n</section>\n",
                class,
                section.key.as_str(),
                html_escape(section.key.title()),
                html_escape(section.text())
            )
        })
        .collect();

    let citations: String = if report.citations.is_empty() {
        "<li class=\"empty\">No sources cited.</li>".to_string()
    } else {
        report
            .citations
            .iter()
            .map(|cite| {
                let source = html_escape(&cite.source);
                format!(
                    "<li>[{}] <a href=\"{}\" rel=\"noopener noreferrer\">{}</a></li>\n",
                    html_escape(&cite.id),
                    source,
                    source
                )
            })
            .collect()
    };

    let download_url = format!("/download/{}", urlencoding::encode(&report.topic));

    REPORT_TEMPLATE
        .replace("{{STYLES}}", STYLES)
        .replace("{{TOPIC}}", &html_escape(&report.topic))
        .replace(
            "{{GENERATED}}",
            &report.generated_at.format("%Y-%m-%d %H:%M UTC").to_string(),
        )
        .replace("{{DOWNLOAD_URL}}", &html_escape(&download_url))
        .replace("{{SECTIONS}}", &sections)
        .replace("{{CITATIONS}}", &citations)
}

/// Escape HTML special characters to prevent XSS.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
