//! Downloadable document rendering and topic validation.
//!
//! The document is a trimmed Markdown rendering meant for download: each
//! section is cut to [`MAX_SECTION_LINES`] lines and the citation list to
//! [`MAX_CITATIONS`] entries.

use deepmarket_core::Report;
use thiserror::Error;

/// Longest accepted topic, in characters.
pub const MAX_TOPIC_CHARS: usize = 200;

/// Lines kept per section in the downloadable document.
pub const MAX_SECTION_LINES: usize = 10;

/// Citations kept in the downloadable document.
pub const MAX_CITATIONS: usize = 10;

pub const DOCUMENT_EXTENSION: &str = "md";
pub const DOCUMENT_CONTENT_TYPE: &str = "text/markdown; charset=utf-8";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TopicError {
    #[error("Topic must not be empty")]
    Empty,

    #[error("Topic must be at most {max} characters (got {len})")]
    TooLong { len: usize, max: usize },

    #[error("Topic must not contain control characters")]
    ControlCharacter,
}

/// Trims the topic and checks its length and characters.
///
/// The topic ends up in the download file name, which travels in a
/// `Content-Disposition` header, so control characters are refused.
pub fn validate_topic(raw: &str) -> Result<String, TopicError> {
    let topic = raw.trim();
    if topic.is_empty() {
        return Err(TopicError::Empty);
    }
    let len = topic.chars().count();
    if len > MAX_TOPIC_CHARS {
        return Err(TopicError::TooLong {
            len,
            max: MAX_TOPIC_CHARS,
        });
    }
    if topic.chars().any(char::is_control) {
        return Err(TopicError::ControlCharacter);
    }
    Ok(topic.to_string())
}

/// Renders the downloadable document for a report.
pub fn render_document(report: &Report) -> String {
    let mut doc = String::new();

    doc.push_str(&format!("# Deep Market Research Report: {}\n\n", report.topic));

    for section in &report.sections {
        doc.push_str(&format!("## {}\n\n", section.key.title().to_uppercase()));
        for line in section.text().lines().take(MAX_SECTION_LINES) {
            doc.push_str(line);
            doc.push('\n');
        }
        doc.push('\n');
    }

    doc.push_str("## CITATIONS\n\n");
    for cite in report.citations.iter().take(MAX_CITATIONS) {
        doc.push_str(&format!("- [{}] {}\n", cite.id, cite.source));
    }
    if report.citations.len() > MAX_CITATIONS {
        doc.push_str(&format!(
            "- ... {} more\n",
            report.citations.len() - MAX_CITATIONS
        ));
    }

    doc
}

/// Attachment file name for a report's document.
pub fn document_filename(report: &Report) -> String {
    report.download_filename(DOCUMENT_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepmarket_core::{Citation, Section, SectionKey};

    fn report_with(text: &str, cites: usize) -> Report {
        let citations = (1..=cites)
            .map(|i| Citation::new(i.to_string(), format!("https://s{i}.example")))
            .collect();
        Report::new(
            "cloud gaming",
            vec![
                Section::answered(SectionKey::Gaps, text, citations),
                Section::answered(SectionKey::Competitors, "c", vec![]),
                Section::failed(SectionKey::Opportunities, "Error fetching data: x"),
                Section::answered(SectionKey::Insights, "i", vec![]),
            ],
        )
    }

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  EV charging "), Ok("EV charging".to_string()));
        assert_eq!(validate_topic("   "), Err(TopicError::Empty));
        let long = "x".repeat(MAX_TOPIC_CHARS + 1);
        assert_eq!(
            validate_topic(&long),
            Err(TopicError::TooLong {
                len: MAX_TOPIC_CHARS + 1,
                max: MAX_TOPIC_CHARS
            })
        );
        assert!(validate_topic(&"x".repeat(MAX_TOPIC_CHARS)).is_ok());
    }

    #[test]
    fn test_validate_topic_rejects_inner_control_characters() {
        assert_eq!(validate_topic("ev\ncharging"), Err(TopicError::ControlCharacter));
        assert_eq!(validate_topic("ev\tcharging"), Err(TopicError::ControlCharacter));
        assert_eq!(validate_topic("\nev charging\n"), Ok("ev charging".to_string()));
    }

    #[test]
    fn test_section_lines_capped() {
        let text: String = (1..=15).map(|i| format!("line {i}\n")).collect();
        let doc = render_document(&report_with(&text, 0));
        assert!(doc.contains("line 10\n"));
        assert!(!doc.contains("line 11"));
    }

    #[test]
    fn test_citations_capped() {
        let doc = render_document(&report_with("g", 12));
        assert!(doc.contains("- [10] https://s10.example"));
        assert!(!doc.contains("https://s11.example"));
        assert!(doc.contains("- ... 2 more"));
    }

    #[test]
    fn test_headings_and_filename() {
        let report = report_with("g", 0);
        let doc = render_document(&report);
        assert!(doc.contains("## MARKET GAPS"));
        assert!(doc.contains("Error fetching data: x"));
        assert_eq!(document_filename(&report), "market_research_cloud_gaming.md");
    }
}
