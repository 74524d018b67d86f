use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prompts::SectionKey;
use crate::citation::Citation;

/// A finished market research report.
///
/// Always holds one section per [`SectionKey`], in report order. Sections
/// whose query failed carry a placeholder instead of an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Topic the report was built for
    pub topic: String,
    /// When the pipeline finished
    pub generated_at: DateTime<Utc>,
    /// Sections in report order
    pub sections: Vec<Section>,
    /// Every section's citations, concatenated in section order.
    /// Not deduplicated.
    pub citations: Vec<Citation>,
}

impl Report {
    /// Assembles a report from finished sections.
    pub fn new(topic: impl Into<String>, mut sections: Vec<Section>) -> Self {
        sections.sort_by_key(|s| s.key);
        let citations = sections
            .iter()
            .flat_map(|s| s.citations.iter().cloned())
            .collect();

        Self {
            topic: topic.into(),
            generated_at: Utc::now(),
            sections,
            citations,
        }
    }

    pub fn section(&self, key: SectionKey) -> Option<&Section> {
        self.sections.iter().find(|s| s.key == key)
    }

    /// Section text, or an empty string if the section is absent.
    pub fn text(&self, key: SectionKey) -> &str {
        self.section(key).map(Section::text).unwrap_or_default()
    }

    /// True when at least one section holds a placeholder.
    pub fn is_degraded(&self) -> bool {
        self.sections.iter().any(Section::is_failed)
    }

    /// File name for a downloadable rendering of this report.
    pub fn download_filename(&self, extension: &str) -> String {
        format!(
            "market_research_{}.{}",
            self.topic.replace(' ', "_"),
            extension.trim_start_matches('.')
        )
    }

    /// Converts the report to markdown format.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!("# Deep Market Research Report: {}\n\n", self.topic));
        md.push_str(&format!(
            "_Generated {}_\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        ));

        for section in &self.sections {
            md.push_str(&format!("## {}\n\n", section.key.title()));
            md.push_str(section.text());
            md.push_str("\n\n");
        }

        md.push_str("## Citations\n\n");
        if self.citations.is_empty() {
            md.push_str("No sources cited.\n");
        }
        for cite in &self.citations {
            md.push_str(&format!("- [{}] {}\n", cite.id, cite.source));
        }

        md
    }
}

/// One section of a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub key: SectionKey,
    pub body: SectionBody,
    /// Sources of this section's answer; empty for failed sections.
    pub citations: Vec<Citation>,
}

impl Section {
    pub fn answered(key: SectionKey, answer: impl Into<String>, citations: Vec<Citation>) -> Self {
        Self {
            key,
            body: SectionBody::Answer(answer.into()),
            citations,
        }
    }

    pub fn failed(key: SectionKey, placeholder: impl Into<String>) -> Self {
        Self {
            key,
            body: SectionBody::Failed(placeholder.into()),
            citations: Vec::new(),
        }
    }

    /// Answer text or placeholder.
    pub fn text(&self) -> &str {
        match &self.body {
            SectionBody::Answer(text) | SectionBody::Failed(text) => text,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.body, SectionBody::Failed(_))
    }
}

/// Outcome of a section's query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum SectionBody {
    /// Answer text from the search API
    Answer(String),
    /// Placeholder describing why the query failed
    Failed(String),
}
