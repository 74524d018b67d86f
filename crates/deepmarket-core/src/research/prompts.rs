//! Prompt catalog for the market report.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies a report section.
///
/// Variant order is report order; insights always comes last because its
/// prompt is built from the other three answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKey {
    Gaps,
    Competitors,
    Opportunities,
    Insights,
}

impl SectionKey {
    /// All sections in report order.
    pub const ALL: [SectionKey; 4] = [
        SectionKey::Gaps,
        SectionKey::Competitors,
        SectionKey::Opportunities,
        SectionKey::Insights,
    ];

    /// Sections researched independently of each other.
    pub const RESEARCH: [SectionKey; 3] = [
        SectionKey::Gaps,
        SectionKey::Competitors,
        SectionKey::Opportunities,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKey::Gaps => "gaps",
            SectionKey::Competitors => "competitors",
            SectionKey::Opportunities => "opportunities",
            SectionKey::Insights => "insights",
        }
    }

    /// Human-readable heading.
    pub fn title(&self) -> &'static str {
        match self {
            SectionKey::Gaps => "Market Gaps",
            SectionKey::Competitors => "Competitors",
            SectionKey::Opportunities => "Growth Opportunities",
            SectionKey::Insights => "Actionable Insights",
        }
    }

    /// Section text used when its query fails.
    pub fn placeholder(&self, error: &dyn fmt::Display) -> String {
        match self {
            SectionKey::Insights => format!("Error generating insights: {}", error),
            _ => format!("Error fetching data: {}", error),
        }
    }
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prompt bound to the section it produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub key: SectionKey,
    pub text: String,
}

impl Prompt {
    /// The three independent research prompts, in report order.
    pub fn research_catalog(topic: &str) -> [Self; 3] {
        [
            Self {
                key: SectionKey::Gaps,
                text: format!(
                    "Identify key market gaps and unmet needs in '{topic}'. Include data and trends."
                ),
            },
            Self {
                key: SectionKey::Competitors,
                text: format!(
                    "Analyze top 3-5 competitors in '{topic}'. Cover strengths, weaknesses, market share."
                ),
            },
            Self {
                key: SectionKey::Opportunities,
                text: format!(
                    "Find growth opportunities and actionable strategies for entering '{topic}' market."
                ),
            },
        ]
    }

    /// Research prompt for a single section.
    ///
    /// Returns `None` for [`SectionKey::Insights`], which needs the other
    /// sections' text; see [`Prompt::insights`].
    pub fn research(key: SectionKey, topic: &str) -> Option<Self> {
        Self::research_catalog(topic)
            .into_iter()
            .find(|p| p.key == key)
    }

    /// Synthesis prompt over the finished research sections.
    ///
    /// Takes whatever text the sections ended up with, error placeholders
    /// included.
    pub fn insights(gaps: &str, competitors: &str, opportunities: &str) -> Self {
        Self {
            key: SectionKey::Insights,
            text: format!(
                "Summarize actionable insights from: Gaps: {gaps}; Competitors: {competitors}; Opportunities: {opportunities}."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_substitutes_topic() {
        let prompts = Prompt::research_catalog("AI in healthcare");
        let keys: Vec<_> = prompts.iter().map(|p| p.key).collect();
        assert_eq!(keys, SectionKey::RESEARCH.to_vec());
        assert_eq!(
            Prompt::research(SectionKey::Competitors, "AI in healthcare"),
            Some(prompts[1].clone())
        );
        assert!(prompts.iter().all(|p| p.text.contains("'AI in healthcare'")));
    }

    #[test]
    fn test_no_standalone_insights_prompt() {
        assert!(Prompt::research(SectionKey::Insights, "x").is_none());
    }

    #[test]
    fn test_insights_embeds_sections() {
        let prompt = Prompt::insights("G", "C", "O");
        assert_eq!(
            prompt.text,
            "Summarize actionable insights from: Gaps: G; Competitors: C; Opportunities: O."
        );
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(
            SectionKey::Gaps.placeholder(&"boom"),
            "Error fetching data: boom"
        );
        assert_eq!(
            SectionKey::Insights.placeholder(&"boom"),
            "Error generating insights: boom"
        );
    }
}
