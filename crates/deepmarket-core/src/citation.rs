//! Source extraction from free-text answers.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Most sources kept when the answer has no numbered references.
pub const MAX_BARE_URLS: usize = 10;

/// A source referenced by an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
    /// Reference number as written in the answer, or a 1-based position.
    pub id: String,
    /// URL of the source.
    pub source: String,
}

impl Citation {
    pub fn new(id: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
        }
    }
}

fn numbered_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(\d+)\]\s*(https?://[^\s\]]+)").expect("valid regex"))
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"https?://[^\s\]]+").expect("valid regex"))
}

/// Extracts citations from an answer.
///
/// Numbered references (`[3] https://...`) win when present; their numbers
/// are kept verbatim and repeats are kept. Otherwise the first
/// [`MAX_BARE_URLS`] bare URLs are numbered from 1. An answer without any
/// URL yields an empty list.
pub fn extract_citations(content: &str) -> Vec<Citation> {
    let numbered: Vec<Citation> = numbered_pattern()
        .captures_iter(content)
        .map(|caps| Citation::new(&caps[1], &caps[2]))
        .collect();

    if !numbered.is_empty() {
        return numbered;
    }

    url_pattern()
        .find_iter(content)
        .take(MAX_BARE_URLS)
        .enumerate()
        .map(|(i, m)| Citation::new((i + 1).to_string(), m.as_str()))
        .collect()
}
