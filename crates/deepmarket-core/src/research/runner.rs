use tracing::{info, warn};

use crate::llm::{QueryError, QueryResult, ResearchClient};
use crate::research::prompts::{Prompt, SectionKey};
use crate::research::report::{Report, Section};

/// Builds market research reports.
///
/// The three research sections are queried concurrently; the insights
/// section is queried once they have all finished, from their final text.
/// A failing query only degrades its own section.
pub struct ReportBuilder<C: ResearchClient> {
    client: C,
    model: Option<String>,
}

impl<C: ResearchClient> ReportBuilder<C> {
    /// Creates a builder over the given client, using its default model.
    pub fn new(client: C) -> Self {
        Self {
            client,
            model: None,
        }
    }

    /// Queries `model` instead of the client's default.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Runs the whole pipeline for `topic`.
    ///
    /// Never fails: the returned report has all four sections, each holding
    /// either an answer or an error placeholder.
    pub async fn build(&self, topic: &str) -> Report {
        let [gaps, competitors, opportunities] = Prompt::research_catalog(topic);

        let (gaps, competitors, opportunities) = futures::join!(
            self.run_section(gaps),
            self.run_section(competitors),
            self.run_section(opportunities),
        );

        let insights_prompt =
            Prompt::insights(gaps.text(), competitors.text(), opportunities.text());
        let insights = self.run_section(insights_prompt).await;

        let report = Report::new(topic, vec![gaps, competitors, opportunities, insights]);
        info!(
            topic,
            citations = report.citations.len(),
            degraded = report.is_degraded(),
            "Report built"
        );
        report
    }

    /// Queries one prompt and turns the outcome into a section.
    async fn run_section(&self, prompt: Prompt) -> Section {
        let outcome = self.client.query(&prompt.text, self.model.as_deref()).await;
        section_from(prompt.key, outcome)
    }
}

fn section_from(key: SectionKey, outcome: Result<QueryResult, QueryError>) -> Section {
    match outcome {
        Ok(result) => Section::answered(key, result.answer, result.citations),
        Err(err) => {
            warn!(section = %key, error = %err, "Section query failed");
            Section::failed(key, key.placeholder(&err))
        }
    }
}
