mod client;
mod error;
mod retry;
mod transport;

pub use client::QueryClient;
pub use error::QueryError;
pub use retry::{RetryPolicy, RetryingTransport};
pub use transport::{HttpResponse, HttpTransport, Transport};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::citation::Citation;

/// One answered prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Answer text from the first completion choice.
    pub answer: String,
    /// Sources extracted from the answer, in order of appearance.
    pub citations: Vec<Citation>,
}

/// Answers a research prompt with cited text.
///
/// This is the seam the report pipeline depends on, so it can run against
/// the real [`QueryClient`] or a stand-in.
///
/// # Example
///
/// ```ignore
/// use deepmarket_core::llm::{QueryClient, ResearchClient};
///
/// let client = QueryClient::from_env()?;
/// let result = client.query("Who leads the EV charging market?", None).await?;
/// println!("{} ({} sources)", result.answer, result.citations.len());
/// ```
#[async_trait]
pub trait ResearchClient: Send + Sync {
    /// Queries `model`, or the client's default model when `None`.
    async fn query(&self, prompt: &str, model: Option<&str>) -> Result<QueryResult, QueryError>;
}

#[async_trait]
impl ResearchClient for Box<dyn ResearchClient> {
    async fn query(&self, prompt: &str, model: Option<&str>) -> Result<QueryResult, QueryError> {
        (**self).query(prompt, model).await
    }
}

#[async_trait]
impl<C: ResearchClient + ?Sized> ResearchClient for Arc<C> {
    async fn query(&self, prompt: &str, model: Option<&str>) -> Result<QueryResult, QueryError> {
        (**self).query(prompt, model).await
    }
}
