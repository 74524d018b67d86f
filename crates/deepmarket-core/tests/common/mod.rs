//! Scripted stand-ins for the upstream API and the research client.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use deepmarket_core::llm::{HttpResponse, Transport};
use deepmarket_core::{Citation, QueryError, QueryResult, ResearchClient};

/// A recorded POST.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: String,
    pub bearer: String,
    pub body: serde_json::Value,
}

impl RecordedRequest {
    pub fn model(&self) -> &str {
        self.body["model"].as_str().unwrap_or_default()
    }
}

/// Replays queued responses in order and records every request.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, QueryError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answers every request with the same response.
    pub fn always(response: HttpResponse, times: usize) -> Self {
        Self::new(vec![response; times])
    }

    pub fn push_error(&self, err: QueryError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, QueryError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.to_string(),
            bearer: bearer.to_string(),
            body: body.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(HttpResponse::new(599, "script exhausted")))
    }
}

/// A 200 response carrying `content` as the first choice.
pub fn completion(content: &str) -> HttpResponse {
    let body = serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    });
    HttpResponse::new(200, body.to_string())
}

/// A non-200 response with a JSON `error.message`.
pub fn api_error(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": { "message": message } });
    HttpResponse::new(status, body.to_string())
}

/// Research client answering by prompt prefix, recording every prompt.
#[derive(Default)]
pub struct FakeResearchClient {
    rules: Vec<(String, Result<QueryResult, (u16, String)>)>,
    prompts: Mutex<Vec<String>>,
}

impl FakeResearchClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer prompts starting with `prefix`.
    pub fn answer(mut self, prefix: &str, answer: &str, citations: Vec<Citation>) -> Self {
        self.rules.push((
            prefix.to_string(),
            Ok(QueryResult {
                answer: answer.to_string(),
                citations,
            }),
        ));
        self
    }

    /// Fail prompts starting with `prefix` with an API error.
    pub fn fail(mut self, prefix: &str, status: u16, message: &str) -> Self {
        self.rules
            .push((prefix.to_string(), Err((status, message.to_string()))));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn prompt_starting_with(&self, prefix: &str) -> Option<String> {
        self.prompts().into_iter().find(|p| p.starts_with(prefix))
    }
}

#[async_trait]
impl ResearchClient for FakeResearchClient {
    async fn query(&self, prompt: &str, _model: Option<&str>) -> Result<QueryResult, QueryError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let rule = self.rules.iter().find(|(prefix, _)| prompt.starts_with(prefix.as_str()));
        match rule {
            Some((_, Ok(result))) => Ok(result.clone()),
            Some((_, Err((status, message)))) => Err(QueryError::ApiError {
                status: *status,
                message: message.clone(),
            }),
            None => Err(QueryError::ApiError {
                status: 404,
                message: format!("no scripted answer for: {prompt}"),
            }),
        }
    }
}

/// Prompt prefixes of the four catalog prompts.
pub const GAPS: &str = "Identify key market gaps";
pub const COMPETITORS: &str = "Analyze top 3-5 competitors";
pub const OPPORTUNITIES: &str = "Find growth opportunities";
pub const INSIGHTS: &str = "Summarize actionable insights";
