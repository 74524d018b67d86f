use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::retry::{RetryPolicy, RetryingTransport};
use super::transport::{HttpResponse, HttpTransport, Transport};
use super::{QueryError, QueryResult, ResearchClient};
use crate::citation::extract_citations;
use crate::config::{
    ApiConfig, Config, ANSWER_MAX_TOKENS, ANSWER_TEMPERATURE, RESEARCH_SYSTEM_PROMPT,
};

/// Attempts per query across models: the requested one, then the fallback.
const MAX_MODEL_ATTEMPTS: usize = 2;

/// Client for the search API's chat completions endpoint.
///
/// Transient 5xx failures are absorbed by the transport; an "invalid model"
/// rejection is retried once against the configured fallback model.
pub struct QueryClient<T = RetryingTransport<HttpTransport>> {
    api_key: String,
    endpoint: String,
    model: String,
    fallback_model: String,
    transport: T,
}

impl QueryClient {
    /// Creates a client over the retrying HTTP transport.
    ///
    /// Fails with [`QueryError::MissingApiKey`] when no key is configured.
    pub fn new(config: &Config) -> Result<Self, QueryError> {
        let http = HttpTransport::new(config.api.timeout())?;
        let transport = RetryingTransport::new(http, RetryPolicy::from_config(&config.retry));
        QueryClient::with_transport(&config.api, transport)
    }

    /// Creates a client from defaults plus environment variables.
    pub fn from_env() -> Result<Self, QueryError> {
        let mut config = Config::default();
        config.apply_env_overrides();
        Self::new(&config)
    }
}

impl<T: Transport> QueryClient<T> {
    /// Creates a client over an arbitrary transport.
    pub fn with_transport(api: &ApiConfig, transport: T) -> Result<Self, QueryError> {
        let api_key = api
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(QueryError::MissingApiKey)?;

        Ok(Self {
            api_key,
            endpoint: api.endpoint(),
            model: api.model.clone(),
            fallback_model: api.fallback_model.clone(),
            transport,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn build_request(&self, prompt: &str, model: &str) -> ChatRequest {
        ChatRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: RESEARCH_SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
            max_tokens: ANSWER_MAX_TOKENS,
            temperature: ANSWER_TEMPERATURE,
        }
    }

    async fn send_request(&self, prompt: &str, model: &str) -> Result<HttpResponse, QueryError> {
        let request = self.build_request(prompt, model);
        let body = serde_json::to_value(&request)
            .map_err(|e| QueryError::ParseError(e.to_string()))?;

        debug!(model, prompt_len = prompt.len(), "Sending query");
        self.transport
            .post_json(&self.endpoint, &self.api_key, &body)
            .await
    }
}

#[async_trait]
impl<T: Transport> ResearchClient for QueryClient<T> {
    async fn query(&self, prompt: &str, model: Option<&str>) -> Result<QueryResult, QueryError> {
        let mut model = model.unwrap_or(&self.model).to_string();
        let mut attempt = 1;

        // Primary model, then at most one fallback attempt.
        loop {
            let response = self.send_request(prompt, &model).await?;

            if response.is_success() {
                return parse_success(&response.body);
            }

            let message = error_message(&response.body);
            let rejection = Rejection::classify(response.status, &message);

            let can_fall_back = attempt < MAX_MODEL_ATTEMPTS
                && rejection == Rejection::InvalidModel
                && model != self.fallback_model;
            if !can_fall_back {
                return Err(QueryError::ApiError {
                    status: response.status,
                    message,
                });
            }

            warn!(
                model = %model,
                fallback = %self.fallback_model,
                "Model rejected as invalid, retrying with fallback"
            );
            model = self.fallback_model.clone();
            attempt += 1;
        }
    }
}

/// How a non-200 response is handled by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    InvalidModel,
    Other,
}

impl Rejection {
    fn classify(status: u16, message: &str) -> Self {
        if status == 400 && message.to_lowercase().contains("invalid model") {
            Rejection::InvalidModel
        } else {
            Rejection::Other
        }
    }
}

fn parse_success(body: &str) -> Result<QueryResult, QueryError> {
    let chat: ChatResponse =
        serde_json::from_str(body).map_err(|e| QueryError::ParseError(e.to_string()))?;

    let answer = chat
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| QueryError::ParseError("response has no choices".to_string()))?;

    let citations = extract_citations(&answer);
    Ok(QueryResult { answer, citations })
}

/// Best-effort error message.
///
/// `error.message` when the body is a JSON object carrying one, an empty
/// string for a JSON object without an `error` key, the raw body otherwise.
fn error_message(body: &str) -> String {
    let json = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(json) if json.is_object() => json,
        _ => return body.to_string(),
    };

    match json.get("error") {
        None => String::new(),
        Some(error) => match error.get("message").and_then(|m| m.as_str()) {
            Some(message) if error.is_object() => message.to_string(),
            _ => body.to_string(),
        },
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api_with_key() -> ApiConfig {
        ApiConfig {
            api_key: Some("test-key".to_string()),
            ..ApiConfig::default()
        }
    }

    #[test]
    fn test_missing_key_fails_fast() {
        let result = QueryClient::with_transport(
            &ApiConfig::default(),
            HttpTransport::with_client(reqwest::Client::new()),
        );
        assert!(matches!(result, Err(QueryError::MissingApiKey)));
    }

    #[test]
    fn test_request_shape() {
        let client =
            QueryClient::with_transport(&api_with_key(), HttpTransport::with_client(reqwest::Client::new()))
                .unwrap();
        let request = client.build_request("What about EVs?", "sonar-pro");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["model"], "sonar-pro");
        assert_eq!(json["max_tokens"], 1500);
        assert_eq!(json["temperature"], 0.7);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["messages"][1]["content"], "What about EVs?");
    }

    #[test]
    fn test_error_message_prefers_json_field() {
        assert_eq!(
            error_message(r#"{"error":{"message":"Invalid model 'x'"}}"#),
            "Invalid model 'x'"
        );
        assert_eq!(error_message("<html>Bad Gateway</html>"), "<html>Bad Gateway</html>");
        assert_eq!(error_message(r#"{"detail":"nope"}"#), "");
    }

    #[test]
    fn test_error_message_keeps_body_for_unusual_error_field() {
        let body = r#"{"error":"Invalid model 'x'"}"#;
        assert_eq!(error_message(body), body);
        assert_eq!(error_message(r#"{"error":null}"#), r#"{"error":null}"#);
        assert_eq!(
            error_message(r#"{"error":{"code":7}}"#),
            r#"{"error":{"code":7}}"#
        );
    }

    #[test]
    fn test_classify() {
        assert_eq!(Rejection::classify(400, "INVALID MODEL given"), Rejection::InvalidModel);
        assert_eq!(Rejection::classify(404, "invalid model"), Rejection::Other);
        assert_eq!(Rejection::classify(400, "bad request"), Rejection::Other);
    }

    #[test]
    fn test_parse_success_without_choices() {
        let result = parse_success(r#"{"choices":[]}"#);
        assert!(matches!(result, Err(QueryError::ParseError(_))));
    }
}
