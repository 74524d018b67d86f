//! HTTP transport used by the query client.
//!
//! The client never talks to `reqwest` directly. It owns a [`Transport`],
//! which lets tests substitute a scripted upstream and lets the retry policy
//! live in its own layer ([`super::RetryingTransport`]).

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::QueryError;

/// A raw upstream response: status plus undecoded body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// Sends one authenticated JSON POST.
///
/// Non-2xx statuses are not errors at this layer; they come back as a
/// response so callers can inspect the body. `Err` is reserved for failures
/// where no response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, QueryError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, QueryError> {
        (**self).post_json(url, bearer, body).await
    }
}

/// `reqwest`-backed transport. Cloning shares the connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, QueryError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, QueryError> {
        let response = self
            .client
            .post(url)
            .header("authorization", format!("Bearer {}", bearer))
            .header("content-type", "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}
