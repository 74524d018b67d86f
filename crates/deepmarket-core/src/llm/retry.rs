//! Retrying transport layer.
//!
//! Transient upstream failures (5xx in the status forcelist, or no response
//! at all) are absorbed here so the query client only ever sees a final
//! response.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use super::transport::{HttpResponse, Transport};
use super::QueryError;
use crate::config::RetryConfig;

/// When and how long to wait between attempts.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: f64,
    backoff_max: f64,
    statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_factor: config.backoff_factor.max(0.0),
            backoff_max: config.backoff_max_secs.max(0.0),
            statuses: config.status_forcelist.clone(),
        }
    }

    /// Sets the backoff factor in seconds. Zero disables sleeping.
    pub fn with_backoff_factor(mut self, factor: f64) -> Self {
        self.backoff_factor = factor.max(0.0);
        self
    }

    /// Sets the number of retries after the first attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Total attempts, first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.statuses.contains(&status)
    }

    /// Sleep before the `retry`-th retry (1-based).
    ///
    /// The first retry is immediate; after that the wait doubles:
    /// `factor * 2^(retry - 1)`, capped at the configured maximum.
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 || self.backoff_factor == 0.0 {
            return Duration::ZERO;
        }
        let exp = (retry - 1).min(31) as i32;
        let secs = (self.backoff_factor * 2f64.powi(exp)).min(self.backoff_max);
        Duration::from_secs_f64(secs)
    }
}

/// A [`Transport`] decorator that re-sends requests on transient failures.
///
/// Once the budget is spent the last response (or error) is returned as is;
/// classifying it is the caller's job.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T> {
    inner: T,
    policy: RetryPolicy,
}

impl<T: Transport> RetryingTransport<T> {
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl<T: Transport> Transport for RetryingTransport<T> {
    async fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, QueryError> {
        let mut retry = 0;
        loop {
            let outcome = self.inner.post_json(url, bearer, body).await;

            let reason = match &outcome {
                Ok(response) if self.policy.is_retryable_status(response.status) => {
                    Some(format!("status {}", response.status))
                }
                Err(QueryError::Network(msg)) => Some(msg.clone()),
                _ => None,
            };
            let Some(reason) = reason else {
                return outcome;
            };

            if retry >= self.policy.max_retries {
                warn!(attempts = retry + 1, %reason, "Retry budget exhausted");
                return outcome;
            }

            retry += 1;
            let delay = self.policy.backoff(retry);
            warn!(
                retry,
                max = self.policy.max_retries,
                backoff_ms = delay.as_millis() as u64,
                %reason,
                "Retrying after transient upstream failure"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
