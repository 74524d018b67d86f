use thiserror::Error;

/// Errors that can occur while querying the search API.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("PERPLEXITY_API_KEY not set")]
    MissingApiKey,

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl QueryError {
    /// HTTP status carried by an upstream rejection.
    pub fn status(&self) -> Option<u16> {
        match self {
            QueryError::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(err: reqwest::Error) -> Self {
        QueryError::Network(err.to_string())
    }
}
