use std::future::Future;

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
}

impl Suggestion {
    pub fn new<S: Into<String>>(title: S) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("auth error: {0}")] Auth(String),
    #[error("rate limit: {0}")] RateLimit(String),
    #[error("timeout: {0}")] Timeout(String),
    #[error("network: {0}")] Network(String),
    #[error("decode: {0}")] Decode(String),
    #[error("status: {0}")] Status(String),
    #[error("other: {0}")] Other(String),
}

/// A keyword released by the rate limiter, tagged with its dispatch order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchRequest {
    pub seq: u64,
    pub query: String,
}

#[derive(Clone, Debug)]
pub struct SearchResponse {
    pub seq: u64,
    pub query: String,
    pub result: Result<Vec<Suggestion>, SearchError>,
}

/// Remote lookup of suggestions for a free-text query.
///
/// Implementations return the full result list; truncation to the display
/// limit happens in the widget.
pub trait SearchClient: Send + Sync {
    fn search(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<Suggestion>, SearchError>> + Send;
}
