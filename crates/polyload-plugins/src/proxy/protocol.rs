//! JSONL messages exchanged with process-backed plugins.
//!
//! The host writes one [`ProxyRequest`] line to the plugin's stdin and closes
//! it. The plugin writes one [`ProxyResponse`] line to stdout and exits.
//! Stderr is captured for diagnostic logging but is not part of the protocol.

use polyload_sdk::{Query, QueryResult};
use serde::{Deserialize, Serialize};

/// Method name for query requests.
pub const QUERY_METHOD: &str = "query";

/// Request written to the plugin's stdin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyRequest {
    method: String,
    query: Query,
}

impl ProxyRequest {
    /// Builds a query request.
    #[must_use]
    pub fn query(query: Query) -> Self {
        Self {
            method: QUERY_METHOD.to_owned(),
            query,
        }
    }

    /// Returns the method name.
    #[must_use]
    pub const fn method(&self) -> &str {
        self.method.as_str()
    }

    /// Returns the query payload.
    #[must_use]
    pub const fn payload(&self) -> &Query {
        &self.query
    }
}

/// Response read from the plugin's stdout.
///
/// A response carrying `error` is a rejection; otherwise `results` holds the
/// answers, possibly none.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(default)]
    results: Vec<QueryResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProxyResponse {
    /// Creates a successful response.
    #[must_use]
    pub const fn success(results: Vec<QueryResult>) -> Self {
        Self {
            results,
            error: None,
        }
    }

    /// Creates a rejection.
    #[must_use]
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            results: Vec::new(),
            error: Some(message.into()),
        }
    }

    /// Returns the error message, if the plugin rejected the query.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the results.
    #[must_use]
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    /// Consumes the response, yielding the results or the rejection message.
    ///
    /// # Errors
    ///
    /// Returns the plugin's message when it rejected the query.
    pub fn into_result(self) -> Result<Vec<QueryResult>, String> {
        match self.error {
            Some(message) => Err(message),
            None => Ok(self.results),
        }
    }
}
