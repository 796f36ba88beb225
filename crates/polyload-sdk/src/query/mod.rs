//! Query and result values exchanged with plugins.
//!
//! Both types are serialisable because process-backed plugins receive the
//! query as JSON and answer with JSON results.

use serde::{Deserialize, Serialize};

/// A user query dispatched to a plugin.
///
/// # Example
///
/// ```
/// use polyload_sdk::Query;
///
/// let query = Query::new("calc 1 + 2").with_action_keyword("calc");
/// assert_eq!(query.search(), "1 + 2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    action_keyword: Option<String>,
}

impl Query {
    /// Creates a query from the raw text typed by the user.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action_keyword: None,
        }
    }

    /// Records the action keyword that routed this query to the plugin.
    #[must_use]
    pub fn with_action_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.action_keyword = Some(keyword.into());
        self
    }

    /// Returns the raw query text.
    #[must_use]
    pub const fn text(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the action keyword, if any.
    #[must_use]
    pub fn action_keyword(&self) -> Option<&str> {
        self.action_keyword.as_deref()
    }

    /// Returns the query text with the leading action keyword removed.
    #[must_use]
    pub fn search(&self) -> &str {
        let text = self.text.trim_start();
        match self.action_keyword.as_deref() {
            Some(keyword) if !keyword.is_empty() => text
                .strip_prefix(keyword)
                .map_or(text, str::trim_start),
            _ => text,
        }
    }
}

/// A single answer produced by a plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subtitle: Option<String>,
    #[serde(default)]
    score: i32,
}

impl QueryResult {
    /// Creates a result with the given title and a neutral score.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            score: 0,
        }
    }

    /// Attaches a subtitle.
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    /// Overrides the ranking score.
    #[must_use]
    pub const fn with_score(mut self, score: i32) -> Self {
        self.score = score;
        self
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Returns the subtitle.
    #[must_use]
    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    /// Returns the ranking score.
    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }
}
