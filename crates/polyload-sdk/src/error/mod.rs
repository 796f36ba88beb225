//! Errors crossing the capability interface.

use thiserror::Error;

/// Failure reported by a plugin while answering a query.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The plugin understood the query but declined to answer it.
    #[error("query rejected: {message}")]
    Rejected {
        /// Reason supplied by the plugin.
        message: String,
    },

    /// The plugin could not be reached or failed while answering.
    #[error("plugin unavailable: {source}")]
    Unavailable {
        /// Underlying host-side failure.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The plugin panicked while answering.
    #[error("plugin panicked: {message}")]
    Panicked {
        /// Panic payload rendered as text.
        message: String,
    },
}

impl QueryError {
    /// Builds a [`QueryError::Rejected`] from any message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    /// Wraps a host-side failure as [`QueryError::Unavailable`].
    #[must_use]
    pub fn unavailable(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Unavailable {
            source: Box::new(source),
        }
    }
}
