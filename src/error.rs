//! Error types for the password search engine.
//!
//! [`SearchError`] covers everything that can be rejected before a search
//! starts. Problems discovered while workers are running are not errors;
//! they surface as [`crate::SearchResult::Failed`] carrying a
//! [`FailureReason`].

use std::io;

use crate::config::ConfigError;

/// Preconditions that prevent a search from starting.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Charset contains duplicates, or is empty while candidates need characters.
    #[error("invalid charset: {reason}")]
    InvalidCharset { reason: String },

    /// Incremental mode with a minimum length above the maximum.
    #[error("minimum length ({min}) must be less than or equal to maximum length ({max})")]
    InvalidLengthRange { min: usize, max: usize },

    /// The keyspace would exceed the configured cap.
    #[error("keyspace exceeds the configured limit of {limit} candidates")]
    KeyspaceTooLarge { limit: u64 },

    /// The locked document has no bytes.
    #[error("document is empty")]
    EmptyDocument,

    /// The document opened fine but is not password protected.
    #[error("document is not encrypted")]
    NotEncrypted,

    /// The oracle could not open the document at all.
    #[error("failed to open document: {0}")]
    Document(String),

    /// Concurrency must be at least one.
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Dictionary file could not be opened or counted.
    #[error("failed to read wordlist: {0}")]
    Wordlist(#[source] io::Error),

    #[error("failed to initialize thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Why a running search ended in [`crate::SearchResult::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FailureReason {
    /// The oracle reported that no password can ever unlock the document.
    #[error("malformed document: {0}")]
    MalformedDocument(String),

    /// A worker could not read its slice of the dictionary file.
    #[error("wordlist read failed: {0}")]
    WordlistRead(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = SearchError::InvalidLengthRange { min: 5, max: 2 };
        assert_eq!(
            err.to_string(),
            "minimum length (5) must be less than or equal to maximum length (2)"
        );

        let err = SearchError::KeyspaceTooLarge { limit: 100 };
        assert_eq!(
            err.to_string(),
            "keyspace exceeds the configured limit of 100 candidates"
        );

        let reason = FailureReason::MalformedDocument("bad xref".into());
        assert_eq!(reason.to_string(), "malformed document: bad xref");
    }

    #[test]
    fn test_config_error_is_transparent() {
        let err = SearchError::from(ConfigError::ZeroBudgetCheckInterval);
        assert_eq!(err.to_string(), ConfigError::ZeroBudgetCheckInterval.to_string());
    }
}
