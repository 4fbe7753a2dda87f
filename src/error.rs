//! Error types for SDK operations.
//!
//! Every failure surfaced by the SDK is an [`SdkError`]. Failures reported by the
//! [`Connection`](crate::connection::Connection) collaborator are classified from their
//! text at the manager boundary and keep the original error as their `source()`.

use crate::resources::ResourceKind;
use thiserror::Error;

/// Convenience alias used by every public API of the crate.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Base error for the SDK.
#[derive(Debug, Error)]
pub enum SdkError {
    /// A DESCRIBE returned no rows for the requested name.
    #[error("{kind} '{name}' not found")]
    ResourceNotFound { kind: ResourceKind, name: String },

    /// The platform rejected a create because the name is taken.
    #[error("Resource already exists: {source}")]
    ResourceAlreadyExists {
        statement: String,
        source: anyhow::Error,
    },

    /// A parameter object or client configuration failed validation.
    ///
    /// Raised locally, before any statement is sent.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The collaborator could not reach the platform.
    #[error("Connection error: {source}")]
    Connection {
        statement: String,
        source: anyhow::Error,
    },

    /// The platform rejected the statement.
    #[error("Failed to execute SQL: {source}")]
    Sql {
        statement: String,
        source: anyhow::Error,
    },

    #[error("Permission denied: {source}")]
    PermissionDenied {
        statement: String,
        source: anyhow::Error,
    },

    /// The resource is referenced by another resource and cannot be changed.
    #[error("Resource in use: {source}")]
    ResourceInUse {
        statement: String,
        source: anyhow::Error,
    },
}

impl SdkError {
    pub(crate) fn not_found(kind: ResourceKind, name: &str) -> Self {
        Self::ResourceNotFound {
            kind,
            name: name.to_string(),
        }
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration(message.into())
    }

    /// Classify a collaborator failure for `statement`.
    ///
    /// The error chain is lowercased and split into words; each category matches
    /// whole words or phrases, so `connector.class` is not a connection problem and
    /// `4091` is not an HTTP status.
    pub fn from_remote(statement: &str, source: anyhow::Error) -> Self {
        let words = word_text(&format!("{:#}", source));
        let statement = statement.to_string();

        if has_phrase(&words, ALREADY_EXISTS) {
            return Self::ResourceAlreadyExists { statement, source };
        }
        if has_phrase(&words, PERMISSION_DENIED) {
            return Self::PermissionDenied { statement, source };
        }
        if has_phrase(&words, IN_USE) {
            return Self::ResourceInUse { statement, source };
        }
        if has_phrase(&words, CONNECTION) {
            return Self::Connection { statement, source };
        }

        Self::Sql { statement, source }
    }

    /// The statement that triggered the failure, when one was sent.
    pub fn statement(&self) -> Option<&str> {
        match self {
            Self::ResourceAlreadyExists { statement, .. }
            | Self::Connection { statement, .. }
            | Self::Sql { statement, .. }
            | Self::PermissionDenied { statement, .. }
            | Self::ResourceInUse { statement, .. } => Some(statement),
            Self::ResourceNotFound { .. } | Self::InvalidConfiguration(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }
}

const ALREADY_EXISTS: &[&str] = &["already exists", "409"];

const PERMISSION_DENIED: &[&str] = &[
    "permission denied",
    "access denied",
    "not authorized",
    "unauthorized",
    "forbidden",
    "401",
    "403",
];

const IN_USE: &[&str] = &[
    "is in use",
    "are in use",
    "still in use",
    "in use by",
    "being used by",
    "depends on",
];

const CONNECTION: &[&str] = &[
    "could not connect",
    "failed to connect",
    "unable to connect",
    "connection refused",
    "connection reset",
    "connection closed",
    "connection lost",
    "broken pipe",
    "timed out",
    "deadline exceeded",
    "network is unreachable",
    "network error",
    "service unavailable",
    "502",
    "503",
    "504",
];

/// Lowercased words of `text`, space-separated with a space at each end
fn word_text(text: &str) -> String {
    let mut out = String::from(" ");
    for word in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        out.push_str(&word.to_lowercase());
        out.push(' ');
    }
    out
}

/// Whether `words` (from [`word_text`]) contains any phrase as whole words
fn has_phrase(words: &str, phrases: &[&str]) -> bool {
    phrases
        .iter()
        .any(|phrase| words.contains(&format!(" {} ", phrase)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    fn classify(message: &str) -> SdkError {
        SdkError::from_remote("CREATE STREAM \"s\";", anyhow::anyhow!(message.to_string()))
    }

    #[test]
    fn test_not_found_message_names_resource() {
        let err = SdkError::not_found(ResourceKind::Stream, "test_stream");
        assert_eq!(err.to_string(), "Stream 'test_stream' not found");
        assert!(err.is_not_found());
        assert!(err.statement().is_none());
    }

    #[test]
    fn test_classification_by_message() {
        assert!(matches!(
            classify("relation \"s\" already exists"),
            SdkError::ResourceAlreadyExists { .. }
        ));
        assert!(matches!(
            classify("Permission denied for role"),
            SdkError::PermissionDenied { .. }
        ));
        assert!(matches!(
            classify("store is in use by streams: [orders]"),
            SdkError::ResourceInUse { .. }
        ));
        assert!(matches!(
            classify("connection reset by peer"),
            SdkError::Connection { .. }
        ));
        assert!(matches!(
            classify("syntax error at or near WITH"),
            SdkError::Sql { .. }
        ));
        assert!(matches!(
            classify("HTTP 503: upstream gone"),
            SdkError::Connection { .. }
        ));
    }

    /// Words that merely contain a keyword are ordinary statement errors
    #[test]
    fn test_classification_needs_whole_words() {
        for message in [
            "column \"region\" not found in users_by_region",
            "invalid value for parameter connector.class",
            "unknown column connection_id",
            "offset 4091 is out of range",
            "invalid value for parameter session.timeout.ms",
            "partition 5030 does not exist",
        ] {
            assert!(
                matches!(classify(message), SdkError::Sql { .. }),
                "{} should be a SQL error",
                message
            );
        }
    }

    #[test]
    fn test_source_and_statement_are_preserved() {
        let err = classify("syntax error");
        assert_eq!(err.statement(), Some("CREATE STREAM \"s\";"));
        let source = err.source().expect("source should be kept");
        assert_eq!(source.to_string(), "syntax error");
        assert!(!err.to_string().contains("CREATE STREAM"));
    }

    #[test]
    fn test_invalid_configuration_display() {
        let err = SdkError::invalid("bootstrap.servers is required for Kafka stores");
        assert!(err.to_string().contains("required"));
        assert!(err.statement().is_none());
    }
}
