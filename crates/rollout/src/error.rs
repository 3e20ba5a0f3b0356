//! Error types for rollout operations.
//!
//! Everything here is fatal to a run when it escapes the orchestrator.
//! Per-target backup and apply failures are folded into
//! [`OperationOutcome`](crate::types::OperationOutcome) instead and never
//! reach the caller as an `Err`.

use std::io;
use std::path::PathBuf;

/// Result type alias for rollout operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a rollout run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The rule file does not exist.
    #[error("rule file not found: {}", path.display())]
    RulesNotFound {
        /// Path that was requested.
        path: PathBuf,
    },

    /// The rule file exists but could not be read.
    #[error("could not read rule file {}: {source}", path.display())]
    RulesRead {
        /// Path of the rule file.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// The rule file is not valid JSON or not a list of rules.
    #[error("invalid rule file {}: {message}", path.display())]
    RulesParse {
        /// Path of the rule file.
        path: PathBuf,
        /// What was wrong with it.
        message: String,
    },

    /// Direction was neither inbound nor outbound.
    #[error(transparent)]
    InvalidDirection(#[from] dashboard::ParseDirectionError),

    /// The credential sees no organizations.
    #[error("no organizations are visible to this API key")]
    NoOrganizations,

    /// Organization pick was not a listed number.
    #[error("invalid organization choice '{answer}': expected a number from 1 to {count}")]
    InvalidOrganizationChoice {
        /// What the operator answered.
        answer: String,
        /// How many organizations were offered.
        count: usize,
    },

    /// Listing or other remote call failed before target processing.
    #[error("Dashboard API error: {0}")]
    Remote(#[from] dashboard::Error),

    /// Reading an operator decision failed.
    #[error("failed to read operator input: {0}")]
    Input(#[source] io::Error),

    /// Filesystem error on a run artifact (backup or audit log).
    #[error("IO error at {}: {source}", path.display())]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether this error comes from bad operator input (rule file,
    /// direction, organization choice) rather than the environment.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::RulesNotFound { .. }
                | Self::RulesRead { .. }
                | Self::RulesParse { .. }
                | Self::InvalidDirection(_)
                | Self::NoOrganizations
                | Self::InvalidOrganizationChoice { .. }
        )
    }

    /// Remote error category, if this error came from the Dashboard API.
    #[must_use]
    pub fn remote_category(&self) -> Option<dashboard::ErrorCategory> {
        match self {
            Self::Remote(err) => Some(err.category()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors() {
        assert!(Error::NoOrganizations.is_input_error());
        assert!(
            Error::InvalidOrganizationChoice {
                answer: "x".into(),
                count: 2
            }
            .is_input_error()
        );
        assert!(!Error::Remote(dashboard::Error::http("HTTP 500", Some(500))).is_input_error());
    }

    #[test]
    fn test_unreadable_rule_file_is_input_error() {
        let err = Error::RulesRead {
            path: PathBuf::from("/tmp/rules.json"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_input_error());
        assert!(!Error::io("/tmp/log.txt", io::Error::other("disk full")).is_input_error());
        assert!(!Error::Input(io::Error::other("closed")).is_input_error());
    }

    #[test]
    fn test_remote_category() {
        let err = Error::Remote(dashboard::Error::http("HTTP 401", Some(401)));
        assert_eq!(err.remote_category(), Some(dashboard::ErrorCategory::Auth));
        assert_eq!(Error::NoOrganizations.remote_category(), None);
    }

    #[test]
    fn test_display_includes_path() {
        let err = Error::RulesNotFound {
            path: PathBuf::from("/tmp/rules.json"),
        };
        assert!(err.to_string().contains("/tmp/rules.json"));
    }

    #[test]
    fn test_invalid_direction_is_transparent() {
        let parse_err = "sideways".parse::<dashboard::Direction>().unwrap_err();
        let err: Error = parse_err.into();
        assert!(err.to_string().contains("sideways"));
        assert!(err.is_input_error());
    }
}
