//! Error types for Dashboard API operations.
//!
//! Errors are categorized so the CLI can give the operator useful feedback.
//! Categories never drive retries: a failed call is final for the run.

use std::fmt;

/// Result type alias for Dashboard operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of Dashboard errors for operator feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport failure (DNS, TLS, connection reset, timeout).
    Network,
    /// The API key was rejected or lacks access (401/403).
    Auth,
    /// Organization or network does not exist (404).
    NotFound,
    /// Too many requests (429).
    RateLimited,
    /// The API rejected the payload (400/422), usually a bad rule.
    Validation,
    /// Response body could not be decoded.
    Format,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Authentication failed",
            Self::NotFound => "Resource not found",
            Self::RateLimited => "Rate limited by the Dashboard API",
            Self::Validation => "Request rejected by the Dashboard API",
            Self::Format => "Unexpected response format",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and the API base URL",
            Self::Auth => "Verify the API key and that it has write access to the organization",
            Self::NotFound => "Verify the organization and network still exist",
            Self::RateLimited => "Wait a moment and re-run for the failed networks",
            Self::Validation => "Check the rule file against the Dashboard firewall rule schema",
            Self::Format => "The API may have changed; check the response with -vv",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the Dashboard API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Invalid response from the API.
    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// HTTP status code, if the error came from a response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => *status,
            _ => None,
        }
    }

    /// Get the error category for operator feedback.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { status: None, .. } => ErrorCategory::Network,
            Self::Http {
                status: Some(code), ..
            } => match code {
                401 | 403 => ErrorCategory::Auth,
                404 => ErrorCategory::NotFound,
                429 => ErrorCategory::RateLimited,
                400 | 422 => ErrorCategory::Validation,
                _ => ErrorCategory::Other,
            },
            Self::InvalidResponse(_) => ErrorCategory::Format,
        }
    }

    /// Build an error from a non-success response.
    ///
    /// The Dashboard explains rejections in the body, usually as
    /// `{"errors": ["..."]}`; those messages are kept. Other bodies are kept
    /// as text, cut to a readable length.
    pub fn from_response(status: u16, body: &str) -> Self {
        Self::Http {
            message: response_message(status, body),
            status: Some(status),
        }
    }
}

/// Longest raw body kept in an error message.
const MAX_BODY_CHARS: usize = 300;

fn response_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", status);
    }

    let errors: Option<Vec<String>> = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|doc| doc.get("errors").and_then(|e| e.as_array()).cloned())
        .map(|errors| {
            errors
                .iter()
                .map(|e| match e.as_str() {
                    Some(text) => text.to_string(),
                    None => e.to_string(),
                })
                .collect()
        });

    match errors {
        Some(errors) if !errors.is_empty() => format!("HTTP {}: {}", status, errors.join("; ")),
        _ if body.chars().count() > MAX_BODY_CHARS => {
            let cut: String = body.chars().take(MAX_BODY_CHARS).collect();
            format!("HTTP {}: {}...", status, cut)
        }
        _ => format!("HTTP {}: {}", status, body),
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            ureq::Error::Json(err) => Self::InvalidResponse(err.to_string()),
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}
