//! Error types for the session core.

use std::fmt;
use std::path::PathBuf;

/// Failure reported by a chat backend.
///
/// `detail` carries whatever diagnostic context the backend could gather
/// (HTTP status and body, or the source chain of a transport error) and is
/// written as the `trace` field of failed request/response log entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    pub message: String,
    pub detail: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Build an error from a transport failure, keeping its source chain as detail.
    pub fn from_source(context: &str, err: &(dyn std::error::Error + 'static)) -> Self {
        let mut chain = vec![err.to_string()];
        let mut source = err.source();
        while let Some(inner) = source {
            chain.push(inner.to_string());
            source = inner.source();
        }
        Self::new(format!("{context}: {err}")).with_detail(chain.join("\ncaused by: "))
    }

    pub fn trace(&self) -> &str {
        self.detail.as_deref().unwrap_or(&self.message)
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// An audit log record could not be persisted.
#[derive(Debug)]
pub struct LogWriteError {
    pub path: PathBuf,
    pub reason: String,
}

impl LogWriteError {
    pub fn new(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        Self {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for LogWriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Failed to write log {}: {}",
            self.path.display(),
            self.reason
        )
    }
}

impl std::error::Error for LogWriteError {}

/// Errors surfaced by session operations.
#[derive(Debug)]
pub enum SessionError {
    /// The provider/model pair is not in the catalog.
    UnknownModel { provider: String, model: String },
    /// A history size was zero, negative, or not a number.
    InvalidHistorySize(String),
    /// A command received the wrong number of arguments.
    BadArity { usage: String },
    /// The model call itself failed.
    BackendFailure(BackendError),
    /// A transcript or request/response record could not be persisted.
    LogWriteFailure(LogWriteError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::UnknownModel { provider, model } => {
                write!(f, "Model '{provider}/{model}' is not available")
            }
            SessionError::InvalidHistorySize(input) => {
                write!(f, "Invalid history size '{input}': expected a number of 1 or greater")
            }
            SessionError::BadArity { usage } => write!(f, "Usage: {usage}"),
            SessionError::BackendFailure(err) => write!(f, "Model call failed: {err}"),
            SessionError::LogWriteFailure(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SessionError::BackendFailure(err) => Some(err),
            SessionError::LogWriteFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<BackendError> for SessionError {
    fn from(err: BackendError) -> Self {
        SessionError::BackendFailure(err)
    }
}

impl From<LogWriteError> for SessionError {
    fn from(err: LogWriteError) -> Self {
        SessionError::LogWriteFailure(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_model_names_the_pair() {
        let err = SessionError::UnknownModel {
            provider: "acme".to_string(),
            model: "rocket".to_string(),
        };
        assert_eq!(err.to_string(), "Model 'acme/rocket' is not available");
    }

    #[test]
    fn backend_error_trace_falls_back_to_message() {
        let plain = BackendError::new("quota exceeded");
        assert_eq!(plain.trace(), "quota exceeded");

        let detailed = BackendError::new("quota exceeded").with_detail("HTTP 429");
        assert_eq!(detailed.trace(), "HTTP 429");
    }

    #[test]
    fn from_source_collects_the_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset by peer");
        let err = BackendError::from_source("request failed", &io);
        assert_eq!(err.message, "request failed: reset by peer");
        assert_eq!(err.trace(), "reset by peer");
    }
}
