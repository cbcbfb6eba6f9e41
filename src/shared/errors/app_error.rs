use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "message")]
pub enum AppError {
    #[error("Transport error: {0}")]
    TransportError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Index build error: {0}")]
    IndexBuildError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl AppError {
    /// Whether a retry policy may try the failed operation again.
    ///
    /// Transport and parse failures are usually transient for a remote
    /// resource (partial bodies, a CDN serving an error page). Everything
    /// else is a programming or configuration problem that a retry will not fix.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::TransportError(_) | AppError::ParseError(_) => true,
            AppError::ValidationError(_)
            | AppError::IndexBuildError(_)
            | AppError::ConfigError(_)
            | AppError::InternalError(_) => false,
        }
    }

    /// Short machine-readable name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::TransportError(_) => "TransportError",
            AppError::ParseError(_) => "ParseError",
            AppError::ValidationError(_) => "ValidationError",
            AppError::IndexBuildError(_) => "IndexBuildError",
            AppError::ConfigError(_) => "ConfigError",
            AppError::InternalError(_) => "InternalError",
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::TransportError("Request timeout".to_string())
        } else if err.is_connect() {
            AppError::TransportError("Failed to connect to catalog host".to_string())
        } else if let Some(status) = err.status() {
            AppError::TransportError(format!("HTTP {}: {}", status, err))
        } else if err.is_decode() || err.is_body() {
            AppError::TransportError(format!("Failed to read response body: {}", err))
        } else {
            AppError::TransportError(err.to_string())
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        match err.position() {
            Some(pos) => AppError::ParseError(format!("line {}: {}", pos.line(), err)),
            None => AppError::ParseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::TransportError(format!("I/O error: {}", err))
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        if err.is_panic() {
            AppError::InternalError("Background task panicked".to_string())
        } else {
            AppError::InternalError(format!("Background task cancelled: {}", err))
        }
    }
}

// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
