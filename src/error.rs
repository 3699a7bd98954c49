use std::fmt;

use http::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Could not encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid product list: {0}")]
    InvalidProductList(#[source] serde_json::Error),

    #[error("Unknown form field: {0}")]
    UnknownField(String),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

/// Coarse classification of a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NotFound,
    Client,
    Server,
    Transport,
    Decode,
}

impl FailureKind {
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            FailureKind::NotFound
        } else if status.is_server_error() {
            FailureKind::Server
        } else {
            FailureKind::Client
        }
    }
}

/// What the page shows when a request does not succeed. Every endpoint,
/// delete included, reports through this one shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub kind: FailureKind,
    pub status: Option<u16>,
    pub message: String,
}

impl Failure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
        }
    }

    /// Builds a failure from an error status. The server's own message wins;
    /// without one the canonical reason phrase stands in.
    pub fn from_status(status: StatusCode, message: Option<String>) -> Self {
        let message = message
            .filter(|m| !m.is_empty())
            .or_else(|| status.canonical_reason().map(str::to_string))
            .unwrap_or_else(|| status.as_str().to_string());

        Self {
            kind: FailureKind::from_status(status),
            status: Some(status.as_u16()),
            message,
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{:?} ({}): {}", self.kind, status, self.message),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl From<Error> for Failure {
    fn from(err: Error) -> Self {
        match err {
            Error::Json(e) => Failure::new(FailureKind::Decode, e.to_string()),
            // Request-side problems: nothing came back to decode.
            other => Failure::new(FailureKind::Transport, other.to_string()),
        }
    }
}

impl From<reqwest::Error> for Failure {
    fn from(err: reqwest::Error) -> Self {
        Failure::from(Error::from(err))
    }
}
