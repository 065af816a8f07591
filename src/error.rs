use reqwest::StatusCode;
use thiserror::Error;

/// Malformed markup. Logged, never shown to the visitor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WidgetError {
    #[error("Missing attribute: data-{0}")]
    MissingAttribute(String),

    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Unknown vote type: {0}")]
    UnknownVoteType(String),
}

/// Why a request did not produce a usable payload.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("HTTP error {status}")]
    Rejected {
        status: StatusCode,
        error: Option<String>,
    },

    #[error("Unexpected response (HTTP {status}): {reason}")]
    Malformed { status: StatusCode, reason: String },

    #[error("{0}")]
    Network(String),

    #[error("Failed to encode request body: {0}")]
    Encode(String),
}

impl RequestFailure {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestFailure::Rejected { status, .. } | RequestFailure::Malformed { status, .. } => {
                Some(*status)
            }
            RequestFailure::Network(_) | RequestFailure::Encode(_) => None,
        }
    }
}

impl From<reqwest::Error> for RequestFailure {
    fn from(error: reqwest::Error) -> Self {
        RequestFailure::Network(error.to_string())
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Widget error: {0}")]
    Widget(#[from] WidgetError),

    #[error("Request failed: {0}")]
    Request(#[from] RequestFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("DOM error: {0}")]
    Dom(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
