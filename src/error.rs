// src/error.rs

//! Unified error handling for the comment pipeline.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Coarse classification of a non-2xx response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// 4xx
    NotFound,
    /// 5xx
    Server,
    /// Anything else outside 2xx
    Other,
}

impl StatusKind {
    pub fn from_code(code: u16) -> Self {
        match code {
            400..=499 => StatusKind::NotFound,
            500..=599 => StatusKind::Server,
            _ => StatusKind::Other,
        }
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Transport or connectivity failure
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Server answered with a non-2xx status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Payload did not match the expected JSON shape
    #[error("Decode error for {context}: {message}")]
    Decode { context: String, message: String },

    /// Official API answered `null` for this item
    #[error("Item {0} does not exist")]
    MissingItem(u64),

    /// No profile under this name
    #[error("User '{0}' does not exist")]
    MissingUser(String),

    /// Unexpected cycle or duplicate while assembling a comment tree
    #[error("Data integrity error: {0}")]
    DataIntegrity(String),

    /// The fetch was superseded by a newer request
    #[error("Fetch cancelled")]
    Cancelled,

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create a network error for a request URL.
    pub fn network(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Network {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error with context.
    pub fn decode(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a data integrity error.
    pub fn integrity(message: impl Into<String>) -> Self {
        Self::DataIntegrity(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Classification of an HTTP status failure, if this is one.
    pub fn status_kind(&self) -> Option<StatusKind> {
        match self {
            Self::HttpStatus { status, .. } => Some(StatusKind::from_code(*status)),
            _ => None,
        }
    }

    /// Whether a caller could reasonably retry the same request.
    ///
    /// Nothing in this crate retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::HttpStatus { .. } => self.status_kind() == Some(StatusKind::Server),
            _ => false,
        }
    }

    /// Short human-readable reason, suitable for a failure banner.
    pub fn reason(&self) -> String {
        match self {
            Self::Network { .. } => "Network error".to_string(),
            Self::HttpStatus { status, .. } => match StatusKind::from_code(*status) {
                StatusKind::NotFound => "File not found.".to_string(),
                StatusKind::Server => "Bad server response".to_string(),
                StatusKind::Other => "Something went wrong".to_string(),
            },
            Self::MissingItem(_) | Self::MissingUser(_) => "File not found.".to_string(),
            Self::Decode { .. } => "Unexpected response format".to_string(),
            other => other.to_string(),
        }
    }
}
