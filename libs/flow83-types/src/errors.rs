use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes surfaced by the Flow 83 client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    Unauthenticated,
    InvalidCredentials,
    Forbidden,
    InvalidInput,
    NotFound,
    RateLimited,
    InternalError,
}

impl ErrorCode {
    /// Maps an HTTP status from the backend to an error code.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => Self::Unauthenticated,
            403 => Self::Forbidden,
            400 | 422 => Self::InvalidInput,
            404 => Self::NotFound,
            429 => Self::RateLimited,
            _ => Self::InternalError,
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::NotFound => "NOT_FOUND",
            Self::RateLimited => "RATE_LIMITED",
            Self::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Identity token parsing errors.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Invalid token format: {0}")]
    InvalidFormat(String),

    #[error("JWT library error: {0}")]
    Library(#[from] jsonwebtoken::errors::Error),
}
