use flow83_types::ErrorCode;
use thiserror::Error;

/// SDK-specific errors.
#[derive(Debug, Error)]
pub enum Flow83Error {
    /// Backend answered with a non-2xx status other than 401
    #[error("HTTP {status} {status_text}")]
    Http { status: u16, status_text: String },

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Network error (only with `client` feature)
    #[cfg(feature = "client")]
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Flow83Error {
    /// Error code for the failure, when it came from an HTTP status.
    pub fn code(&self) -> ErrorCode {
        match self {
            Flow83Error::Http { status, .. } => ErrorCode::from_status(*status),
            _ => ErrorCode::InternalError,
        }
    }
}

impl From<url::ParseError> for Flow83Error {
    fn from(err: url::ParseError) -> Self {
        Flow83Error::Config(format!("invalid URL: {}", err))
    }
}
