use flow83_sdk::Flow83Error;
use flow83_types::ErrorCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Identity provider error: {0}")]
    Identity(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Backend error: {status} {status_text}")]
    Backend { status: u16, status_text: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AppError::Backend { status, .. } => ErrorCode::from_status(*status),
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::Identity(_)
            | AppError::Network(_)
            | AppError::Storage(_)
            | AppError::Internal(_) => ErrorCode::InternalError,
        }
    }
}

impl From<Flow83Error> for AppError {
    fn from(err: Flow83Error) -> Self {
        match err {
            Flow83Error::Http {
                status,
                status_text,
            } => AppError::Backend {
                status,
                status_text,
            },
            Flow83Error::Network(e) => AppError::Network(e.to_string()),
            Flow83Error::Decode(msg) => AppError::Internal(msg),
            Flow83Error::Config(msg) => AppError::InvalidInput(msg),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;
