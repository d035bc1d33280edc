//! Error types and Result alias for the rental client

use crate::types::Usd;
use thiserror::Error;

/// Main error type for the rental client
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Local form validation failed; the backend was not contacted
    #[error("{0}")]
    Validation(String),

    #[error("Authentication required. Please sign in again.")]
    NotAuthenticated,

    #[error("Your session has expired. Please sign in again.")]
    TokenExpired,

    #[error("{0}")]
    AccessDenied(String),

    /// Business-rule rejection reported by the backend, text kept verbatim
    #[error("{0}")]
    Rejected(String),

    #[error("{message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out. The server took too long to respond. Please try again.")]
    Timeout,

    #[error("Invalid response: {0}")]
    InvalidData(String),

    #[error("Insufficient balance. You have {available} but need {required}")]
    InsufficientFunds { required: Usd, available: Usd },

    #[error("{0}")]
    RentalNotFound(String),

    #[error("A return for this rental is already being submitted")]
    SubmissionInFlight,

    #[error("This rental has already been returned")]
    AlreadyReturned,

    #[error("Session storage error: {0}")]
    SessionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Coarse failure category, used to choose a recovery path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    AuthExpired,
    AccessDenied,
    Rejected,
    NotFound,
    Network,
    Timeout,
    Malformed,
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::InsufficientFunds { .. } => ErrorKind::Validation,
            Error::NotAuthenticated | Error::TokenExpired => ErrorKind::AuthExpired,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::Rejected(_) | Error::ApiError { .. } | Error::AlreadyReturned => {
                ErrorKind::Rejected
            }
            Error::RentalNotFound(_) => ErrorKind::NotFound,
            Error::NetworkError(_) => ErrorKind::Network,
            Error::Timeout => ErrorKind::Timeout,
            Error::InvalidData(_) => ErrorKind::Malformed,
            Error::SubmissionInFlight | Error::SessionError(_) | Error::ConfigError(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// The only way out of this error is a fresh sign-in
    pub fn requires_sign_in(&self) -> bool {
        self.kind() == ErrorKind::AuthExpired
    }
}

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else if err.is_decode() {
            Error::InvalidData(err.to_string())
        } else {
            Error::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidData(err.to_string())
    }
}
