use crate::{
    dto::FormError,
    storage::StorageError,
};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::{io, net::AddrParseError, path::PathBuf};
use thiserror::Error;

#[derive(Debug)]
pub enum ApiError {
    /// Another requester holds the session; carries the seconds left.
    AccessConflict(u64),
    ValidationError(String),
    InternalError {
        message: &'static str,
        cause: String,
    },
}

/// Condition behind a failed response, picked up by the request logger.
#[derive(Debug, Clone)]
pub struct FailureCause(pub String);

/// Convert our custom errors to HTTP responses
///
/// Bodies are plain text: the editor page shows them as-is, and reads the
/// countdown straight out of a 409.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body, cause) = match self {
            ApiError::AccessConflict(remaining) => (
                StatusCode::CONFLICT,
                remaining.to_string(),
                format!("conflicting session, {remaining}s remaining"),
            ),
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.clone(), msg),
            ApiError::InternalError { message, cause } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                message.to_string(),
                cause,
            ),
        };

        let mut response = (status, body).into_response();
        response.extensions_mut().insert(FailureCause(cause));
        response
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError::ValidationError(format!("Error: {err}"))
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        let message = match err {
            StorageError::Read { .. } => "Error: couldn't read the programs file",
            StorageError::Write { .. } | StorageError::Interrupted(_) => {
                "Error: couldn't write the programs file"
            }
        };
        ApiError::InternalError {
            message,
            cause: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InternalError {
            message: "Error: couldn't convert the programs to JSON",
            cause: err.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid LISTEN_ADDR '{value}': {source}")]
    ListenAddr {
        value: String,
        source: AddrParseError,
    },
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("couldn't find the programs file at {0}")]
    MissingDocument(PathBuf),
    #[error("couldn't bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("server error: {0}")]
    Serve(io::Error),
}
