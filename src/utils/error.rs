use actix_web::{error::JsonPayloadError, http::StatusCode, HttpResponse, ResponseError};
use mongodb::error::{ErrorKind, WriteFailure};
use serde::{Deserialize, Serialize};
use std::fmt;

const DUPLICATE_KEY: i32 = 11000;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Uniform error payload returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

/// Builds the JSON error response shared by `AppError` and the error middleware
pub fn error_response(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status).json(ErrorBody {
        message: message.into(),
    })
}

/// Message safe to send to the client; server-side details stay in the logs
pub fn public_message(status: StatusCode, detail: impl Into<String>) -> String {
    if status.is_server_error() {
        INTERNAL_ERROR_MESSAGE.to_string()
    } else {
        detail.into()
    }
}

#[derive(Debug)]
pub enum AppError {
    DatabaseError(String),
    NotFound(String),
    InvalidRequest(String),
    Conflict(String),
    /// Failure raised by the HTTP layer that already knows its status
    Http(StatusCode, String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Http(_, msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Http(status, _) => *status,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("❌ {}", self);
        }
        error_response(status, public_message(status, self.to_string()))
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        let duplicate = match err.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
            ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
            _ => false,
        };

        if duplicate {
            AppError::Conflict("a user with the same unique field already exists".to_string())
        } else {
            AppError::DatabaseError(err.to_string())
        }
    }
}

impl From<JsonPayloadError> for AppError {
    fn from(err: JsonPayloadError) -> Self {
        match err.status_code() {
            StatusCode::BAD_REQUEST => AppError::InvalidRequest(err.to_string()),
            status => AppError::Http(status, err.to_string()),
        }
    }
}
