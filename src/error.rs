//! Error taxonomy shared by every handler.
//!
//! Handlers return `Result<_, AppError>`; actix converts the error into a JSON
//! body of the form `{"message": "..."}` with the matching status code.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::DbErr;
use serde::Serialize;

#[derive(Debug)]
pub enum AppError {
    /// No credential was supplied.
    Unauthenticated,
    /// A credential was supplied but rejected, or an identity/role check failed.
    Forbidden(String),
    /// A referenced entity does not exist.
    NotFound(String),
    /// The request would create a duplicate or violate a state transition.
    Conflict(String),
    /// The request body or parameters are invalid.
    BadRequest(String),
    /// Unexpected datastore or upstream failure.
    Internal(String),
    /// The request ran past the configured deadline.
    Timeout,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    message: &'a str,
}

impl AppError {
    pub fn forbidden() -> Self {
        AppError::Forbidden("Forbidden access".to_owned())
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthenticated => "Unauthorized access",
            AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => msg,
            // Internal details stay in the log.
            AppError::Internal(_) => "Internal server error",
            AppError::Timeout => "Request timed out",
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Unauthenticated => write!(f, "Unauthenticated"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Timeout => write!(f, "Timeout"),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.message(),
        })
    }
}

impl From<DbErr> for AppError {
    fn from(e: DbErr) -> Self {
        log::error!("Datastore failure: {}", e);
        AppError::Internal(e.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        log::debug!("Request validation failed: {}", e);
        AppError::BadRequest(format!("Invalid request: {}", e))
    }
}

/// Returns true when a datastore error was caused by a unique index.
pub fn is_unique_violation(e: &DbErr) -> bool {
    let msg = e.to_string();
    // SQLite and PostgreSQL wording respectively.
    msg.contains("UNIQUE constraint failed") || msg.contains("duplicate key value")
}
