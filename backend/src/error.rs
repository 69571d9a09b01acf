use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use shared::SharedError;
use std::fmt;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl ApiError {
    pub fn new(error: &str, message: &str, status_code: u16) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            status_code,
        }
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new("BAD_REQUEST", message, 400)
    }

    pub fn not_found(message: &str) -> Self {
        Self::new("NOT_FOUND", message, 404)
    }

    pub fn conflict(message: &str) -> Self {
        Self::new("CONFLICT", message, 409)
    }

    pub fn unprocessable(message: &str) -> Self {
        Self::new("UNPROCESSABLE_ENTITY", message, 422)
    }

    pub fn internal_error(message: &str) -> Self {
        Self::new("INTERNAL_ERROR", message, 500)
    }

    pub fn database_error(message: &str) -> Self {
        Self::new("DATABASE_ERROR", message, 500)
    }

    pub fn validation_error(message: &str) -> Self {
        Self::new("VALIDATION_ERROR", message, 400)
    }

    /// A judge's API or profile page could not be reached or answered badly.
    pub fn upstream_error(message: &str) -> Self {
        Self::new("UPSTREAM_ERROR", message, 502)
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let status = match actix_web::http::StatusCode::from_u16(self.status_code) {
            Ok(status) => status,
            Err(_) => {
                log::warn!("Invalid status code {}, defaulting to 500", self.status_code);
                actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        HttpResponse::build(status).json(self)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for ApiError {}

impl From<SharedError> for ApiError {
    fn from(err: SharedError) -> Self {
        match err {
            SharedError::Format(m) => Self::unprocessable(&m),
            SharedError::Validation(m) => Self::validation_error(&m),
            SharedError::NotFound(m) => Self::not_found(&m),
            SharedError::BadRequest(m) | SharedError::Conversion(m) | SharedError::MissingField(m) => {
                Self::bad_request(&m)
            }
            SharedError::Conflict(m) => Self::conflict(&m),
            SharedError::Database(m) => Self::database_error(&m),
            SharedError::Internal(m) => Self::internal_error(&m),
        }
    }
}

impl From<crate::user::repository::RepositoryError> for ApiError {
    fn from(err: crate::user::repository::RepositoryError) -> Self {
        use crate::user::repository::RepositoryError;
        match err {
            RepositoryError::NotFound(id) => Self::not_found(&format!("User not found: {}", id)),
            RepositoryError::Conflict(m) => {
                log::warn!("Concurrent update rejected: {}", m);
                Self::conflict("User was modified by another request, retry")
            }
            RepositoryError::Database(m) => Self::database_error(&m),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation_error(&format!("Validation error: {}", err))
    }
}
