//! Error taxonomy for the HRMS service.
//!
//! A single [`HrmsError`] enum covers the failure modes the domain, repository
//! and notifier layers produce. It implements actix-web's [`ResponseError`] so
//! handlers can propagate it with `?` and have it rendered as a JSON
//! `{"message": ...}` body with the matching HTTP status.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type HrmsResult<T> = Result<T, HrmsError>;

/// The crate-wide error type.
#[derive(Debug, Error)]
pub enum HrmsError {
    /// Request data failed validation (maps to 400).
    #[error("{0}")]
    Validation(String),

    /// A state transition was requested that the entity does not allow
    /// (maps to 409).
    #[error("{0}")]
    InvalidTransition(String),

    /// A referenced entity could not be found (maps to 404).
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The request conflicts with existing state (maps to 409).
    #[error("{0}")]
    Conflict(String),

    /// A notification could not be delivered (maps to 500).
    #[error("{0}")]
    Delivery(String),

    /// An underlying database operation failed (maps to 500).
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl HrmsError {
    /// The message surfaced to clients in the JSON body.
    fn client_message(&self) -> String {
        match self {
            HrmsError::Database(_) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for HrmsError {
    fn status_code(&self) -> StatusCode {
        match self {
            HrmsError::Validation(_) => StatusCode::BAD_REQUEST,
            HrmsError::NotFound(_) => StatusCode::NOT_FOUND,
            HrmsError::InvalidTransition(_) | HrmsError::Conflict(_) => StatusCode::CONFLICT,
            HrmsError::Delivery(_) | HrmsError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "message": self.client_message() }))
    }
}
