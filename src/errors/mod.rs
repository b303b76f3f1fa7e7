use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

/// Every failure the hierarchy engine can report. Callers match on the
/// variant, never on the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    EmptyField(&'static str),
    FieldTooLong { field: &'static str, max: usize },
    FutureHireDate,
    ParentNotFound,
    DepartmentNotFound,
    TargetNotFound,
    NameExists,
    SelfParent,
    CycleDetected,
    InvalidMode(String),
    MissingTarget,
    ReassignToSame,
    StoreFailure(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Renders the `{"error": ...}` body shared by every failure response.
pub fn json_error(status: StatusCode, message: impl ToString) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse { error: message.to_string() })
}

impl AppError {
    /// Only infrastructure failures are worth a caller-side retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StoreFailure(_))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmptyField(field) => write!(f, "{} cannot be empty", field),
            AppError::FieldTooLong { field, max } => {
                write!(f, "{} too long (max {} characters)", field, max)
            }
            AppError::FutureHireDate => write!(f, "hired_at cannot be in the future"),
            AppError::ParentNotFound => write!(f, "parent department not found"),
            AppError::DepartmentNotFound => write!(f, "department not found"),
            AppError::TargetNotFound => write!(f, "target department not found"),
            AppError::NameExists => {
                write!(f, "department with this name already exists in this parent")
            }
            AppError::SelfParent => write!(f, "department cannot be parent of itself"),
            AppError::CycleDetected => {
                write!(f, "cannot move department to its own descendant (cycle detected)")
            }
            AppError::InvalidMode(mode) => {
                write!(f, "invalid mode '{}', use 'cascade' or 'reassign'", mode)
            }
            AppError::MissingTarget => {
                write!(f, "reassign_to_department_id is required for reassign mode")
            }
            AppError::ReassignToSame => write!(f, "cannot reassign to the same department"),
            AppError::StoreFailure(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::StoreFailure(err.to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::EmptyField(_)
            | AppError::FieldTooLong { .. }
            | AppError::FutureHireDate
            | AppError::InvalidMode(_)
            | AppError::MissingTarget
            | AppError::ReassignToSame => StatusCode::BAD_REQUEST,
            AppError::ParentNotFound | AppError::DepartmentNotFound | AppError::TargetNotFound => {
                StatusCode::NOT_FOUND
            }
            AppError::NameExists | AppError::SelfParent | AppError::CycleDetected => {
                StatusCode::CONFLICT
            }
            AppError::StoreFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error(self.status_code(), self)
    }
}
