use actix_web::error::InternalError;
use actix_web::http::StatusCode;
use chrono::{DateTime, Utc};
use validator::Validate;

use crate::errors::{json_error, AppError};

/// Upper bound, in characters, for every free-text field.
pub const MAX_FIELD_LEN: usize = 200;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), actix_web::Error> {
    payload.validate().map_err(|err| {
        let response = json_error(StatusCode::BAD_REQUEST, &err);
        InternalError::from_response(err, response).into()
    })
}

/// Trims `value` and checks it is non-empty and at most `MAX_FIELD_LEN` chars.
fn normalize_field(field: &'static str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::EmptyField(field));
    }
    if trimmed.chars().count() > MAX_FIELD_LEN {
        return Err(AppError::FieldTooLong { field, max: MAX_FIELD_LEN });
    }
    Ok(trimmed.to_string())
}

pub fn validate_department(name: &str) -> Result<String, AppError> {
    normalize_field("name", name)
}

pub fn validate_employee(
    full_name: &str,
    position: &str,
    hired_at: Option<DateTime<Utc>>,
) -> Result<(String, String), AppError> {
    validate_employee_at(full_name, position, hired_at, Utc::now())
}

fn validate_employee_at(
    full_name: &str,
    position: &str,
    hired_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(String, String), AppError> {
    let full_name = normalize_field("full_name", full_name)?;
    let position = normalize_field("position", position)?;

    if matches!(hired_at, Some(hired) if hired > now) {
        return Err(AppError::FutureHireDate);
    }

    Ok((full_name, position))
}
