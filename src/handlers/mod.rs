use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest};
use log::{error, warn};

use crate::errors::{json_error, AppError};
use crate::store::Store;

pub mod department;
pub mod employee;

/// Registers every route against the store type `S`.
pub fn configure<S: Store>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(
            web::resource("/departments")
                .route(web::post().to(department::create_department::<S>)),
        )
        .service(
            web::resource("/departments/{id}")
                .route(web::get().to(department::get_department::<S>))
                .route(web::patch().to(department::update_department::<S>))
                .route(web::delete().to(department::delete_department::<S>)),
        )
        .service(
            web::resource("/departments/{id}/employees")
                .route(web::post().to(employee::create_employee::<S>))
                .route(web::get().to(employee::get_employees::<S>)),
        )
        .service(
            web::resource("/departments/{id}/employees/transfer")
                .route(web::post().to(employee::transfer_employees::<S>)),
        );
}

/// Logs a failed operation and hands the error back unchanged.
pub(crate) fn log_failure(operation: &str, err: AppError) -> AppError {
    if err.is_retryable() {
        error!("Failed to {}: {}", operation, err);
    } else {
        warn!("Failed to {}: {}", operation, err);
    }
    err
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = json_error(
        StatusCode::UNPROCESSABLE_ENTITY,
        format!("invalid request body: {}", err),
    );
    InternalError::from_response(err, response).into()
}

fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    let response = json_error(StatusCode::BAD_REQUEST, "invalid department id");
    InternalError::from_response(err, response).into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let response = json_error(StatusCode::BAD_REQUEST, format!("invalid query: {}", err));
    InternalError::from_response(err, response).into()
}
