use actix_web::{web, HttpResponse};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::handlers::log_failure;
use crate::models::department::{DepartmentRequest, DepartmentUpdate};
use crate::services;
use crate::services::tree::MIN_DEPTH;
use crate::store::Store;
use crate::utils::validation::validate_payload;

#[derive(Deserialize, Validate)]
pub struct TreeQuery {
    #[serde(default = "default_depth")]
    #[validate(range(min = 1, max = 5))]
    depth: u8,
    #[serde(default = "default_include_employees")]
    include_employees: bool,
}

fn default_depth() -> u8 {
    MIN_DEPTH
}

fn default_include_employees() -> bool {
    true
}

#[derive(Deserialize)]
pub struct DeleteQuery {
    mode: Option<String>,
    reassign_to_department_id: Option<Uuid>,
}

pub async fn create_department<S: Store>(
    store: web::Data<S>,
    new_department: web::Json<DepartmentRequest>,
) -> Result<HttpResponse, AppError> {
    let department = services::department::create_department(
        store.get_ref(),
        &new_department.name,
        new_department.parent_id,
    )
    .await
    .map_err(|err| log_failure("create department", err))?;

    Ok(HttpResponse::Created().json(department))
}

pub async fn get_department<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    query: web::Query<TreeQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    validate_payload(&*query)?;

    let tree = services::tree::get_subtree(
        store.get_ref(),
        department_id.into_inner(),
        query.depth,
        query.include_employees,
    )
    .await
    .map_err(|err| log_failure("get department", err))?;

    Ok(HttpResponse::Ok().json(tree))
}

pub async fn update_department<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    updates: web::Json<DepartmentUpdate>,
) -> Result<HttpResponse, AppError> {
    let department = services::department::move_department(
        store.get_ref(),
        department_id.into_inner(),
        updates.into_inner(),
    )
    .await
    .map_err(|err| log_failure("update department", err))?;

    Ok(HttpResponse::Ok().json(department))
}

pub async fn delete_department<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    query: web::Query<DeleteQuery>,
) -> Result<HttpResponse, AppError> {
    services::department::delete_department(
        store.get_ref(),
        department_id.into_inner(),
        query.mode.as_deref().unwrap_or_default(),
        query.reassign_to_department_id,
    )
    .await
    .map_err(|err| log_failure("delete department", err))?;

    Ok(HttpResponse::NoContent().finish())
}
