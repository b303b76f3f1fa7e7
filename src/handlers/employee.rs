use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::errors::AppError;
use crate::handlers::log_failure;
use crate::models::employee::{EmployeeOrder, EmployeeRequest, TransferRequest};
use crate::services;
use crate::store::Store;

#[derive(Deserialize)]
pub struct EmployeeQueryParams {
    sort: Option<String>,
}

pub async fn create_employee<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    new_employee: web::Json<EmployeeRequest>,
) -> Result<HttpResponse, AppError> {
    let employee = services::employee::create_employee(
        store.get_ref(),
        department_id.into_inner(),
        &new_employee.full_name,
        &new_employee.position,
        new_employee.hired_at,
    )
    .await
    .map_err(|err| log_failure("create employee", err))?;

    Ok(HttpResponse::Created().json(employee))
}

pub async fn get_employees<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    query: web::Query<EmployeeQueryParams>,
) -> Result<HttpResponse, AppError> {
    let employees = services::employee::list_employees(
        store.get_ref(),
        department_id.into_inner(),
        EmployeeOrder::parse(query.sort.as_deref()),
    )
    .await
    .map_err(|err| log_failure("list employees", err))?;

    Ok(HttpResponse::Ok().json(employees))
}

pub async fn transfer_employees<S: Store>(
    store: web::Data<S>,
    department_id: web::Path<Uuid>,
    transfer: web::Json<TransferRequest>,
) -> Result<HttpResponse, AppError> {
    let transferred = services::employee::transfer_employees(
        store.get_ref(),
        department_id.into_inner(),
        transfer.to_department_id,
    )
    .await
    .map_err(|err| log_failure("transfer employees", err))?;

    Ok(HttpResponse::Ok().json(json!({ "transferred": transferred })))
}
