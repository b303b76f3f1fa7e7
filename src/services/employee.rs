use chrono::{DateTime, Utc};
use log::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::employee::{Employee, EmployeeOrder, NewEmployee};
use crate::store::{Store, StoreError, StoreTx};
use crate::utils::validation::validate_employee;

pub async fn create_employee<S: Store>(
    store: &S,
    department_id: Uuid,
    full_name: &str,
    position: &str,
    hired_at: Option<DateTime<Utc>>,
) -> Result<Employee, AppError> {
    let mut tx = store.begin().await?;

    if tx.department(department_id).await?.is_none() {
        return Err(AppError::DepartmentNotFound);
    }

    let (full_name, position) = validate_employee(full_name, position, hired_at)?;

    let employee = tx
        .insert_employee(NewEmployee { department_id, full_name, position, hired_at })
        .await
        .map_err(|err| match err {
            StoreError::ForeignKeyViolation => AppError::DepartmentNotFound,
            other => other.into(),
        })?;
    tx.commit().await?;

    info!(
        "Employee created: id={} department_id={} full_name={:?}",
        employee.id, employee.department_id, employee.full_name
    );
    Ok(employee)
}

pub async fn list_employees<S: Store>(
    store: &S,
    department_id: Uuid,
    order: EmployeeOrder,
) -> Result<Vec<Employee>, AppError> {
    let mut tx = store.begin().await?;

    if tx.department(department_id).await?.is_none() {
        return Err(AppError::DepartmentNotFound);
    }

    Ok(tx.employees(department_id, order).await?)
}

/// Moves every employee of `from` to `to` in one transaction.
pub async fn transfer_employees<S: Store>(
    store: &S,
    from: Uuid,
    to: Uuid,
) -> Result<u64, AppError> {
    let mut tx = store.begin().await?;

    if tx.department(from).await?.is_none() {
        return Err(AppError::DepartmentNotFound);
    }
    if from == to {
        return Err(AppError::ReassignToSame);
    }
    if tx.department(to).await?.is_none() {
        return Err(AppError::TargetNotFound);
    }

    let moved = tx.reassign_employees(from, to).await.map_err(|err| match err {
        StoreError::ForeignKeyViolation => AppError::TargetNotFound,
        other => other.into(),
    })?;
    tx.commit().await?;

    info!("Employees transferred: from={} to={} count={}", from, to, moved);
    Ok(moved)
}
