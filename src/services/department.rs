use std::str::FromStr;

use log::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::department::{Department, DepartmentUpdate, NewDepartment};
use crate::services::hierarchy;
use crate::store::{Store, StoreError, StoreTx};
use crate::utils::validation::validate_department;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Remove the department, its whole subtree and every employee in it.
    Cascade,
    /// Move the department's own employees to another department first.
    Reassign,
}

impl FromStr for DeleteMode {
    type Err = AppError;

    fn from_str(mode: &str) -> Result<Self, Self::Err> {
        match mode {
            "cascade" => Ok(DeleteMode::Cascade),
            "reassign" => Ok(DeleteMode::Reassign),
            other => Err(AppError::InvalidMode(other.to_string())),
        }
    }
}

/// A unique-constraint hit on a department row always means a sibling
/// already has the name.
fn name_conflict(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation => AppError::NameExists,
        other => other.into(),
    }
}

pub async fn create_department<S: Store>(
    store: &S,
    name: &str,
    parent_id: Option<Uuid>,
) -> Result<Department, AppError> {
    let name = validate_department(name)?;
    let mut tx = store.begin().await?;

    if let Some(parent_id) = parent_id {
        if tx.department(parent_id).await?.is_none() {
            return Err(AppError::ParentNotFound);
        }
    }

    let department = tx
        .insert_department(NewDepartment { name, parent_id })
        .await
        .map_err(|err| match err {
            // Parent deleted between the check and the insert.
            StoreError::ForeignKeyViolation => AppError::ParentNotFound,
            other => name_conflict(other),
        })?;
    tx.commit().await?;

    info!(
        "Department created: id={} name={:?} parent_id={:?}",
        department.id, department.name, department.parent_id
    );
    Ok(department)
}

/// Renames and/or reparents a department as one update.
///
/// An absent field keeps its current value; there is no way to detach a
/// department to the root level through this call.
pub async fn move_department<S: Store>(
    store: &S,
    id: Uuid,
    update: DepartmentUpdate,
) -> Result<Department, AppError> {
    let mut tx = store.begin().await?;

    let mut department = tx
        .department(id)
        .await?
        .ok_or(AppError::DepartmentNotFound)?;

    if let Some(name) = update.name.as_deref() {
        department.name = validate_department(name)?;
    }

    if let Some(parent_id) = update.parent_id {
        if tx.department(parent_id).await?.is_none() {
            return Err(AppError::ParentNotFound);
        }
        hierarchy::check_move(&mut tx, id, parent_id).await?;
        department.parent_id = Some(parent_id);
    }

    tx.update_department(&department)
        .await
        .map_err(|err| match err {
            StoreError::ForeignKeyViolation => AppError::ParentNotFound,
            other => name_conflict(other),
        })?;
    tx.commit().await?;

    info!(
        "Department updated: id={} name={:?} parent_id={:?}",
        department.id, department.name, department.parent_id
    );
    Ok(department)
}

/// Deletes a department according to `mode` (`"cascade"` or `"reassign"`).
///
/// In reassign mode only the employees attached directly to `id` survive;
/// descendant departments are removed together with their own employees.
pub async fn delete_department<S: Store>(
    store: &S,
    id: Uuid,
    mode: &str,
    reassign_to: Option<Uuid>,
) -> Result<(), AppError> {
    let mut tx = store.begin().await?;

    if tx.department(id).await?.is_none() {
        return Err(AppError::DepartmentNotFound);
    }

    match mode.parse::<DeleteMode>()? {
        DeleteMode::Cascade => {
            let removed = tx.delete_department(id).await?;
            tx.commit().await?;
            info!("Department deleted (cascade): id={} departments_removed={}", id, removed);
        }
        DeleteMode::Reassign => {
            let target = reassign_to.ok_or(AppError::MissingTarget)?;
            if target == id {
                return Err(AppError::ReassignToSame);
            }
            if tx.department(target).await?.is_none() {
                return Err(AppError::TargetNotFound);
            }
            // A target inside the doomed subtree would be deleted along with
            // the employees just moved to it.
            if hierarchy::descendant_ids(&mut tx, id).await?.contains(&target) {
                return Err(AppError::TargetNotFound);
            }

            let moved = tx.reassign_employees(id, target).await?;
            let mut removed = 0;
            for child in tx.children(id).await? {
                removed += tx.delete_department(child.id).await?;
            }
            removed += tx.delete_department(id).await?;
            tx.commit().await?;

            info!(
                "Department deleted (reassign): id={} target={} employees_moved={} departments_removed={}",
                id, target, moved, removed
            );
        }
    }

    Ok(())
}
