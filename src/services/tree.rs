use futures_util::future::{FutureExt, LocalBoxFuture};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::department::{Department, DepartmentTree};
use crate::models::employee::EmployeeOrder;
use crate::store::{Store, StoreTx};

pub const MIN_DEPTH: u8 = 1;
pub const MAX_DEPTH: u8 = 5;

/// Builds a snapshot of `root_id` and its descendants, `depth` levels deep.
///
/// `depth` is clamped to `MIN_DEPTH..=MAX_DEPTH`. Nodes on the last level
/// carry no `children` at all, even when the store has some. The whole read
/// runs in one read-only snapshot transaction that is never committed.
pub async fn get_subtree<S: Store>(
    store: &S,
    root_id: Uuid,
    depth: u8,
    include_employees: bool,
) -> Result<DepartmentTree, AppError> {
    let depth = depth.clamp(MIN_DEPTH, MAX_DEPTH);
    let mut tx = store.begin_read().await?;

    let root = tx
        .department(root_id)
        .await?
        .ok_or(AppError::DepartmentNotFound)?;

    load_node(&mut tx, root, depth, include_employees).await
}

fn load_node<'a, T: StoreTx + 'a>(
    tx: &'a mut T,
    department: Department,
    depth: u8,
    include_employees: bool,
) -> LocalBoxFuture<'a, Result<DepartmentTree, AppError>> {
    async move {
        let employees = if include_employees {
            Some(tx.employees(department.id, EmployeeOrder::Created).await?)
        } else {
            None
        };

        let children = if depth > 0 {
            let mut nodes = Vec::new();
            for child in tx.children(department.id).await? {
                nodes.push(load_node(&mut *tx, child, depth - 1, include_employees).await?);
            }
            Some(nodes)
        } else {
            None
        };

        Ok::<_, AppError>(DepartmentTree { department, employees, children })
    }
    .boxed_local()
}
