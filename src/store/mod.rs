//! Transactional store seam used by the services.
//!
//! All reads and writes go through a [`StoreTx`]; a transaction that is
//! dropped without [`StoreTx::commit`] is rolled back.

use std::fmt;
use uuid::Uuid;

use crate::models::department::{Department, NewDepartment};
use crate::models::employee::{Employee, EmployeeOrder, NewEmployee};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    UniqueViolation,
    ForeignKeyViolation,
    Other(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation => write!(f, "unique constraint violated"),
            StoreError::ForeignKeyViolation => write!(f, "foreign key constraint violated"),
            StoreError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

#[allow(async_fn_in_trait)]
pub trait Store: Clone + 'static {
    type Tx: StoreTx;

    async fn begin(&self) -> Result<Self::Tx, StoreError>;

    /// Opens a read-only transaction whose statements all see the same snapshot.
    async fn begin_read(&self) -> Result<Self::Tx, StoreError> {
        self.begin().await
    }
}

#[allow(async_fn_in_trait)]
pub trait StoreTx: Sized {
    async fn department(&mut self, id: Uuid) -> Result<Option<Department>, StoreError>;

    /// Direct children of `parent_id`, in a stable order.
    async fn children(&mut self, parent_id: Uuid) -> Result<Vec<Department>, StoreError>;

    async fn employees(
        &mut self,
        department_id: Uuid,
        order: EmployeeOrder,
    ) -> Result<Vec<Employee>, StoreError>;

    async fn insert_department(&mut self, new: NewDepartment) -> Result<Department, StoreError>;

    /// Writes `name` and `parent_id` of an existing row in one statement.
    async fn update_department(&mut self, department: &Department) -> Result<(), StoreError>;

    /// Deletes the row; descendant departments and every employee attached
    /// to any of them go with it. Returns the number of departments removed.
    async fn delete_department(&mut self, id: Uuid) -> Result<u64, StoreError>;

    async fn insert_employee(&mut self, new: NewEmployee) -> Result<Employee, StoreError>;

    /// Re-points every employee of `from` to `to`. Returns the row count.
    async fn reassign_employees(&mut self, from: Uuid, to: Uuid) -> Result<u64, StoreError>;

    async fn commit(self) -> Result<(), StoreError>;
}
