use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::department::{Department, NewDepartment};
use crate::models::employee::{Employee, EmployeeOrder, NewEmployee};
use crate::store::{Store, StoreError, StoreTx};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

pub struct PgTx {
    tx: Transaction<'static, Postgres>,
}

fn map_db_error(err: sqlx::Error) -> StoreError {
    if let Some(db_err) = err.as_database_error() {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation;
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation;
        }
    }
    StoreError::Other(err.to_string())
}

impl Store for PgStore {
    type Tx = PgTx;

    async fn begin(&self) -> Result<PgTx, StoreError> {
        let tx = self.pool.begin().await.map_err(map_db_error)?;
        Ok(PgTx { tx })
    }

    // Read committed would give every statement its own snapshot.
    async fn begin_read(&self) -> Result<PgTx, StoreError> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        Ok(PgTx { tx })
    }
}

impl StoreTx for PgTx {
    async fn department(&mut self, id: Uuid) -> Result<Option<Department>, StoreError> {
        sqlx::query_as::<_, Department>(
            "SELECT id, name, parent_id, created_at FROM departments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn children(&mut self, parent_id: Uuid) -> Result<Vec<Department>, StoreError> {
        sqlx::query_as::<_, Department>(
            "SELECT id, name, parent_id, created_at FROM departments WHERE parent_id = $1 ORDER BY created_at, id",
        )
        .bind(parent_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn employees(
        &mut self,
        department_id: Uuid,
        order: EmployeeOrder,
    ) -> Result<Vec<Employee>, StoreError> {
        let sql = match order {
            EmployeeOrder::Created => {
                "SELECT id, department_id, full_name, position, hired_at, created_at FROM employees WHERE department_id = $1 ORDER BY created_at DESC, full_name ASC"
            }
            EmployeeOrder::Name => {
                "SELECT id, department_id, full_name, position, hired_at, created_at FROM employees WHERE department_id = $1 ORDER BY full_name ASC, created_at DESC"
            }
        };

        sqlx::query_as::<_, Employee>(sql)
            .bind(department_id)
            .fetch_all(&mut *self.tx)
            .await
            .map_err(map_db_error)
    }

    async fn insert_department(&mut self, new: NewDepartment) -> Result<Department, StoreError> {
        sqlx::query_as::<_, Department>(
            "INSERT INTO departments (id, name, parent_id) VALUES ($1, $2, $3) RETURNING id, name, parent_id, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&new.name)
        .bind(new.parent_id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn update_department(&mut self, department: &Department) -> Result<(), StoreError> {
        sqlx::query("UPDATE departments SET name = $1, parent_id = $2 WHERE id = $3")
            .bind(&department.name)
            .bind(department.parent_id)
            .bind(department.id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(())
    }

    async fn delete_department(&mut self, id: Uuid) -> Result<u64, StoreError> {
        // Count the subtree first; ON DELETE CASCADE only reports the root row.
        let (count,): (i64,) = sqlx::query_as(
            r#"
            WITH RECURSIVE subtree AS (
                SELECT id FROM departments WHERE id = $1
                UNION
                SELECT d.id FROM departments d JOIN subtree s ON d.parent_id = s.id
            )
            SELECT COUNT(*) FROM subtree
            "#,
        )
        .bind(id)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;

        Ok(count as u64)
    }

    async fn insert_employee(&mut self, new: NewEmployee) -> Result<Employee, StoreError> {
        sqlx::query_as::<_, Employee>(
            r#"
            INSERT INTO employees (id, department_id, full_name, position, hired_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, department_id, full_name, position, hired_at, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new.department_id)
        .bind(&new.full_name)
        .bind(&new.position)
        .bind(new.hired_at)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_db_error)
    }

    async fn reassign_employees(&mut self, from: Uuid, to: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("UPDATE employees SET department_id = $1 WHERE department_id = $2")
            .bind(to)
            .bind(from)
            .execute(&mut *self.tx)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(map_db_error)
    }
}
