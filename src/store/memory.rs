//! In-process store with the same referential rules as the Postgres schema.
//!
//! `begin` takes the table lock for the life of the transaction and works on a
//! copy; `commit` swaps the copy in. Dropping the transaction discards it.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::models::department::{Department, NewDepartment};
use crate::models::employee::{Employee, EmployeeOrder, NewEmployee};
use crate::store::{Store, StoreError, StoreTx};

#[derive(Clone, Debug)]
struct Tables {
    departments: Vec<Department>,
    employees: Vec<Employee>,
    clock: DateTime<Utc>,
    frozen: bool,
}

impl Tables {
    fn now(&mut self) -> DateTime<Utc> {
        let stamp = self.clock;
        if !self.frozen {
            self.clock += Duration::milliseconds(1);
        }
        stamp
    }

    fn has_department(&self, id: Uuid) -> bool {
        self.departments.iter().any(|d| d.id == id)
    }

    fn name_taken(&self, parent_id: Option<Uuid>, name: &str, except: Option<Uuid>) -> bool {
        self.departments
            .iter()
            .any(|d| d.parent_id == parent_id && d.name == name && Some(d.id) != except)
    }
}

#[derive(Clone)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
    /// Department deletes allowed before the store starts failing them.
    delete_budget: Arc<AtomicUsize>,
    read_transactions: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let epoch = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        MemoryStore {
            tables: Arc::new(Mutex::new(Tables {
                departments: Vec::new(),
                employees: Vec::new(),
                clock: epoch,
                frozen: false,
            })),
            delete_budget: Arc::new(AtomicUsize::new(usize::MAX)),
            read_transactions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Every subsequent insert gets the same `created_at`.
    pub async fn freeze_clock(&self) {
        self.tables.lock().await.frozen = true;
    }

    pub fn fail_deletes_after(&self, successes: usize) {
        self.delete_budget.store(successes, Ordering::SeqCst);
    }

    /// Number of transactions opened through `begin_read`.
    pub fn read_transactions(&self) -> usize {
        self.read_transactions.load(Ordering::SeqCst)
    }

    pub async fn department_count(&self) -> usize {
        self.tables.lock().await.departments.len()
    }

    pub async fn employee_count(&self) -> usize {
        self.tables.lock().await.employees.len()
    }

    pub async fn employees_in(&self, department_id: Uuid) -> Vec<Employee> {
        self.tables
            .lock()
            .await
            .employees
            .iter()
            .filter(|e| e.department_id == department_id)
            .cloned()
            .collect()
    }

    /// Writes a parent pointer with no checks at all, for corrupting the graph in tests.
    pub async fn force_parent(&self, id: Uuid, parent_id: Option<Uuid>) {
        let mut tables = self.tables.lock().await;
        if let Some(dept) = tables.departments.iter_mut().find(|d| d.id == id) {
            dept.parent_id = parent_id;
        }
    }
}

pub struct MemoryTx {
    guard: OwnedMutexGuard<Tables>,
    work: Tables,
    delete_budget: Arc<AtomicUsize>,
}

impl Store for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<MemoryTx, StoreError> {
        let guard = self.tables.clone().lock_owned().await;
        let work = guard.clone();
        Ok(MemoryTx {
            guard,
            work,
            delete_budget: self.delete_budget.clone(),
        })
    }

    // The table lock already serializes transactions, so any tx is a snapshot.
    async fn begin_read(&self) -> Result<MemoryTx, StoreError> {
        self.read_transactions.fetch_add(1, Ordering::SeqCst);
        self.begin().await
    }
}

impl StoreTx for MemoryTx {
    async fn department(&mut self, id: Uuid) -> Result<Option<Department>, StoreError> {
        Ok(self.work.departments.iter().find(|d| d.id == id).cloned())
    }

    async fn children(&mut self, parent_id: Uuid) -> Result<Vec<Department>, StoreError> {
        Ok(self
            .work
            .departments
            .iter()
            .filter(|d| d.parent_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn employees(
        &mut self,
        department_id: Uuid,
        order: EmployeeOrder,
    ) -> Result<Vec<Employee>, StoreError> {
        let mut employees: Vec<Employee> = self
            .work
            .employees
            .iter()
            .filter(|e| e.department_id == department_id)
            .cloned()
            .collect();
        match order {
            EmployeeOrder::Created => employees.sort_by(|a, b| {
                b.created_at
                    .cmp(&a.created_at)
                    .then_with(|| a.full_name.cmp(&b.full_name))
            }),
            EmployeeOrder::Name => employees.sort_by(|a, b| {
                a.full_name
                    .cmp(&b.full_name)
                    .then_with(|| b.created_at.cmp(&a.created_at))
            }),
        }
        Ok(employees)
    }

    async fn insert_department(&mut self, new: NewDepartment) -> Result<Department, StoreError> {
        if let Some(parent_id) = new.parent_id {
            if !self.work.has_department(parent_id) {
                return Err(StoreError::ForeignKeyViolation);
            }
        }
        if self.work.name_taken(new.parent_id, &new.name, None) {
            return Err(StoreError::UniqueViolation);
        }

        let department = Department {
            id: Uuid::new_v4(),
            name: new.name,
            parent_id: new.parent_id,
            created_at: self.work.now(),
        };
        self.work.departments.push(department.clone());
        Ok(department)
    }

    async fn update_department(&mut self, department: &Department) -> Result<(), StoreError> {
        if let Some(parent_id) = department.parent_id {
            if !self.work.has_department(parent_id) {
                return Err(StoreError::ForeignKeyViolation);
            }
        }
        if self
            .work
            .name_taken(department.parent_id, &department.name, Some(department.id))
        {
            return Err(StoreError::UniqueViolation);
        }

        if let Some(row) = self.work.departments.iter_mut().find(|d| d.id == department.id) {
            row.name = department.name.clone();
            row.parent_id = department.parent_id;
        }
        Ok(())
    }

    async fn delete_department(&mut self, id: Uuid) -> Result<u64, StoreError> {
        let remaining = self.delete_budget.load(Ordering::SeqCst);
        if remaining == 0 {
            return Err(StoreError::Other("injected delete failure".into()));
        }
        if remaining != usize::MAX {
            self.delete_budget.store(remaining - 1, Ordering::SeqCst);
        }

        if !self.work.has_department(id) {
            return Ok(0);
        }

        let mut doomed: HashSet<Uuid> = HashSet::from([id]);
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            for dept in &self.work.departments {
                if dept.parent_id == Some(current) && doomed.insert(dept.id) {
                    stack.push(dept.id);
                }
            }
        }

        self.work.departments.retain(|d| !doomed.contains(&d.id));
        self.work.employees.retain(|e| !doomed.contains(&e.department_id));
        Ok(doomed.len() as u64)
    }

    async fn insert_employee(&mut self, new: NewEmployee) -> Result<Employee, StoreError> {
        if !self.work.has_department(new.department_id) {
            return Err(StoreError::ForeignKeyViolation);
        }

        let employee = Employee {
            id: Uuid::new_v4(),
            department_id: new.department_id,
            full_name: new.full_name,
            position: new.position,
            hired_at: new.hired_at,
            created_at: self.work.now(),
        };
        self.work.employees.push(employee.clone());
        Ok(employee)
    }

    async fn reassign_employees(&mut self, from: Uuid, to: Uuid) -> Result<u64, StoreError> {
        if !self.work.has_department(to) {
            return Err(StoreError::ForeignKeyViolation);
        }

        let mut moved = 0;
        for employee in self.work.employees.iter_mut().filter(|e| e.department_id == from) {
            employee.department_id = to;
            moved += 1;
        }
        Ok(moved)
    }

    async fn commit(mut self) -> Result<(), StoreError> {
        *self.guard = self.work;
        Ok(())
    }
}
