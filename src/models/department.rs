use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

use crate::models::employee::Employee;

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Validated values for a department insert. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

#[derive(Deserialize, Debug)]
pub struct DepartmentRequest {
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Partial update: absent fields are left untouched.
#[derive(Deserialize, Debug, Default)]
pub struct DepartmentUpdate {
    pub name: Option<String>,
    pub parent_id: Option<Uuid>,
}

/// Depth-bounded snapshot of a department and its descendants.
///
/// `employees` is `None` when employees were not requested, `children` is
/// `None` when the depth budget ran out before this node's children were
/// scanned. Both are left out of the JSON in that case.
#[derive(Serialize, Debug, Clone)]
pub struct DepartmentTree {
    #[serde(flatten)]
    pub department: Department,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<Vec<Employee>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DepartmentTree>>,
}
