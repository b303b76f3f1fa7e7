use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

#[derive(sqlx::FromRow, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: Uuid,
    pub department_id: Uuid,
    pub full_name: String,
    pub position: String,
    pub hired_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub department_id: Uuid,
    pub full_name: String,
    pub position: String,
    pub hired_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
pub struct EmployeeRequest {
    pub full_name: String,
    pub position: String,
    pub hired_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Debug)]
pub struct TransferRequest {
    pub to_department_id: Uuid,
}

/// Listing order for a department's employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmployeeOrder {
    /// Newest first, ties broken by `full_name` ascending.
    #[default]
    Created,
    Name,
}

impl EmployeeOrder {
    /// Unknown values fall back to `Created`.
    pub fn parse(sort: Option<&str>) -> Self {
        match sort {
            Some("name") => EmployeeOrder::Name,
            _ => EmployeeOrder::Created,
        }
    }
}
