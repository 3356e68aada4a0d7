// src/models/employee.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== EMPLOYEE ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub shift: String,
    pub active: bool,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateEmployeeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 100, message = "Position must be between 1 and 100 characters"))]
    pub position: String,

    #[validate(length(min = 1, max = 50, message = "Shift must be between 1 and 50 characters"))]
    pub shift: String,
}

/// Active flag is the only field that can change after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateEmployeeStatusRequest {
    pub active: bool,
}

/// Employee as returned to callers: always annotated with the derived
/// workload, which is recomputed from current service rows on every read.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub shift: String,
    pub active: bool,
    pub current_workload: i64,
}

impl EmployeeResponse {
    pub fn from_employee(employee: Employee, current_workload: i64) -> Self {
        Self {
            id: employee.id,
            name: employee.name,
            position: employee.position,
            shift: employee.shift,
            active: employee.active,
            current_workload,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EmployeeWorkload {
    pub employee_id: i64,
    pub employee_name: String,
    pub pending_services: i64,
    pub in_progress_services: i64,
    pub completed_services: i64,
    pub total_workload: i64,
}
