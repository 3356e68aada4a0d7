// src/models/service.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== SERVICE STATUS ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "pending",
            ServiceStatus::InProgress => "in_progress",
            ServiceStatus::Completed => "completed",
            ServiceStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ServiceStatus::Pending),
            "in_progress" => Some(ServiceStatus::InProgress),
            "completed" => Some(ServiceStatus::Completed),
            "cancelled" => Some(ServiceStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_some()
    }

    /// Statuses that count toward an employee's workload.
    pub fn is_open(&self) -> bool {
        matches!(self, ServiceStatus::Pending | ServiceStatus::InProgress)
    }
}

impl std::fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================== SERVICE ====================

/// A single service order. `service_type` is a denormalized copy of the
/// catalog name taken at creation so history stays readable if the catalog
/// entry is renamed later.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Service {
    pub id: i64,
    pub vehicle_id: i64,
    pub employee_id: i64,
    pub service_type_id: i64,
    pub service_type: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    pub total_cost: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateServiceRequest {
    pub vehicle_id: i64,
    pub employee_id: i64,
    pub service_type_id: i64,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateServiceStatusRequest {
    pub status: String,
}

// ==================== NESTED SUMMARIES ====================

#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub plate_number: String,
    pub client_name: String,
}

#[derive(Debug, Serialize)]
pub struct EmployeeSummary {
    pub name: String,
}

/// Order representation with nested vehicle and employee summaries, the
/// shape shared by create, list and status-update responses.
#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub id: i64,
    pub vehicle: VehicleSummary,
    pub employee: EmployeeSummary,
    pub service_type: String,
    pub status: String,
    pub start_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse_accepts_the_four_statuses() {
        assert_eq!(ServiceStatus::parse("pending"), Some(ServiceStatus::Pending));
        assert_eq!(ServiceStatus::parse("in_progress"), Some(ServiceStatus::InProgress));
        assert_eq!(ServiceStatus::parse("completed"), Some(ServiceStatus::Completed));
        assert_eq!(ServiceStatus::parse("cancelled"), Some(ServiceStatus::Cancelled));
    }

    #[test]
    fn test_status_parse_rejects_anything_else() {
        assert_eq!(ServiceStatus::parse("done"), None);
        assert_eq!(ServiceStatus::parse("PENDING"), None);
        assert_eq!(ServiceStatus::parse("in-progress"), None);
        assert_eq!(ServiceStatus::parse(""), None);
    }

    #[test]
    fn test_open_statuses() {
        assert!(ServiceStatus::Pending.is_open());
        assert!(ServiceStatus::InProgress.is_open());
        assert!(!ServiceStatus::Completed.is_open());
        assert!(!ServiceStatus::Cancelled.is_open());
    }
}
