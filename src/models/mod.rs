// src/models/mod.rs

pub mod employee;
pub mod service;
pub mod service_type;
pub mod supply;
pub mod vehicle;

pub use employee::*;
pub use service::*;
pub use service_type::*;
pub use supply::*;
pub use vehicle::*;

use serde::Serialize;

// ==================== COMMON / SHARED ====================

/// Dashboard snapshot: four independent aggregations computed fresh on
/// each call. Field names match the payload contract of the web client.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    #[serde(rename = "pendingServices")]
    pub pending_services: i64,
    #[serde(rename = "dailyRevenue")]
    pub daily_revenue: f64,
    #[serde(rename = "activeEmployees")]
    pub active_employees: i64,
    #[serde(rename = "totalVehicles")]
    pub total_vehicles: i64,
}
