// src/handlers.rs
use actix_web::{web, HttpResponse};
use serde::Serialize;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::models::DashboardStats;
use crate::report_handlers::day_bounds;
use crate::AppState;

// ==================== COMMON STRUCTURES ====================

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: Some(message),
        }
    }
}

// ==================== DASHBOARD STATISTICS ====================

/// Four independent aggregations, each computed fresh on every call. The
/// revenue window is the current calendar day, both boundaries inclusive.
pub async fn get_dashboard_stats(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let pending_services: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM services WHERE status IN ('pending', 'in_progress')",
    )
    .fetch_one(&app_state.db_pool)
    .await?;

    let (day_start, day_end) = day_bounds(chrono::Utc::now().date_naive());
    let daily_revenue: (Option<f64>,) = sqlx::query_as(
        "SELECT SUM(total_cost) FROM services \
         WHERE status = 'completed' AND end_time >= ? AND end_time <= ?",
    )
    .bind(day_start)
    .bind(day_end)
    .fetch_one(&app_state.db_pool)
    .await?;

    let active_employees: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM employees WHERE active = 1",
    )
    .fetch_one(&app_state.db_pool)
    .await?;

    let total_vehicles: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicles")
        .fetch_one(&app_state.db_pool)
        .await?;

    let stats = DashboardStats {
        pending_services: pending_services.0,
        daily_revenue: daily_revenue.0.unwrap_or(0.0),
        active_employees: active_employees.0,
        total_vehicles: total_vehicles.0,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}
