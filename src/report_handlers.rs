// src/report_handlers.rs
//! Read-only reports: daily income, average service time, vehicle history

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{ServiceType, Vehicle};
use crate::AppState;

/// Full-day window for a calendar date, both boundaries inclusive.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    let end = start + Duration::days(1) - Duration::microseconds(1);
    (start, end)
}

// ==================== DAILY INCOME ====================

#[derive(Debug, Deserialize)]
pub struct DailyIncomeQuery {
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct DailyIncomeReport {
    pub date: String,
    pub total_income: f64,
    pub services_count: i64,
}

pub async fn get_daily_income(
    app_state: web::Data<Arc<AppState>>,
    query: web::Query<DailyIncomeQuery>,
) -> ApiResult<HttpResponse> {
    let report_date = NaiveDate::parse_from_str(&query.date, "%Y-%m-%d")
        .map_err(|_| ApiError::invalid_date(&query.date))?;

    let (day_start, day_end) = day_bounds(report_date);

    let row: (Option<f64>, i64) = sqlx::query_as(
        "SELECT SUM(total_cost), COUNT(*) FROM services \
         WHERE status = 'completed' AND end_time >= ? AND end_time <= ?",
    )
    .bind(day_start)
    .bind(day_end)
    .fetch_one(&app_state.db_pool)
    .await?;

    let report = DailyIncomeReport {
        date: query.date.clone(),
        total_income: row.0.unwrap_or(0.0),
        services_count: row.1,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(report)))
}

// ==================== AVERAGE SERVICE TIME ====================

#[derive(Debug, Serialize)]
pub struct AverageServiceTime {
    pub service_type: String,
    pub average_time: f64,
}

/// Mean duration in minutes over completed, timestamped services, matched
/// against the catalog by the denormalized name copy. A type with no
/// completed services falls back to its configured base duration.
pub async fn get_average_service_time(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let service_types: Vec<ServiceType> =
        sqlx::query_as("SELECT * FROM service_types ORDER BY id ASC")
            .fetch_all(&app_state.db_pool)
            .await?;

    let mut results = Vec::with_capacity(service_types.len());
    for service_type in service_types {
        let durations: Vec<(DateTime<Utc>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT start_time, end_time FROM services \
             WHERE service_type = ? AND status = 'completed' AND end_time IS NOT NULL",
        )
        .bind(&service_type.name)
        .fetch_all(&app_state.db_pool)
        .await?;

        let average_time = if durations.is_empty() {
            service_type.base_duration as f64
        } else {
            mean_minutes(&durations)
        };

        results.push(AverageServiceTime {
            service_type: service_type.name,
            average_time,
        });
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(results)))
}

fn mean_minutes(spans: &[(DateTime<Utc>, DateTime<Utc>)]) -> f64 {
    let total_minutes: f64 = spans
        .iter()
        .map(|(start, end)| (*end - *start).num_seconds() as f64 / 60.0)
        .sum();
    total_minutes / spans.len() as f64
}

// ==================== VEHICLE HISTORY ====================

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct VehicleHistoryEntry {
    pub service_date: DateTime<Utc>,
    pub service_type: String,
    pub total_cost: f64,
    pub employee_name: String,
    pub status: String,
}

pub async fn get_vehicle_history(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let plate_number = path.into_inner();

    let vehicle: Option<Vehicle> = sqlx::query_as(
        "SELECT * FROM vehicles WHERE plate_number = ?",
    )
    .bind(&plate_number)
    .fetch_optional(&app_state.db_pool)
    .await?;

    let vehicle = vehicle.ok_or_else(|| ApiError::plate_not_found(&plate_number))?;

    // Most recent first; the employee name falls back to a placeholder if
    // the reference no longer resolves.
    let history: Vec<VehicleHistoryEntry> = sqlx::query_as(
        r#"
        SELECT
            s.start_time AS service_date,
            s.service_type,
            s.total_cost,
            COALESCE(e.name, 'Unknown') AS employee_name,
            s.status
        FROM services s
        LEFT JOIN employees e ON s.employee_id = e.id
        WHERE s.vehicle_id = ?
        ORDER BY s.start_time DESC
        "#,
    )
    .bind(vehicle.id)
    .fetch_all(&app_state.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(history)))
}
