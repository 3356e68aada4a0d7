// src/employee_handlers.rs
//! Employee management and derived workload

use actix_web::{web, HttpResponse};
use log::info;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{
    CreateEmployeeRequest, Employee, EmployeeResponse, EmployeeWorkload,
    UpdateEmployeeStatusRequest,
};
use crate::AppState;

/// Count of an employee's pending and in_progress services. Always derived
/// from current service rows, never stored on the employee.
async fn current_workload(pool: &sqlx::SqlitePool, employee_id: i64) -> ApiResult<i64> {
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM services \
         WHERE employee_id = ? AND status IN ('pending', 'in_progress')",
    )
    .bind(employee_id)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

async fn count_by_status(
    pool: &sqlx::SqlitePool,
    employee_id: i64,
    status: &str,
) -> ApiResult<i64> {
    let count: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM services WHERE employee_id = ? AND status = ?",
    )
    .bind(employee_id)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(count.0)
}

// ==================== CREATE EMPLOYEE ====================

pub async fn create_employee(
    app_state: web::Data<Arc<AppState>>,
    employee: web::Json<CreateEmployeeRequest>,
) -> ApiResult<HttpResponse> {
    employee.validate()?;

    let result = sqlx::query(
        "INSERT INTO employees (name, position, shift, active) VALUES (?, ?, ?, 1)",
    )
    .bind(&employee.name)
    .bind(&employee.position)
    .bind(&employee.shift)
    .execute(&app_state.db_pool)
    .await?;

    let created: Employee = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&app_state.db_pool)
        .await?;

    let workload = current_workload(&app_state.db_pool, created.id).await?;

    info!("Created employee {} ({})", created.name, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(
        EmployeeResponse::from_employee(created, workload),
    )))
}

// ==================== GET ALL EMPLOYEES ====================

pub async fn get_all_employees(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let employees: Vec<Employee> = sqlx::query_as("SELECT * FROM employees ORDER BY id ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    let mut response = Vec::with_capacity(employees.len());
    for employee in employees {
        let workload = current_workload(&app_state.db_pool, employee.id).await?;
        response.push(EmployeeResponse::from_employee(employee, workload));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

// ==================== WORKLOAD SNAPSHOT ====================

pub async fn get_employee_workload(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let employee_id = path.into_inner();

    let employee: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    let employee = employee.ok_or_else(|| ApiError::employee_not_found(employee_id))?;

    let pending = count_by_status(&app_state.db_pool, employee_id, "pending").await?;
    let in_progress = count_by_status(&app_state.db_pool, employee_id, "in_progress").await?;
    let completed = count_by_status(&app_state.db_pool, employee_id, "completed").await?;

    let workload = EmployeeWorkload {
        employee_id,
        employee_name: employee.name,
        pending_services: pending,
        in_progress_services: in_progress,
        completed_services: completed,
        total_workload: pending + in_progress,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(workload)))
}

// ==================== UPDATE ACTIVE FLAG ====================

pub async fn update_employee_status(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    status_update: web::Json<UpdateEmployeeStatusRequest>,
) -> ApiResult<HttpResponse> {
    let employee_id = path.into_inner();

    let existing: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    if existing.is_none() {
        return Err(ApiError::employee_not_found(employee_id));
    }

    sqlx::query("UPDATE employees SET active = ? WHERE id = ?")
        .bind(status_update.active)
        .bind(employee_id)
        .execute(&app_state.db_pool)
        .await?;

    let updated: Employee = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_one(&app_state.db_pool)
        .await?;

    let workload = current_workload(&app_state.db_pool, employee_id).await?;

    info!(
        "Employee {} marked {}",
        employee_id,
        if updated.active { "active" } else { "inactive" }
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        EmployeeResponse::from_employee(updated, workload),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_employee, insert_vehicle, test_state};
    use actix_web::http::StatusCode;

    #[actix_rt::test]
    async fn test_new_employee_has_zero_workload() {
        let state = test_state().await;

        let response = create_employee(
            state.clone(),
            web::Json(CreateEmployeeRequest {
                name: "Jane".to_string(),
                position: "washer".to_string(),
                shift: "morning".to_string(),
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let workload = current_workload(&state.db_pool, 1).await.unwrap();
        assert_eq!(workload, 0);
    }

    #[actix_rt::test]
    async fn test_workload_counts_only_open_services() {
        let state = test_state().await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;

        for status in ["pending", "in_progress", "completed", "cancelled"] {
            sqlx::query(
                "INSERT INTO services \
                 (vehicle_id, employee_id, service_type_id, service_type, status, start_time, total_cost) \
                 VALUES (?, ?, 1, 'Basic Wash', ?, ?, 20.0)",
            )
            .bind(vehicle_id)
            .bind(employee_id)
            .bind(status)
            .bind(chrono::Utc::now())
            .execute(&state.db_pool)
            .await
            .unwrap();
        }

        let workload = current_workload(&state.db_pool, employee_id).await.unwrap();
        assert_eq!(workload, 2);

        // Breakdown counts each status separately
        assert_eq!(count_by_status(&state.db_pool, employee_id, "pending").await.unwrap(), 1);
        assert_eq!(count_by_status(&state.db_pool, employee_id, "completed").await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn test_workload_for_unknown_employee_is_not_found() {
        let state = test_state().await;
        let err = get_employee_workload(state, web::Path::from(9999i64))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn test_update_active_flag() {
        let state = test_state().await;
        let employee_id = insert_employee(&state.db_pool, "Ana").await;

        update_employee_status(
            state.clone(),
            web::Path::from(employee_id),
            web::Json(UpdateEmployeeStatusRequest { active: false }),
        )
        .await
        .unwrap();

        let row: Employee = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
            .bind(employee_id)
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert!(!row.active);
    }
}
