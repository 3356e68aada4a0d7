// src/service_handlers.rs
//! Service order lifecycle and the wash catalog

use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{
    CreateServiceRequest, CreateServiceTypeRequest, Employee, EmployeeSummary, Service,
    ServiceResponse, ServiceStatus, ServiceType, UpdateServiceStatusRequest, Vehicle,
    VehicleSummary,
};
use crate::AppState;

/// Cost stamped on every new order. Pricing is not derived from the catalog
/// yet; the placeholder keeps revenue reports populated until it is wired up.
pub const DEFAULT_SERVICE_COST: f64 = 20.0;

async fn to_response(pool: &sqlx::SqlitePool, service: Service) -> ApiResult<ServiceResponse> {
    let vehicle: Vehicle = sqlx::query_as("SELECT * FROM vehicles WHERE id = ?")
        .bind(service.vehicle_id)
        .fetch_one(pool)
        .await?;

    let employee: Employee = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(service.employee_id)
        .fetch_one(pool)
        .await?;

    Ok(ServiceResponse {
        id: service.id,
        vehicle: VehicleSummary {
            plate_number: vehicle.plate_number,
            client_name: vehicle.client_name,
        },
        employee: EmployeeSummary { name: employee.name },
        service_type: service.service_type,
        status: service.status,
        start_time: service.start_time,
        end_time: service.end_time,
    })
}

// ==================== CREATE SERVICE ====================

pub async fn create_service(
    app_state: web::Data<Arc<AppState>>,
    service: web::Json<CreateServiceRequest>,
) -> ApiResult<HttpResponse> {
    service.validate()?;

    let vehicle: Option<Vehicle> = sqlx::query_as("SELECT * FROM vehicles WHERE id = ?")
        .bind(service.vehicle_id)
        .fetch_optional(&app_state.db_pool)
        .await?;
    let vehicle = vehicle.ok_or_else(|| ApiError::vehicle_not_found(service.vehicle_id))?;

    let employee: Option<Employee> = sqlx::query_as("SELECT * FROM employees WHERE id = ?")
        .bind(service.employee_id)
        .fetch_optional(&app_state.db_pool)
        .await?;
    let employee = employee.ok_or_else(|| ApiError::employee_not_found(service.employee_id))?;

    let service_type: Option<ServiceType> =
        sqlx::query_as("SELECT * FROM service_types WHERE id = ?")
            .bind(service.service_type_id)
            .fetch_optional(&app_state.db_pool)
            .await?;
    let service_type =
        service_type.ok_or_else(|| ApiError::service_type_not_found(service.service_type_id))?;

    let now = Utc::now();
    let result = sqlx::query(
        r#"
        INSERT INTO services
            (vehicle_id, employee_id, service_type_id, service_type, status, start_time, total_cost, notes)
        VALUES (?, ?, ?, ?, 'pending', ?, ?, ?)
        "#,
    )
    .bind(service.vehicle_id)
    .bind(service.employee_id)
    .bind(service.service_type_id)
    .bind(&service_type.name)
    .bind(now)
    .bind(DEFAULT_SERVICE_COST)
    .bind(&service.notes)
    .execute(&app_state.db_pool)
    .await?;

    let service_id = result.last_insert_rowid();

    info!(
        "Created service order {} ({} for {})",
        service_id, service_type.name, vehicle.plate_number
    );

    let response = ServiceResponse {
        id: service_id,
        vehicle: VehicleSummary {
            plate_number: vehicle.plate_number,
            client_name: vehicle.client_name,
        },
        employee: EmployeeSummary { name: employee.name },
        service_type: service_type.name,
        status: ServiceStatus::Pending.to_string(),
        start_time: now,
        end_time: None,
    };

    Ok(HttpResponse::Created().json(ApiResponse::success(response)))
}

// ==================== LIST SERVICES ====================

pub async fn get_all_services(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let services: Vec<Service> = sqlx::query_as("SELECT * FROM services ORDER BY id ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    let mut response = Vec::with_capacity(services.len());
    for service in services {
        response.push(to_response(&app_state.db_pool, service).await?);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

pub async fn get_pending_services(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let services: Vec<Service> = sqlx::query_as(
        "SELECT * FROM services WHERE status = 'pending' ORDER BY id ASC",
    )
    .fetch_all(&app_state.db_pool)
    .await?;

    let mut response = Vec::with_capacity(services.len());
    for service in services {
        response.push(to_response(&app_state.db_pool, service).await?);
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

// ==================== UPDATE STATUS ====================

/// Statuses move freely between the four accepted values; there is no
/// transition graph. Completion stamps the end time, and re-completing
/// re-stamps it.
pub async fn update_service_status(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    status_update: web::Json<UpdateServiceStatusRequest>,
) -> ApiResult<HttpResponse> {
    let service_id = path.into_inner();

    let existing: Option<Service> = sqlx::query_as("SELECT * FROM services WHERE id = ?")
        .bind(service_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    if existing.is_none() {
        return Err(ApiError::service_not_found(service_id));
    }

    let status = ServiceStatus::parse(&status_update.status)
        .ok_or_else(|| ApiError::invalid_status(&status_update.status))?;

    if status == ServiceStatus::Completed {
        sqlx::query("UPDATE services SET status = ?, end_time = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Utc::now())
            .bind(service_id)
            .execute(&app_state.db_pool)
            .await?;
    } else {
        sqlx::query("UPDATE services SET status = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(service_id)
            .execute(&app_state.db_pool)
            .await?;
    }

    let updated: Service = sqlx::query_as("SELECT * FROM services WHERE id = ?")
        .bind(service_id)
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Service {} moved to {}", service_id, updated.status);
    let response = to_response(&app_state.db_pool, updated).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

// ==================== SERVICE TYPE CATALOG ====================

pub async fn get_service_types(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let types: Vec<ServiceType> = sqlx::query_as("SELECT * FROM service_types ORDER BY id ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(types)))
}

pub async fn create_service_type(
    app_state: web::Data<Arc<AppState>>,
    service_type: web::Json<CreateServiceTypeRequest>,
) -> ApiResult<HttpResponse> {
    service_type.validate()?;

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM service_types WHERE LOWER(name) = LOWER(?)",
    )
    .bind(&service_type.name)
    .fetch_optional(&app_state.db_pool)
    .await?;

    if existing.is_some() {
        return Err(ApiError::service_type_already_exists(&service_type.name));
    }

    let result = sqlx::query(
        "INSERT INTO service_types (name, description, base_duration, created_at) VALUES (?, ?, ?, ?)",
    )
    .bind(&service_type.name)
    .bind(&service_type.description)
    .bind(service_type.base_duration)
    .bind(Utc::now())
    .execute(&app_state.db_pool)
    .await?;

    let created: ServiceType = sqlx::query_as("SELECT * FROM service_types WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Created service type {} ({})", created.name, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{insert_employee, insert_vehicle, test_state};
    use actix_web::http::StatusCode;

    async fn create_order(
        state: &web::Data<Arc<AppState>>,
        vehicle_id: i64,
        employee_id: i64,
    ) -> i64 {
        let response = create_service(
            state.clone(),
            web::Json(CreateServiceRequest {
                vehicle_id,
                employee_id,
                service_type_id: 1,
                notes: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let row: (i64,) = sqlx::query_as("SELECT MAX(id) FROM services")
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        row.0
    }

    #[actix_rt::test]
    async fn test_create_requires_existing_references() {
        let state = test_state().await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;

        for (v, e, t) in [
            (9999, employee_id, 1),
            (vehicle_id, 9999, 1),
            (vehicle_id, employee_id, 9999),
        ] {
            let err = create_service(
                state.clone(),
                web::Json(CreateServiceRequest {
                    vehicle_id: v,
                    employee_id: e,
                    service_type_id: t,
                    notes: None,
                }),
            )
            .await
            .unwrap_err();
            assert!(matches!(err, ApiError::NotFound(_)));
        }
    }

    #[actix_rt::test]
    async fn test_new_order_is_pending_with_no_end_time() {
        let state = test_state().await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;
        let service_id = create_order(&state, vehicle_id, employee_id).await;

        let service: Service = sqlx::query_as("SELECT * FROM services WHERE id = ?")
            .bind(service_id)
            .fetch_one(&state.db_pool)
            .await
            .unwrap();

        assert_eq!(service.status, "pending");
        assert!(service.end_time.is_none());
        assert_eq!(service.total_cost, DEFAULT_SERVICE_COST);
        assert_eq!(service.service_type, "Basic Wash");
    }

    #[actix_rt::test]
    async fn test_completion_stamps_end_time() {
        let state = test_state().await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;
        let service_id = create_order(&state, vehicle_id, employee_id).await;

        update_service_status(
            state.clone(),
            web::Path::from(service_id),
            web::Json(UpdateServiceStatusRequest { status: "in_progress".to_string() }),
        )
        .await
        .unwrap();

        let service: Service = sqlx::query_as("SELECT * FROM services WHERE id = ?")
            .bind(service_id)
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert!(service.end_time.is_none());

        update_service_status(
            state.clone(),
            web::Path::from(service_id),
            web::Json(UpdateServiceStatusRequest { status: "completed".to_string() }),
        )
        .await
        .unwrap();

        let service: Service = sqlx::query_as("SELECT * FROM services WHERE id = ?")
            .bind(service_id)
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert_eq!(service.status, "completed");
        assert!(service.end_time.is_some());
    }

    #[actix_rt::test]
    async fn test_invalid_status_leaves_the_row_unchanged() {
        let state = test_state().await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;
        let service_id = create_order(&state, vehicle_id, employee_id).await;

        let err = update_service_status(
            state.clone(),
            web::Path::from(service_id),
            web::Json(UpdateServiceStatusRequest { status: "done".to_string() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let service: Service = sqlx::query_as("SELECT * FROM services WHERE id = ?")
            .bind(service_id)
            .fetch_one(&state.db_pool)
            .await
            .unwrap();
        assert_eq!(service.status, "pending");
        assert!(service.end_time.is_none());
    }

    #[actix_rt::test]
    async fn test_status_update_for_unknown_service_is_not_found() {
        let state = test_state().await;
        let err = update_service_status(
            state,
            web::Path::from(4242i64),
            web::Json(UpdateServiceStatusRequest { status: "completed".to_string() }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn test_pending_listing_filters_by_status() {
        let state = test_state().await;
        let vehicle_id = insert_vehicle(&state.db_pool, "AAA111").await;
        let employee_id = insert_employee(&state.db_pool, "Sam").await;
        let first = create_order(&state, vehicle_id, employee_id).await;
        let _second = create_order(&state, vehicle_id, employee_id).await;

        update_service_status(
            state.clone(),
            web::Path::from(first),
            web::Json(UpdateServiceStatusRequest { status: "completed".to_string() }),
        )
        .await
        .unwrap();

        let pending: Vec<Service> =
            sqlx::query_as("SELECT * FROM services WHERE status = 'pending'")
                .fetch_all(&state.db_pool)
                .await
                .unwrap();
        assert_eq!(pending.len(), 1);
    }

    #[actix_rt::test]
    async fn test_duplicate_catalog_name_is_a_conflict() {
        let state = test_state().await;
        let err = create_service_type(
            state,
            web::Json(CreateServiceTypeRequest {
                name: "Basic Wash".to_string(),
                description: None,
                base_duration: 30,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }
}
