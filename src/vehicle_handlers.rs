// src/vehicle_handlers.rs
//! Vehicle registration and lookup

use actix_web::{web, HttpResponse};
use log::info;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{CreateVehicleRequest, Vehicle, VehicleType};
use crate::AppState;

// ==================== CREATE VEHICLE ====================

pub async fn create_vehicle(
    app_state: web::Data<Arc<AppState>>,
    vehicle: web::Json<CreateVehicleRequest>,
) -> ApiResult<HttpResponse> {
    vehicle.validate()?;

    if !VehicleType::is_valid(&vehicle.vehicle_type) {
        return Err(ApiError::invalid_vehicle_type(&vehicle.vehicle_type));
    }

    // Plate numbers are globally unique
    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM vehicles WHERE plate_number = ?",
    )
    .bind(&vehicle.plate_number)
    .fetch_optional(&app_state.db_pool)
    .await?;

    if existing.is_some() {
        return Err(ApiError::plate_already_registered(&vehicle.plate_number));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO vehicles (plate_number, vehicle_type, client_name, client_phone)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&vehicle.plate_number)
    .bind(vehicle.vehicle_type.to_lowercase())
    .bind(&vehicle.client_name)
    .bind(&vehicle.client_phone)
    .execute(&app_state.db_pool)
    .await?;

    let created: Vehicle = sqlx::query_as("SELECT * FROM vehicles WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Registered vehicle {} ({})", created.plate_number, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== GET ALL VEHICLES ====================

pub async fn get_all_vehicles(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let vehicles: Vec<Vehicle> = sqlx::query_as("SELECT * FROM vehicles ORDER BY id ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(vehicles)))
}

// ==================== GET VEHICLE BY PLATE ====================

pub async fn get_vehicle_by_plate(
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

    match vehicle {
        Some(v) => Ok(HttpResponse::Ok().json(ApiResponse::success(v))),
        None => Err(ApiError::plate_not_found(&plate_number)),
    }
}
