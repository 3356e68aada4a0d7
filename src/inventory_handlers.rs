// src/inventory_handlers.rs
//! Supply inventory and per-service consumption tracking

use actix_web::{web, HttpResponse};
use log::info;
use std::sync::Arc;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::ApiResponse;
use crate::models::{CreateSupplyRequest, RecordUsageRequest, Supply, UsedSupplyDetail};
use crate::AppState;

// ==================== CREATE SUPPLY ====================

pub async fn create_supply(
    app_state: web::Data<Arc<AppState>>,
    supply: web::Json<CreateSupplyRequest>,
) -> ApiResult<HttpResponse> {
    supply.validate()?;

    let existing: Option<(i64,)> = sqlx::query_as(
        "SELECT id FROM supplies WHERE LOWER(name) = LOWER(?)",
    )
    .bind(&supply.name)
    .fetch_optional(&app_state.db_pool)
    .await?;

    if existing.is_some() {
        return Err(ApiError::supply_already_exists(&supply.name));
    }

    let result = sqlx::query(
        r#"
        INSERT INTO supplies (name, description, current_stock, minimum_stock, unit)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&supply.name)
    .bind(&supply.description)
    .bind(supply.current_stock)
    .bind(supply.minimum_stock)
    .bind(&supply.unit)
    .execute(&app_state.db_pool)
    .await?;

    let created: Supply = sqlx::query_as("SELECT * FROM supplies WHERE id = ?")
        .bind(result.last_insert_rowid())
        .fetch_one(&app_state.db_pool)
        .await?;

    info!("Created supply {} ({})", created.name, created.id);
    Ok(HttpResponse::Created().json(ApiResponse::success(created)))
}

// ==================== LIST SUPPLIES ====================

pub async fn get_all_supplies(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let supplies: Vec<Supply> = sqlx::query_as("SELECT * FROM supplies ORDER BY name ASC")
        .fetch_all(&app_state.db_pool)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(supplies)))
}

pub async fn get_low_stock_supplies(
    app_state: web::Data<Arc<AppState>>,
) -> ApiResult<HttpResponse> {
    let supplies: Vec<Supply> = sqlx::query_as(
        "SELECT * FROM supplies WHERE current_stock <= minimum_stock ORDER BY name ASC",
    )
    .fetch_all(&app_state.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(supplies)))
}

// ==================== CONSUMPTION ====================

/// Record a supply being consumed by a service: one usage row plus a stock
/// decrement, in a single transaction.
pub async fn record_supply_usage(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
    request: web::Json<RecordUsageRequest>,
) -> ApiResult<HttpResponse> {
    let service_id = path.into_inner();
    request.validate()?;

    let service: Option<(i64,)> = sqlx::query_as("SELECT id FROM services WHERE id = ?")
        .bind(service_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    if service.is_none() {
        return Err(ApiError::service_not_found(service_id));
    }

    let supply: Option<Supply> = sqlx::query_as("SELECT * FROM supplies WHERE id = ?")
        .bind(request.supply_id)
        .fetch_optional(&app_state.db_pool)
        .await?;
    let supply = supply.ok_or_else(|| ApiError::supply_not_found(request.supply_id))?;

    if request.quantity > supply.current_stock {
        return Err(ApiError::bad_request(&format!(
            "Insufficient stock for '{}'. Available: {} {}, requested: {} {}",
            supply.name, supply.current_stock, supply.unit, request.quantity, supply.unit
        )));
    }

    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("INSERT INTO used_supplies (service_id, supply_id, quantity) VALUES (?, ?, ?)")
        .bind(service_id)
        .bind(request.supply_id)
        .bind(request.quantity)
        .execute(&mut *tx)
        .await?;

    let new_stock = (supply.current_stock - request.quantity).max(0.0);
    sqlx::query("UPDATE supplies SET current_stock = ? WHERE id = ?")
        .bind(new_stock)
        .bind(request.supply_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(
        "Service {} used {} {} of {}",
        service_id, request.quantity, supply.unit, supply.name
    );

    Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
        serde_json::json!({
            "supply_id": request.supply_id,
            "remaining_stock": new_stock,
        }),
        "Supply usage recorded".to_string(),
    )))
}

pub async fn get_service_supplies(
    app_state: web::Data<Arc<AppState>>,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let service_id = path.into_inner();

    let service: Option<(i64,)> = sqlx::query_as("SELECT id FROM services WHERE id = ?")
        .bind(service_id)
        .fetch_optional(&app_state.db_pool)
        .await?;

    if service.is_none() {
        return Err(ApiError::service_not_found(service_id));
    }

    let used: Vec<UsedSupplyDetail> = sqlx::query_as(
        r#"
        SELECT us.id, us.supply_id, s.name AS supply_name, us.quantity, s.unit
        FROM used_supplies us
        JOIN supplies s ON us.supply_id = s.id
        WHERE us.service_id = ?
        ORDER BY us.id ASC
        "#,
    )
    .bind(service_id)
    .fetch_all(&app_state.db_pool)
    .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(used)))
}
