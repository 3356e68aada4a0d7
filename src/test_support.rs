// src/test_support.rs
//! Shared helpers for handler tests: an in-memory database with the full
//! schema and seeded catalog, wrapped in the same state the server uses.

use actix_web::web;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::config::Config;
use crate::AppState;

/// A fresh in-memory database per test. The pool is capped at a single
/// connection: every in-memory SQLite connection is its own database, so a
/// wider pool would scatter the schema across empty databases.
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool")
}

pub async fn test_state() -> web::Data<Arc<AppState>> {
    let pool = memory_pool().await;
    crate::db::run_migrations(&pool).await.expect("migrations");
    crate::db::seed_service_types(&pool).await.expect("seed");

    web::Data::new(Arc::new(AppState {
        db_pool: pool,
        config: Config::default(),
    }))
}

/// Insert an employee directly, returning its id.
pub async fn insert_employee(pool: &SqlitePool, name: &str) -> i64 {
    sqlx::query("INSERT INTO employees (name, position, shift) VALUES (?, 'washer', 'morning')")
        .bind(name)
        .execute(pool)
        .await
        .unwrap()
        .last_insert_rowid()
}

/// Insert a vehicle directly, returning its id.
pub async fn insert_vehicle(pool: &SqlitePool, plate: &str) -> i64 {
    sqlx::query(
        "INSERT INTO vehicles (plate_number, vehicle_type, client_name, client_phone) \
         VALUES (?, 'car', 'Jane Doe', '555-0101')",
    )
    .bind(plate)
    .execute(pool)
    .await
    .unwrap()
    .last_insert_rowid()
}
