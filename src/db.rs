// src/db.rs - Database migrations and setup

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // Enable foreign keys and WAL mode
    sqlx::query("PRAGMA foreign_keys = ON")
        .execute(pool)
        .await?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(pool)
        .await?;

    // Registered vehicles
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            plate_number TEXT NOT NULL UNIQUE CHECK(length(plate_number) > 0 AND length(plate_number) <= 20),
            vehicle_type TEXT NOT NULL CHECK(
                vehicle_type IN ('car', 'suv', 'truck', 'motorcycle')
            ),
            client_name TEXT NOT NULL CHECK(length(client_name) > 0 AND length(client_name) <= 255),
            client_phone TEXT NOT NULL CHECK(length(client_phone) > 0 AND length(client_phone) <= 50)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Staff
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL CHECK(length(name) > 0 AND length(name) <= 255),
            position TEXT NOT NULL CHECK(length(position) > 0 AND length(position) <= 100),
            shift TEXT NOT NULL CHECK(length(shift) > 0 AND length(shift) <= 50),
            active INTEGER NOT NULL DEFAULT 1 CHECK(active IN (0, 1))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Service catalog: base_duration is the expected duration in minutes
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS service_types (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK(length(name) > 0 AND length(name) <= 255),
            description TEXT CHECK(description IS NULL OR length(description) <= 1000),
            base_duration INTEGER NOT NULL CHECK(base_duration > 0),
            created_at DATETIME NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Service orders. service_type keeps a copy of the catalog name taken
    // at creation; end_time stays NULL until the order is completed.
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS services (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            vehicle_id INTEGER NOT NULL,
            employee_id INTEGER NOT NULL,
            service_type_id INTEGER NOT NULL,
            service_type TEXT NOT NULL,
            status TEXT NOT NULL DEFAULT 'pending' CHECK(
                status IN ('pending', 'in_progress', 'completed', 'cancelled')
            ),
            start_time DATETIME NOT NULL,
            end_time DATETIME,
            total_cost REAL NOT NULL CHECK(total_cost >= 0),
            notes TEXT CHECK(notes IS NULL OR length(notes) <= 1000),
            FOREIGN KEY (vehicle_id) REFERENCES vehicles (id),
            FOREIGN KEY (employee_id) REFERENCES employees (id),
            FOREIGN KEY (service_type_id) REFERENCES service_types (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Consumables; stock levels are fractional quantities
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS supplies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE CHECK(length(name) > 0 AND length(name) <= 255),
            description TEXT CHECK(description IS NULL OR length(description) <= 1000),
            current_stock REAL NOT NULL CHECK(current_stock >= 0),
            minimum_stock REAL NOT NULL CHECK(minimum_stock >= 0),
            unit TEXT NOT NULL CHECK(length(unit) > 0 AND length(unit) <= 20)
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Per-service consumption records
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS used_supplies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            service_id INTEGER NOT NULL,
            supply_id INTEGER NOT NULL,
            quantity REAL NOT NULL CHECK(quantity > 0),
            FOREIGN KEY (service_id) REFERENCES services (id) ON DELETE CASCADE,
            FOREIGN KEY (supply_id) REFERENCES supplies (id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_vehicle ON services (vehicle_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_services_employee_status ON services (employee_id, status)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Insert the default wash catalog on first run. The catalog is reference
/// data the rest of the system expects to exist; an already-populated table
/// is left untouched.
pub async fn seed_service_types(pool: &SqlitePool) -> Result<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM service_types")
        .fetch_one(pool)
        .await?;

    if count.0 > 0 {
        return Ok(());
    }

    let defaults: [(&str, &str, i64); 4] = [
        ("Basic Wash", "Exterior wash and hand dry", 30),
        ("Full Wash", "Exterior wash plus interior vacuum and wipe-down", 60),
        ("Wax & Polish", "Hand wax and machine polish", 45),
        ("Premium Detail", "Complete interior and exterior detailing", 120),
    ];

    let now = Utc::now();
    for (name, description, base_duration) in defaults {
        sqlx::query(
            "INSERT INTO service_types (name, description, base_duration, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(name)
        .bind(description)
        .bind(base_duration)
        .bind(now)
        .execute(pool)
        .await?;
    }

    log::info!("Seeded {} default service types", defaults.len());
    Ok(())
}
