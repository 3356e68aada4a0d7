// src/main.rs
use actix_web::{middleware::Logger, web, App, HttpResponse, HttpServer};
use actix_cors::Cors;
use actix_web::http::header;
use anyhow::Context;
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Module declarations
mod config;
mod db;
mod employee_handlers;
mod error;
mod handlers;
mod inventory_handlers;
mod models;
mod report_handlers;
mod service_handlers;
mod vehicle_handlers;

#[cfg(test)]
mod test_support;

use config::{load_config, Config};
use handlers::get_dashboard_stats;

pub struct AppState {
    pub db_pool: SqlitePool,
    pub config: Config,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration (this calls load_env_file internally)
    let config = load_config()?;

    setup_logging(&config)?;

    if config.is_production() {
        validate_production_config(&config)?;
    }

    setup_database(&config.database.url).await?;

    let pool = create_database_pool(&config.database).await?;

    db::run_migrations(&pool).await?;
    db::seed_service_types(&pool).await?;

    let app_state = Arc::new(AppState {
        db_pool: pool,
        config: config.clone(),
    });

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    log::info!("Starting server at http://{}", bind_address);

    let workers = config.server.workers;
    let mut server = HttpServer::new(move || {
        let cors = setup_cors(&config.security.allowed_origins, config.is_production());
        let json_config = web::JsonConfig::default().limit(config.security.max_request_size);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(app_state.clone()))
            .app_data(json_config)

            // Health check (no wrapper payload)
            .service(
                web::scope("/health")
                    .route("", web::get().to(|| async { HttpResponse::Ok().body("OK") }))
            )

            // Vehicles
            .service(
                web::scope("/api/vehicles")
                    .route("", web::post().to(vehicle_handlers::create_vehicle))
                    .route("", web::get().to(vehicle_handlers::get_all_vehicles))
                    .route("/{plate_number}", web::get().to(vehicle_handlers::get_vehicle_by_plate))
            )

            // Employees
            .service(
                web::scope("/api/employees")
                    .route("", web::post().to(employee_handlers::create_employee))
                    .route("", web::get().to(employee_handlers::get_all_employees))
                    .route("/{id}/workload", web::get().to(employee_handlers::get_employee_workload))
                    .route("/{id}/status", web::patch().to(employee_handlers::update_employee_status))
            )

            // Services (fixed segments registered before parameterized ones)
            .service(
                web::scope("/api/services")
                    .route("", web::post().to(service_handlers::create_service))
                    .route("", web::get().to(service_handlers::get_all_services))
                    .route("/pending", web::get().to(service_handlers::get_pending_services))
                    .route("/types", web::get().to(service_handlers::get_service_types))
                    .route("/types", web::post().to(service_handlers::create_service_type))
                    .route("/{id}/status", web::patch().to(service_handlers::update_service_status))
                    .route("/{id}/supplies", web::post().to(inventory_handlers::record_supply_usage))
                    .route("/{id}/supplies", web::get().to(inventory_handlers::get_service_supplies))
            )

            // Inventory
            .service(
                web::scope("/api/inventory")
                    .route("", web::post().to(inventory_handlers::create_supply))
                    .route("", web::get().to(inventory_handlers::get_all_supplies))
                    .route("/low-stock", web::get().to(inventory_handlers::get_low_stock_supplies))
            )

            // Reports
            .service(
                web::scope("/api/reports")
                    .route("/dashboard-stats", web::get().to(get_dashboard_stats))
                    .route("/daily-income", web::get().to(report_handlers::get_daily_income))
                    .route("/average-service-time", web::get().to(report_handlers::get_average_service_time))
                    .route("/vehicle-history/{plate_number}", web::get().to(report_handlers::get_vehicle_history))
            )
    });

    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)?
        .run()
        .await
        .context("Server failed to run")?;

    Ok(())
}

// ==================== HELPER FUNCTIONS ====================

fn setup_logging(config: &Config) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.logging.level.as_str()));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

fn validate_production_config(config: &Config) -> anyhow::Result<()> {
    if config.security.allowed_origins.contains(&"*".to_string()) {
        anyhow::bail!("Wildcard CORS origins not allowed in production!");
    }

    Ok(())
}

async fn setup_database(database_url: &str) -> anyhow::Result<()> {
    if !Sqlite::database_exists(database_url).await.unwrap_or(false) {
        log::info!("Creating database: {}", database_url);
        Sqlite::create_database(database_url).await?;
    }
    Ok(())
}

async fn create_database_pool(db_config: &config::DatabaseConfig) -> anyhow::Result<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(db_config.max_connections)
        .min_connections(db_config.min_connections)
        .acquire_timeout(Duration::from_secs(db_config.connect_timeout))
        .idle_timeout(Duration::from_secs(db_config.idle_timeout))
        .connect(&db_config.url)
        .await
        .with_context(|| format!("Failed to connect to database: {}", db_config.url))?;

    Ok(pool)
}

fn setup_cors(allowed_origins: &[String], is_production: bool) -> Cors {
    let mut cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if allowed_origins.contains(&"*".to_string()) {
        if is_production {
            panic!("Cannot start server with wildcard CORS in production");
        }
        log::warn!("Using wildcard CORS (*) in development mode");
        cors = cors.allow_any_origin().allow_any_header().allow_any_method();
    } else {
        for origin in allowed_origins {
            if origin.is_empty() {
                continue;
            }
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}
