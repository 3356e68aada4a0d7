// src/models/supply.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== SUPPLY ====================

/// Consumable inventory item. Stock levels are fractional quantities
/// (litres of shampoo, kilograms of wax), not unit counts.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Supply {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub current_stock: f64,
    pub minimum_stock: f64,
    pub unit: String,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateSupplyRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 0.0, message = "Current stock cannot be negative"))]
    pub current_stock: f64,

    #[validate(range(min = 0.0, message = "Minimum stock cannot be negative"))]
    pub minimum_stock: f64,

    #[validate(length(min = 1, max = 20, message = "Unit must be between 1 and 20 characters"))]
    pub unit: String,
}

// ==================== USED SUPPLY ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct UsedSupply {
    pub id: i64,
    pub service_id: i64,
    pub supply_id: i64,
    pub quantity: f64,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecordUsageRequest {
    pub supply_id: i64,

    #[validate(range(min = 0.0001, message = "Quantity must be positive"))]
    pub quantity: f64,
}

/// Consumption record joined with the supply's name and unit for display.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct UsedSupplyDetail {
    pub id: i64,
    pub supply_id: i64,
    pub supply_name: String,
    pub quantity: f64,
    pub unit: String,
}
