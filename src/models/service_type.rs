// src/models/service_type.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== SERVICE TYPE ====================

/// Catalog entry describing a kind of wash and its expected base duration
/// in minutes. Read-mostly reference data.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct ServiceType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub base_duration: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateServiceTypeRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    #[validate(range(min = 1, message = "Base duration must be at least 1 minute"))]
    pub base_duration: i64,
}
