use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    InternalServerError(String),
    ValidationError(String),
    DatabaseError(sqlx::Error),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            ApiError::DatabaseError(err) => write!(f, "Database Error: {}", err),
        }
    }
}

impl ResponseError for ApiError {
    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            success: false,
            message: self.to_string(),
        };

        match self {
            ApiError::BadRequest(_) => HttpResponse::BadRequest().json(error_response),
            ApiError::NotFound(_) => HttpResponse::NotFound().json(error_response),
            ApiError::Conflict(_) => HttpResponse::Conflict().json(error_response),
            ApiError::ValidationError(_) => HttpResponse::UnprocessableEntity().json(error_response),
            ApiError::DatabaseError(_) => HttpResponse::InternalServerError().json(error_response),
            ApiError::InternalServerError(_) => HttpResponse::InternalServerError().json(error_response),
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::ValidationError(err.to_string())
    }
}

impl ApiError {
    pub fn bad_request(msg: &str) -> Self {
        ApiError::BadRequest(msg.to_string())
    }

    pub fn vehicle_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Vehicle with ID {} not found", id))
    }

    pub fn plate_not_found(plate: &str) -> Self {
        ApiError::NotFound(format!("Vehicle with plate '{}' not found", plate))
    }

    pub fn employee_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Employee with ID {} not found", id))
    }

    pub fn service_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Service with ID {} not found", id))
    }

    pub fn service_type_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Service type with ID {} not found", id))
    }

    pub fn supply_not_found(id: i64) -> Self {
        ApiError::NotFound(format!("Supply with ID {} not found", id))
    }

    pub fn plate_already_registered(plate: &str) -> Self {
        ApiError::Conflict(format!("Vehicle with plate number '{}' is already registered", plate))
    }

    pub fn supply_already_exists(name: &str) -> Self {
        ApiError::Conflict(format!("Supply '{}' already exists", name))
    }

    pub fn service_type_already_exists(name: &str) -> Self {
        ApiError::Conflict(format!("Service type '{}' already exists", name))
    }

    pub fn invalid_status(value: &str) -> Self {
        ApiError::BadRequest(format!(
            "Invalid status '{}'. Must be: pending, in_progress, completed, or cancelled",
            value
        ))
    }

    pub fn invalid_vehicle_type(value: &str) -> Self {
        ApiError::BadRequest(format!(
            "Invalid vehicle type '{}'. Must be: car, suv, truck, or motorcycle",
            value
        ))
    }

    pub fn invalid_date(value: &str) -> Self {
        ApiError::BadRequest(format!("Invalid date '{}'. Use YYYY-MM-DD format", value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_status_code_mapping() {
        assert_eq!(
            ApiError::plate_not_found("ABC123").error_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::plate_already_registered("ABC123").error_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::invalid_status("done").error_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::ValidationError("name".into()).error_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn test_error_messages_identify_the_key() {
        let msg = ApiError::plate_already_registered("XYZ789").to_string();
        assert!(msg.contains("XYZ789"));

        let msg = ApiError::invalid_status("finished").to_string();
        assert!(msg.contains("finished"));
        assert!(msg.contains("cancelled"));
    }
}
