// src/models/vehicle.rs
use serde::{Deserialize, Serialize};
use validator::Validate;

// ==================== VEHICLE TYPE ====================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleType {
    Car,
    Suv,
    Truck,
    Motorcycle,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Suv => "suv",
            VehicleType::Truck => "truck",
            VehicleType::Motorcycle => "motorcycle",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "car" => Some(VehicleType::Car),
            "suv" => Some(VehicleType::Suv),
            "truck" => Some(VehicleType::Truck),
            "motorcycle" => Some(VehicleType::Motorcycle),
            _ => None,
        }
    }

    pub fn is_valid(s: &str) -> bool {
        Self::parse(s).is_some()
    }
}

impl std::fmt::Display for VehicleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==================== VEHICLE ====================

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: String,
    pub vehicle_type: String,
    pub client_name: String,
    pub client_phone: String,
}

#[derive(Debug, Deserialize, Validate, Clone)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 1, max = 20, message = "Plate number must be between 1 and 20 characters"))]
    pub plate_number: String,

    pub vehicle_type: String,

    #[validate(length(min = 1, max = 255, message = "Client name must be between 1 and 255 characters"))]
    pub client_name: String,

    #[validate(length(min = 1, max = 50, message = "Client phone must be between 1 and 50 characters"))]
    pub client_phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_parse() {
        assert_eq!(VehicleType::parse("car"), Some(VehicleType::Car));
        assert_eq!(VehicleType::parse("SUV"), Some(VehicleType::Suv));
        assert_eq!(VehicleType::parse("truck"), Some(VehicleType::Truck));
        assert_eq!(VehicleType::parse("motorcycle"), Some(VehicleType::Motorcycle));
        assert_eq!(VehicleType::parse("boat"), None);
        assert_eq!(VehicleType::parse(""), None);
    }

    #[test]
    fn test_vehicle_type_round_trip() {
        for t in [VehicleType::Car, VehicleType::Suv, VehicleType::Truck, VehicleType::Motorcycle] {
            assert_eq!(VehicleType::parse(t.as_str()), Some(t));
        }
    }
}
