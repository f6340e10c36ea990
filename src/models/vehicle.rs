//! Vehicle and telemetry models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::de;

/// Vehicle body type. Unknown values are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleType {
    Car,
    Bike,
    Truck,
    Van,
    Other(String),
}

impl VehicleType {
    pub fn as_str(&self) -> &str {
        match self {
            VehicleType::Car => "CAR",
            VehicleType::Bike => "BIKE",
            VehicleType::Truck => "TRUCK",
            VehicleType::Van => "VAN",
            VehicleType::Other(raw) => raw,
        }
    }
}

impl From<String> for VehicleType {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "CAR" => VehicleType::Car,
            "BIKE" => VehicleType::Bike,
            "TRUCK" => VehicleType::Truck,
            "VAN" => VehicleType::Van,
            _ => VehicleType::Other(value),
        }
    }
}

impl From<VehicleType> for String {
    fn from(value: VehicleType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VehicleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational status. The backend also emits values outside the documented
/// set (e.g. `BOOKED`), which land in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VehicleStatus {
    Available,
    InUse,
    Maintenance,
    OutOfService,
    Other(String),
}

impl VehicleStatus {
    pub fn as_str(&self) -> &str {
        match self {
            VehicleStatus::Available => "AVAILABLE",
            VehicleStatus::InUse => "IN_USE",
            VehicleStatus::Maintenance => "MAINTENANCE",
            VehicleStatus::OutOfService => "OUT_OF_SERVICE",
            VehicleStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for VehicleStatus {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "AVAILABLE" => VehicleStatus::Available,
            "IN_USE" => VehicleStatus::InUse,
            "MAINTENANCE" => VehicleStatus::Maintenance,
            "OUT_OF_SERVICE" => VehicleStatus::OutOfService,
            _ => VehicleStatus::Other(value),
        }
    }
}

impl From<VehicleStatus> for String {
    fn from(value: VehicleStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle record from `/vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub vehicle_number: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub model: String,
    #[serde(default, rename = "type")]
    pub vehicle_type: Option<VehicleType>,
    #[serde(default)]
    pub status: Option<VehicleStatus>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    /// km/h
    #[serde(default)]
    pub speed: Option<f64>,
    /// Percentage (0-100), electric vehicles
    #[serde(default)]
    pub battery_level: Option<f64>,
    /// Percentage (0-100)
    #[serde(default)]
    pub fuel_level: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_datetime", skip_serializing)]
    pub last_updated: Option<NaiveDateTime>,
}

/// The single energy reading shown for a vehicle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gauge {
    Battery(f64),
    Fuel(f64),
}

impl Gauge {
    pub fn label(&self) -> &'static str {
        match self {
            Gauge::Battery(_) => "Battery",
            Gauge::Fuel(_) => "Fuel",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Gauge::Battery(_) => "🔋",
            Gauge::Fuel(_) => "⛽",
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Gauge::Battery(level) | Gauge::Fuel(level) => *level,
        }
    }
}

impl Vehicle {
    /// Battery takes precedence when both levels are reported; `None` when neither is.
    pub fn gauge(&self) -> Option<Gauge> {
        match (self.battery_level, self.fuel_level) {
            (Some(battery), _) => Some(Gauge::Battery(battery)),
            (None, Some(fuel)) => Some(Gauge::Fuel(fuel)),
            (None, None) => None,
        }
    }

    /// Both coordinates, or nothing
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }
}

/// Body of `POST /vehicles`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVehicle {
    pub vehicle_number: String,
    pub model: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub battery_level: Option<f64>,
    pub fuel_level: Option<f64>,
}
