//! Booking models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{de, Vehicle};

/// Lifecycle of a rental request:
/// PENDING → CONFIRMED → IN_PROGRESS → COMPLETED, or CANCELLED before completion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    Other(String),
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
            BookingStatus::Other(raw) => raw,
        }
    }

    /// Customers may only withdraw requests that have not started
    pub fn is_cancellable(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.to_uppercase().as_str() {
            "PENDING" => BookingStatus::Pending,
            "CONFIRMED" => BookingStatus::Confirmed,
            "IN_PROGRESS" => BookingStatus::InProgress,
            "COMPLETED" => BookingStatus::Completed,
            "CANCELLED" => BookingStatus::Cancelled,
            _ => BookingStatus::Other(value),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(value: BookingStatus) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking record from `/bookings/my-bookings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    /// Snapshot of the booked vehicle at fetch time
    #[serde(default)]
    pub vehicle: Option<Vehicle>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub start_time: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub end_time: Option<NaiveDateTime>,
    #[serde(default)]
    pub pickup_location: Option<String>,
    #[serde(default)]
    pub drop_location: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
    #[serde(default)]
    pub status: Option<BookingStatus>,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub actual_cost: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub booking_time: Option<NaiveDateTime>,
}

impl Booking {
    pub fn can_cancel(&self) -> bool {
        self.status
            .as_ref()
            .map(BookingStatus::is_cancellable)
            .unwrap_or(false)
    }
}

/// Body of `POST /bookings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub vehicle_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub pickup_location: String,
    pub drop_location: String,
    pub remarks: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_pending_and_confirmed_are_cancellable() {
        assert!(BookingStatus::Pending.is_cancellable());
        assert!(BookingStatus::Confirmed.is_cancellable());
        assert!(!BookingStatus::InProgress.is_cancellable());
        assert!(!BookingStatus::Completed.is_cancellable());
        assert!(!BookingStatus::Cancelled.is_cancellable());
        assert!(!BookingStatus::Other("ON_HOLD".to_string()).is_cancellable());
    }

    #[test]
    fn test_booking_without_status_is_not_cancellable() {
        let booking: Booking = serde_json::from_str(r#"{"id": 3}"#).unwrap();
        assert!(!booking.can_cancel());
        assert!(booking.vehicle.is_none());
    }

    #[test]
    fn test_decode_backend_booking() {
        let json = r#"{
            "id": 12,
            "vehicle": {"id": 4, "vehicleNumber": "MH-12-CD-5678", "model": "Swift", "type": "CAR", "status": "BOOKED"},
            "bookingTime": "2024-01-01T09:12:44.123",
            "startTime": "2024-01-01T10:00:00",
            "endTime": "2024-01-02T16:00:00",
            "status": "CONFIRMED",
            "pickupLocation": "Latur Bus Stand",
            "dropLocation": "Pune Station",
            "estimatedCost": 625.0,
            "actualCost": null,
            "remarks": null
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();

        assert_eq!(booking.status, Some(BookingStatus::Confirmed));
        assert!(booking.can_cancel());
        assert_eq!(booking.vehicle.as_ref().unwrap().model, "Swift");
        assert_eq!(booking.estimated_cost, Some(625.0));
        assert!(booking.actual_cost.is_none());
        assert!(booking.start_time.is_some() && booking.booking_time.is_some());
    }

    #[test]
    fn test_new_booking_wire_shape() {
        let body = NewBooking {
            vehicle_id: 4,
            start_time: super::super::parse_datetime("2024-01-01T10:00").unwrap(),
            end_time: super::super::parse_datetime("2024-01-02T10:00").unwrap(),
            pickup_location: "A".to_string(),
            drop_location: "B".to_string(),
            remarks: String::new(),
        };
        let value = serde_json::to_value(&body).unwrap();

        assert_eq!(value["vehicleId"], 4);
        assert_eq!(value["startTime"], "2024-01-01T10:00:00");
        assert_eq!(value["dropLocation"], "B");
    }
}
