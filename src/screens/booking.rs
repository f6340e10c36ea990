//! Available-vehicle list and the booking modal.

use chrono::NaiveDateTime;

use super::{failure, Outcome};
use crate::api::{ClientError, FleetApi};
use crate::config::BookingConfig;
use crate::models::{parse_datetime, NewBooking, Vehicle};
use crate::session::SessionContext;
use crate::ui;

const FALLBACK: &str = "Failed to create booking";
pub const SUCCESS_MESSAGE: &str = "Booking created successfully! Waiting for admin approval.";

/// Advisory price shown before submitting; the server computes the real one
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimate {
    pub days: f64,
    pub amount: f64,
}

/// `days = max(1, |end - start| in hours / 24)`, `amount = days * daily_rate`
pub fn estimate_cost(start: NaiveDateTime, end: NaiveDateTime, daily_rate: f64) -> CostEstimate {
    let hours = (end - start).num_seconds().abs() as f64 / 3600.0;
    let days = (hours / 24.0).max(1.0);
    CostEstimate {
        days,
        amount: days * daily_rate,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub pickup_location: String,
    pub drop_location: String,
    pub remarks: String,
}

impl BookingForm {
    /// Checks run in a fixed order and the first failure wins
    pub fn validate(&self, vehicle_id: i64) -> Result<NewBooking, ClientError> {
        let (Some(start_time), Some(end_time)) = (self.start_time, self.end_time) else {
            return Err(ClientError::Validation(
                "Please select start and end time".to_string(),
            ));
        };
        if end_time <= start_time {
            return Err(ClientError::Validation(
                "End time must be after start time".to_string(),
            ));
        }
        let pickup = self.pickup_location.trim();
        let drop = self.drop_location.trim();
        if pickup.is_empty() || drop.is_empty() {
            return Err(ClientError::Validation(
                "Please enter pickup and drop locations".to_string(),
            ));
        }

        Ok(NewBooking {
            vehicle_id,
            start_time,
            end_time,
            pickup_location: pickup.to_string(),
            drop_location: drop.to_string(),
            remarks: self.remarks.trim().to_string(),
        })
    }
}

/// Booking dialog scoped to one vehicle.
///
/// `submit` borrows the modal mutably for the whole request, so a second
/// submit cannot start while one is in flight.
#[derive(Debug)]
pub struct BookingModal {
    vehicle: Vehicle,
    pub form: BookingForm,
    daily_rate: f64,
    currency: String,
    estimate: Option<CostEstimate>,
    error: Option<String>,
    open: bool,
}

impl BookingModal {
    pub fn open(vehicle: Vehicle, pricing: &BookingConfig) -> Self {
        Self {
            vehicle,
            form: BookingForm::default(),
            daily_rate: pricing.daily_rate,
            currency: pricing.currency.clone(),
            estimate: None,
            error: None,
            open: true,
        }
    }

    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn estimate(&self) -> Option<CostEstimate> {
        self.estimate
    }

    /// `₹625.00`, once both times are set
    pub fn estimate_display(&self) -> Option<String> {
        self.estimate
            .map(|e| ui::format_money(&self.currency, e.amount))
    }

    /// Accepts `datetime-local` style input; anything unparseable clears the field
    pub fn set_start_time(&mut self, value: &str) {
        self.form.start_time = parse_datetime(value);
        self.recompute();
    }

    pub fn set_end_time(&mut self, value: &str) {
        self.form.end_time = parse_datetime(value);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.estimate = match (self.form.start_time, self.form.end_time) {
            (Some(start), Some(end)) => Some(estimate_cost(start, end, self.daily_rate)),
            _ => None,
        };
    }

    /// Validate, then POST the booking. Success closes the modal; any failure
    /// leaves it open with the message set.
    pub async fn submit(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Outcome {
        if !self.open {
            return Outcome::Failed("Booking window is closed".to_string());
        }

        let booking = match self.form.validate(self.vehicle.id) {
            Ok(booking) => booking,
            Err(e) => {
                let message = e.user_message(FALLBACK);
                self.error = Some(message.clone());
                return Outcome::Failed(message);
            }
        };
        self.error = None;

        let result = match session.token() {
            Ok(token) => api.create_booking(token, &booking).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(created) => {
                tracing::info!(booking_id = created.id, vehicle_id = self.vehicle.id, "Booking created");
                self.open = false;
                Outcome::Done(SUCCESS_MESSAGE.to_string())
            }
            Err(e) => {
                tracing::warn!(vehicle_id = self.vehicle.id, error = %e, "Booking failed");
                let message = e.user_message(FALLBACK);
                self.error = Some(message.clone());
                failure(session, &e, message)
            }
        }
    }
}

/// Customer's list of bookable vehicles
#[derive(Debug, Default)]
pub struct AvailableVehicles {
    vehicles: Vec<Vehicle>,
    modal: Option<BookingModal>,
}

impl AvailableVehicles {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self {
            vehicles,
            modal: None,
        }
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Open the booking modal for one vehicle
    pub fn book(&mut self, vehicle_id: i64, pricing: &BookingConfig) -> Option<&mut BookingModal> {
        let vehicle = self.vehicles.iter().find(|v| v.id == vehicle_id)?.clone();
        self.modal = Some(BookingModal::open(vehicle, pricing));
        self.modal.as_mut()
    }

    pub fn modal(&mut self) -> Option<&mut BookingModal> {
        self.modal.as_mut()
    }

    /// Submit the open modal; drops it once the booking went through
    pub async fn submit(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Outcome {
        let Some(modal) = self.modal.as_mut() else {
            return Outcome::Failed("No vehicle selected".to_string());
        };
        let outcome = modal.submit(api, session).await;
        if outcome.is_done() {
            self.modal = None;
        }
        outcome
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        if self.vehicles.is_empty() {
            out.push_str("🚗 No Vehicles Available\n");
            out.push_str("Please check back later for available vehicles\n");
            return out;
        }

        for vehicle in &self.vehicles {
            out.push_str(&format!(
                "{} [{}] {} ({})\n",
                ui::vehicle_icon(vehicle.vehicle_type.as_ref()),
                vehicle.id,
                vehicle.model,
                vehicle.vehicle_number
            ));
            if let Some(vehicle_type) = &vehicle.vehicle_type {
                out.push_str(&format!("    Type:     {}\n", vehicle_type));
            }
            if let Some(speed) = vehicle.speed {
                out.push_str(&format!("    Speed:    {} km/h\n", speed));
            }
            if let Some(gauge) = vehicle.gauge() {
                out.push_str(&format!("    {}\n", ui::gauge_bar(&gauge)));
            }
            if let Some((lat, lng)) = vehicle.location() {
                out.push_str(&format!("    📍 {}\n", ui::format_location(lat, lng)));
            }
        }
        out
    }
}
