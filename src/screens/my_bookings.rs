use super::{failure, Confirm, Outcome};
use crate::api::FleetApi;
use crate::models::Booking;
use crate::resource::{LoadState, Resource};
use crate::routes::Route;
use crate::session::SessionContext;
use crate::ui;

const LOAD_FALLBACK: &str = "Failed to load bookings";
const CANCEL_FALLBACK: &str = "Failed to cancel booking";
pub const CANCEL_QUESTION: &str = "Are you sure you want to cancel this booking?";

/// The requester's own bookings
#[derive(Debug)]
pub struct MyBookingsScreen {
    bookings: Resource<Vec<Booking>>,
    currency: String,
    error: Option<String>,
}

impl MyBookingsScreen {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            bookings: Resource::new("my-bookings"),
            currency: currency.into(),
            error: None,
        }
    }

    pub fn bookings(&self) -> &[Booking] {
        self.bookings.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn state(&self) -> &LoadState<Vec<Booking>> {
        self.bookings.state()
    }

    /// Last failed action, else the load failure
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref().or_else(|| self.bookings.error())
    }

    pub async fn load(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        self.fetch(api, session, false).await
    }

    pub async fn retry(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        self.fetch(api, session, true).await
    }

    async fn fetch(
        &mut self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
        force: bool,
    ) -> Option<Route> {
        let result = match session.token() {
            Ok(token) if force => self.bookings.refresh(|| api.my_bookings(token), LOAD_FALLBACK).await,
            Ok(token) => self.bookings.ensure(|| api.my_bookings(token), LOAD_FALLBACK).await,
            Err(e) => Err(e),
        };
        result.err().and_then(|e| session.invalidate(&e))
    }

    /// Withdraw a PENDING or CONFIRMED booking after confirmation, then reload.
    /// On success the caller should refresh whatever counts bookings.
    pub async fn cancel(
        &mut self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
        id: i64,
        confirm: &mut dyn Confirm,
    ) -> Outcome {
        self.error = None;
        match self.bookings().iter().find(|b| b.id == id) {
            Some(booking) if booking.can_cancel() => {}
            Some(booking) => {
                let status = booking
                    .status
                    .as_ref()
                    .map(|s| s.as_str().to_string())
                    .unwrap_or_else(|| "UNKNOWN".to_string());
                return self.fail(format!("Booking #{} is {} and cannot be cancelled", id, status));
            }
            None => return self.fail(format!("Booking #{} not found", id)),
        }
        if !confirm.confirm(CANCEL_QUESTION) {
            return Outcome::Declined;
        }

        let result = match session.token() {
            Ok(token) => api.cancel_booking(token, id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(booking_id = id, "Booking cancelled");
                self.bookings.invalidate();
                if let Some(route) = self.load(api, session).await {
                    return Outcome::Redirect(route);
                }
                Outcome::Done("Booking cancelled successfully".to_string())
            }
            Err(e) => {
                tracing::warn!(booking_id = id, error = %e, "Cancel failed");
                let message = e.user_message(CANCEL_FALLBACK);
                self.error = Some(message.clone());
                failure(session, &e, message)
            }
        }
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.error = Some(message.clone());
        Outcome::Failed(message)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        ui::heading(&mut out, "My Bookings");

        let bookings = match self.bookings.state() {
            LoadState::Idle | LoadState::Loading => {
                out.push_str("Loading bookings...\n");
                return out;
            }
            LoadState::Failed(msg) => {
                out.push_str(&format!("[!!] {}\n", msg));
                out.push_str("Run the command again to retry.\n");
                return out;
            }
            LoadState::Loaded(bookings) => bookings,
        };

        if bookings.is_empty() {
            out.push_str("📋 No Bookings Yet\n");
            out.push_str("Book a vehicle to get started\n");
            return out;
        }

        for booking in bookings {
            self.render_booking(&mut out, booking);
        }
        if let Some(error) = &self.error {
            out.push_str(&format!("[!!] {}\n", error));
        }
        out
    }

    fn render_booking(&self, out: &mut String, b: &Booking) {
        out.push_str(&format!(
            "Booking #{}  {}\n",
            b.id,
            ui::booking_badge(b.status.as_ref())
        ));
        if let Some(v) = &b.vehicle {
            out.push_str(&format!(
                "  Vehicle:   {} {} ({})\n",
                ui::vehicle_icon(v.vehicle_type.as_ref()),
                v.model,
                v.vehicle_number
            ));
        }
        out.push_str(&format!("  Start:     {}\n", ui::format_datetime(b.start_time.as_ref())));
        out.push_str(&format!("  End:       {}\n", ui::format_datetime(b.end_time.as_ref())));
        out.push_str(&format!(
            "  Pickup:    {}\n",
            b.pickup_location.as_deref().unwrap_or("")
        ));
        out.push_str(&format!("  Drop:      {}\n", b.drop_location.as_deref().unwrap_or("")));
        if let Some(cost) = b.estimated_cost {
            out.push_str(&format!("  Estimated: {}\n", ui::format_money(&self.currency, cost)));
            if let Some(actual) = b.actual_cost {
                out.push_str(&format!("  Actual:    {}\n", ui::format_money(&self.currency, actual)));
            }
        }
        if let Some(remarks) = b.remarks.as_deref().filter(|r| !r.is_empty()) {
            out.push_str(&format!("  Remarks:   {}\n", remarks));
        }
        out.push_str(&format!(
            "  Booked on: {}\n",
            ui::format_datetime(b.booking_time.as_ref())
        ));
        if b.can_cancel() {
            out.push_str(&format!("  Cancel:    neurofleet bookings cancel {}\n", b.id));
        }
        out.push('\n');
    }
}
