//! Screens of the console.
//!
//! Each screen owns its own form and load state, talks to the backend through
//! a borrowed [`FleetApi`], and receives the [`SessionContext`] explicitly.
//! Actions that move the user elsewhere return the next [`Route`]; rendering
//! produces plain text for the terminal front end.
//!
//! [`FleetApi`]: crate::api::FleetApi
//! [`SessionContext`]: crate::session::SessionContext
//! [`Route`]: crate::routes::Route

pub mod booking;
pub mod dashboard;
pub mod login;
pub mod my_bookings;
pub mod register;
pub mod vehicles;

pub use booking::{estimate_cost, AvailableVehicles, BookingForm, BookingModal, CostEstimate};
pub use dashboard::{CustomerTab, DashboardScreen};
pub use login::LoginScreen;
pub use my_bookings::MyBookingsScreen;
pub use register::{Redirect, RegisterScreen};
pub use vehicles::{VehicleForm, VehicleListScreen};

use crate::api::ClientError;
use crate::routes::Route;
use crate::session::SessionContext;

/// Yes/no gate in front of a destructive action
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> bool;
}

/// A fixed answer
impl Confirm for bool {
    fn confirm(&mut self, _question: &str) -> bool {
        *self
    }
}

/// Result of a mutating screen action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Request went through; carries the message shown to the user
    Done(String),
    /// Confirmation declined, no request issued
    Declined,
    /// Failed with the message to show. Screens with an error slot also
    /// keep it there until the next action.
    Failed(String),
    /// Credentials rejected, session cleared
    Redirect(Route),
}

impl Outcome {
    pub fn is_done(&self) -> bool {
        matches!(self, Outcome::Done(_))
    }
}

/// Map a failed request to an outcome, dropping the session on 401/403
pub(crate) fn failure(session: &mut SessionContext, err: &ClientError, message: String) -> Outcome {
    match session.invalidate(err) {
        Some(route) => Outcome::Redirect(route),
        None => Outcome::Failed(message),
    }
}
