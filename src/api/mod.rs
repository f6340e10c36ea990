//! REST contract of the NeuroFleetX backend.
//!
//! Screens talk to the backend only through [`FleetApi`], so they can be
//! driven by the HTTP [`ApiClient`] in production and by an in-memory fake in
//! tests. Every authenticated call takes the bearer token explicitly; the
//! token comes from the caller's [`crate::session::SessionContext`].

pub mod client;
pub mod error;

#[cfg(test)]
pub(crate) mod fake;

pub use client::ApiClient;
pub use error::{ClientError, ErrorCode};

use async_trait::async_trait;

use crate::models::{
    Booking, DashboardSummary, LoginRequest, LoginResponse, NewBooking, NewVehicle,
    RegisterRequest, Role, Vehicle,
};

pub type ApiResult<T> = Result<T, ClientError>;

#[async_trait]
pub trait FleetApi: Send + Sync {
    /// `POST /auth/login` (unauthenticated)
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse>;

    /// `POST /auth/register` (unauthenticated); returns the server's confirmation text
    async fn register(&self, request: &RegisterRequest) -> ApiResult<String>;

    /// `GET /dashboard/{role}`
    async fn dashboard(&self, token: &str, role: Role) -> ApiResult<DashboardSummary>;

    /// `GET /vehicles`
    async fn list_vehicles(&self, token: &str) -> ApiResult<Vec<Vehicle>>;

    /// `GET /vehicles/{id}`
    async fn get_vehicle(&self, token: &str, id: i64) -> ApiResult<Vehicle>;

    /// `POST /vehicles`
    async fn create_vehicle(&self, token: &str, vehicle: &NewVehicle) -> ApiResult<Vehicle>;

    /// `DELETE /vehicles/{id}`
    async fn delete_vehicle(&self, token: &str, id: i64) -> ApiResult<()>;

    /// `POST /bookings`
    async fn create_booking(&self, token: &str, booking: &NewBooking) -> ApiResult<Booking>;

    /// `GET /bookings/my-bookings`
    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<Booking>>;

    /// `DELETE /bookings/{id}`
    async fn cancel_booking(&self, token: &str, id: i64) -> ApiResult<()>;
}
