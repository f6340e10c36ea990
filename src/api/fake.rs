//! In-memory [`FleetApi`] used by screen tests.
//!
//! Records every call so tests can assert which requests were (or were not)
//! issued, and lets a test queue a failure for the next call to a named
//! endpoint.

use async_trait::async_trait;
use std::collections::HashMap;
use parking_lot::Mutex;

use super::{ApiResult, ClientError, FleetApi};
use crate::models::{
    Booking, BookingStatus, DashboardSummary, LoginRequest, LoginResponse, NewBooking,
    NewVehicle, RegisterRequest, Role, Vehicle, VehicleStatus, VehicleType,
};

pub const TOKEN: &str = "fake-token";

#[derive(Default)]
struct State {
    users: HashMap<String, (String, String)>,
    vehicles: Vec<Vehicle>,
    bookings: Vec<Booking>,
    summary: DashboardSummary,
    calls: Vec<String>,
    failures: HashMap<&'static str, ClientError>,
    next_id: i64,
}

pub struct FakeApi {
    state: Mutex<State>,
}

impl FakeApi {
    pub fn new() -> Self {
        let mut users = HashMap::new();
        users.insert("admin".to_string(), ("admin123".to_string(), "ADMIN".to_string()));
        users.insert("fm".to_string(), ("fm123".to_string(), "FLEET_MANAGER".to_string()));
        users.insert("driver".to_string(), ("driver123".to_string(), "DRIVER".to_string()));
        users.insert("cust".to_string(), ("cust123".to_string(), "CUSTOMER".to_string()));
        users.insert("odd".to_string(), ("odd123".to_string(), "AUDITOR".to_string()));

        Self {
            state: Mutex::new(State {
                users,
                next_id: 100,
                ..Default::default()
            }),
        }
    }

    pub fn with_vehicles(self, vehicles: Vec<Vehicle>) -> Self {
        self.state.lock().vehicles = vehicles;
        self
    }

    pub fn with_bookings(self, bookings: Vec<Booking>) -> Self {
        self.state.lock().bookings = bookings;
        self
    }

    pub fn with_summary(self, summary: DashboardSummary) -> Self {
        self.state.lock().summary = summary;
        self
    }

    /// Make the next call to `endpoint` fail with `error`
    pub fn fail_next(&self, endpoint: &'static str, error: ClientError) {
        self.state.lock().failures.insert(endpoint, error);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn count(&self, endpoint: &str) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.split(' ').next() == Some(endpoint))
            .count()
    }

    fn enter(&self, endpoint: &'static str, detail: String, token: Option<&str>) -> ApiResult<()> {
        let mut state = self.state.lock();
        state.calls.push(format!("{} {}", endpoint, detail).trim_end().to_string());
        if let Some(err) = state.failures.remove(endpoint) {
            return Err(err);
        }
        if let Some(token) = token {
            if token != TOKEN {
                return Err(ClientError::from_response(401, ""));
            }
        }
        Ok(())
    }
}

pub fn vehicle(id: i64, vehicle_type: VehicleType, battery: Option<f64>, fuel: Option<f64>) -> Vehicle {
    Vehicle {
        id,
        vehicle_number: format!("MH-24-AB-{:04}", id),
        model: format!("Model {}", id),
        vehicle_type: Some(vehicle_type),
        status: Some(VehicleStatus::Available),
        latitude: Some(18.4088),
        longitude: Some(76.5604),
        speed: Some(0.0),
        battery_level: battery,
        fuel_level: fuel,
        last_updated: None,
    }
}

pub fn booking(id: i64, status: BookingStatus) -> Booking {
    Booking {
        id,
        vehicle: Some(vehicle(1, VehicleType::Car, None, Some(60.0))),
        start_time: crate::models::parse_datetime("2024-01-01T10:00"),
        end_time: crate::models::parse_datetime("2024-01-02T10:00"),
        pickup_location: Some("Latur".to_string()),
        drop_location: Some("Pune".to_string()),
        remarks: None,
        status: Some(status),
        estimated_cost: Some(500.0),
        actual_cost: None,
        booking_time: crate::models::parse_datetime("2023-12-31T18:30"),
    }
}

#[async_trait]
impl FleetApi for FakeApi {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        self.enter("login", request.username.clone(), None)?;
        let state = self.state.lock();
        match state.users.get(&request.username) {
            Some((password, role)) if *password == request.password => Ok(LoginResponse {
                token: TOKEN.to_string(),
                role: role.clone(),
                username: Some(request.username.clone()),
            }),
            _ => Err(ClientError::from_response(401, "Invalid username or password")),
        }
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<String> {
        self.enter("register", request.username.clone(), None)?;
        let mut state = self.state.lock();
        if state.users.contains_key(&request.username) {
            return Err(ClientError::from_response(400, "Username already exists"));
        }
        state.users.insert(
            request.username.clone(),
            (request.password.clone(), request.role.as_str().to_string()),
        );
        Ok(format!("User registered successfully with role: {}", request.role))
    }

    async fn dashboard(&self, token: &str, role: Role) -> ApiResult<DashboardSummary> {
        self.enter("dashboard", role.slug().to_string(), Some(token))?;
        Ok(self.state.lock().summary.clone())
    }

    async fn list_vehicles(&self, token: &str) -> ApiResult<Vec<Vehicle>> {
        self.enter("list_vehicles", String::new(), Some(token))?;
        Ok(self.state.lock().vehicles.clone())
    }

    async fn get_vehicle(&self, token: &str, id: i64) -> ApiResult<Vehicle> {
        self.enter("get_vehicle", id.to_string(), Some(token))?;
        let state = self.state.lock();
        state
            .vehicles
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| ClientError::from_response(404, ""))
    }

    async fn create_vehicle(&self, token: &str, vehicle: &NewVehicle) -> ApiResult<Vehicle> {
        self.enter("create_vehicle", vehicle.vehicle_number.clone(), Some(token))?;
        let mut state = self.state.lock();
        state.next_id += 1;
        let created = Vehicle {
            id: state.next_id,
            vehicle_number: vehicle.vehicle_number.clone(),
            model: vehicle.model.clone(),
            vehicle_type: Some(vehicle.vehicle_type.clone()),
            status: Some(vehicle.status.clone()),
            latitude: Some(vehicle.latitude),
            longitude: Some(vehicle.longitude),
            speed: Some(vehicle.speed),
            battery_level: vehicle.battery_level,
            fuel_level: vehicle.fuel_level,
            last_updated: None,
        };
        state.vehicles.push(created.clone());
        Ok(created)
    }

    async fn delete_vehicle(&self, token: &str, id: i64) -> ApiResult<()> {
        self.enter("delete_vehicle", id.to_string(), Some(token))?;
        let mut state = self.state.lock();
        let before = state.vehicles.len();
        state.vehicles.retain(|v| v.id != id);
        if state.vehicles.len() == before {
            return Err(ClientError::from_response(404, ""));
        }
        Ok(())
    }

    async fn create_booking(&self, token: &str, booking: &NewBooking) -> ApiResult<Booking> {
        self.enter("create_booking", booking.vehicle_id.to_string(), Some(token))?;
        let mut state = self.state.lock();
        let vehicle = state
            .vehicles
            .iter()
            .find(|v| v.id == booking.vehicle_id)
            .cloned()
            .ok_or_else(|| ClientError::from_response(400, "Vehicle not found"))?;
        state.next_id += 1;
        let created = Booking {
            id: state.next_id,
            vehicle: Some(vehicle),
            start_time: Some(booking.start_time),
            end_time: Some(booking.end_time),
            pickup_location: Some(booking.pickup_location.clone()),
            drop_location: Some(booking.drop_location.clone()),
            remarks: Some(booking.remarks.clone()),
            status: Some(BookingStatus::Pending),
            estimated_cost: None,
            actual_cost: None,
            booking_time: None,
        };
        state.bookings.push(created.clone());
        Ok(created)
    }

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<Booking>> {
        self.enter("my_bookings", String::new(), Some(token))?;
        Ok(self.state.lock().bookings.clone())
    }

    async fn cancel_booking(&self, token: &str, id: i64) -> ApiResult<()> {
        self.enter("cancel_booking", id.to_string(), Some(token))?;
        let mut state = self.state.lock();
        match state.bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = Some(BookingStatus::Cancelled);
                Ok(())
            }
            None => Err(ClientError::from_response(404, "")),
        }
    }
}
