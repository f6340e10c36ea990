//! HTTP client for the NeuroFleetX REST API.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::{ApiResult, ClientError, FleetApi};
use crate::config::ApiConfig;
use crate::models::{
    Booking, DashboardSummary, LoginRequest, LoginResponse, NewBooking, NewVehicle,
    RegisterRequest, Role, Vehicle,
};

/// reqwest-backed implementation of [`FleetApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    /// Create a client for the configured base URL and request timeout
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("neurofleet/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder, token: &str) -> RequestBuilder {
        builder.bearer_auth(token)
    }

    /// Send a request and turn any non-success status into a [`ClientError`]
    async fn send(&self, builder: RequestBuilder) -> ApiResult<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response(status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ApiResult<T> {
        let response = self.send(builder).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }

    async fn text(&self, builder: RequestBuilder) -> ApiResult<String> {
        let response = self.send(builder).await?;
        Ok(response.text().await?)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, token: &str) -> ApiResult<T> {
        tracing::debug!(path, "GET");
        let builder = self.authorized(self.client.get(self.url(path)), token);
        self.json(builder).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        token: &str,
        body: &B,
    ) -> ApiResult<T> {
        tracing::debug!(path, "POST");
        let builder = self.authorized(self.client.post(self.url(path)), token).json(body);
        self.json(builder).await
    }

    async fn delete(&self, path: &str, token: &str) -> ApiResult<String> {
        tracing::debug!(path, "DELETE");
        let builder = self.authorized(self.client.delete(self.url(path)), token);
        self.text(builder).await
    }
}

#[async_trait]
impl FleetApi for ApiClient {
    async fn login(&self, request: &LoginRequest) -> ApiResult<LoginResponse> {
        tracing::debug!(username = %request.username, "POST /auth/login");
        let builder = self.client.post(self.url("/auth/login")).json(request);
        self.json(builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<String> {
        tracing::debug!(username = %request.username, role = %request.role, "POST /auth/register");
        let builder = self.client.post(self.url("/auth/register")).json(request);
        self.text(builder).await
    }

    async fn dashboard(&self, token: &str, role: Role) -> ApiResult<DashboardSummary> {
        self.get(&format!("/dashboard/{}", role.slug()), token).await
    }

    async fn list_vehicles(&self, token: &str) -> ApiResult<Vec<Vehicle>> {
        self.get("/vehicles", token).await
    }

    async fn get_vehicle(&self, token: &str, id: i64) -> ApiResult<Vehicle> {
        self.get(&format!("/vehicles/{}", id), token).await
    }

    async fn create_vehicle(&self, token: &str, vehicle: &NewVehicle) -> ApiResult<Vehicle> {
        self.post("/vehicles", token, vehicle).await
    }

    async fn delete_vehicle(&self, token: &str, id: i64) -> ApiResult<()> {
        self.delete(&format!("/vehicles/{}", id), token).await?;
        Ok(())
    }

    async fn create_booking(&self, token: &str, booking: &NewBooking) -> ApiResult<Booking> {
        self.post("/bookings", token, booking).await
    }

    async fn my_bookings(&self, token: &str) -> ApiResult<Vec<Booking>> {
        self.get("/bookings/my-bookings", token).await
    }

    async fn cancel_booking(&self, token: &str, id: i64) -> ApiResult<()> {
        self.delete(&format!("/bookings/{}", id), token).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ErrorCode;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::IntoResponse;
    use axum::routing::{delete, get, post};
    use axum::{Json, Router};
    use serde_json::{json, Value};

    const TOKEN: &str = "test-token";

    fn bearer_ok(headers: &HeaderMap) -> bool {
        headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v == format!("Bearer {}", TOKEN))
            .unwrap_or(false)
    }

    async fn login(Json(body): Json<Value>) -> impl IntoResponse {
        if body["username"] == "admin" && body["password"] == "admin123" {
            (
                StatusCode::OK,
                Json(json!({"token": TOKEN, "role": "ADMIN", "username": "admin"})),
            )
                .into_response()
        } else {
            (StatusCode::UNAUTHORIZED, "Invalid username or password").into_response()
        }
    }

    async fn register(Json(body): Json<Value>) -> impl IntoResponse {
        if body["username"] == "taken" {
            (StatusCode::BAD_REQUEST, "Username already exists").into_response()
        } else {
            let role = body["role"].as_str().unwrap_or_default().to_string();
            (
                StatusCode::OK,
                format!("User registered successfully with role: {}", role),
            )
                .into_response()
        }
    }

    async fn vehicles(headers: HeaderMap) -> impl IntoResponse {
        if !bearer_ok(&headers) {
            return StatusCode::FORBIDDEN.into_response();
        }
        Json(json!([
            {"id": 1, "vehicleNumber": "MH-24-AB-0001", "model": "Nexon EV", "type": "CAR",
             "status": "AVAILABLE", "latitude": 18.4088, "longitude": 76.5604, "speed": 0,
             "batteryLevel": 82, "fuelLevel": null},
            {"id": 2, "vehicleNumber": "MH-24-AB-0002", "model": "Eicher Pro", "type": "TRUCK",
             "status": "MAINTENANCE"}
        ]))
        .into_response()
    }

    async fn create_vehicle(headers: HeaderMap, Json(mut body): Json<Value>) -> impl IntoResponse {
        if !bearer_ok(&headers) {
            return StatusCode::FORBIDDEN.into_response();
        }
        body["id"] = json!(3);
        (StatusCode::CREATED, Json(body)).into_response()
    }

    async fn delete_vehicle(headers: HeaderMap, Path(id): Path<i64>) -> impl IntoResponse {
        if !bearer_ok(&headers) {
            return StatusCode::FORBIDDEN.into_response();
        }
        if id == 404 {
            return StatusCode::NOT_FOUND.into_response();
        }
        (StatusCode::OK, "Vehicle deleted successfully").into_response()
    }

    async fn dashboard(headers: HeaderMap, Path(role): Path<String>) -> impl IntoResponse {
        if !bearer_ok(&headers) {
            return StatusCode::UNAUTHORIZED.into_response();
        }
        Json(json!({"availableVehicles": 4, "totalVehicles": 9, "role": role.to_uppercase()}))
            .into_response()
    }

    async fn create_booking(Json(_body): Json<Value>) -> impl IntoResponse {
        (StatusCode::BAD_REQUEST, "Vehicle is not available for booking")
    }

    async fn garbage() -> impl IntoResponse {
        (StatusCode::OK, "<html>not json</html>")
    }

    async fn spawn_stub() -> ApiClient {
        let app = Router::new()
            .route("/api/auth/login", post(login))
            .route("/api/auth/register", post(register))
            .route("/api/dashboard/:role", get(dashboard))
            .route("/api/vehicles", get(vehicles).post(create_vehicle))
            .route("/api/vehicles/:id", delete(delete_vehicle))
            .route("/api/bookings", post(create_booking))
            .route("/api/bookings/my-bookings", get(garbage));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        ApiClient::new(&ApiConfig {
            base_url: format!("http://{}/api/", addr),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://localhost:8085/api/".to_string(),
            timeout_secs: 30,
        })
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8085/api");
        assert_eq!(client.url("/vehicles"), "http://localhost:8085/api/vehicles");
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let client = spawn_stub().await;

        let ok = client
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: "admin123".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(ok.token, TOKEN);
        assert_eq!(ok.role, "ADMIN");

        let err = client
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.server_message(), Some("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_register_returns_server_text() {
        let client = spawn_stub().await;

        let text = client
            .register(&RegisterRequest {
                username: "ravi".to_string(),
                password: "pw".to_string(),
                role: Role::Driver,
            })
            .await
            .unwrap();
        assert_eq!(text, "User registered successfully with role: DRIVER");

        let err = client
            .register(&RegisterRequest {
                username: "taken".to_string(),
                password: "pw".to_string(),
                role: Role::Customer,
            })
            .await
            .unwrap_err();
        assert_eq!(err.user_message("Registration failed"), "Username already exists");
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let client = spawn_stub().await;

        let vehicles = client.list_vehicles(TOKEN).await.unwrap();
        assert_eq!(vehicles.len(), 2);
        assert!(vehicles[0].gauge().is_some());
        assert!(vehicles[1].gauge().is_none());

        let err = client.list_vehicles("stale").await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_dashboard_uses_role_slug() {
        let client = spawn_stub().await;

        let summary = client.dashboard(TOKEN, Role::FleetManager).await.unwrap();
        assert_eq!(summary.role.as_deref(), Some("FLEET-MANAGER"));
        assert_eq!(summary.total_vehicles, Some(9));
    }

    #[tokio::test]
    async fn test_create_and_delete_vehicle() {
        let client = spawn_stub().await;

        let created = client
            .create_vehicle(
                TOKEN,
                &NewVehicle {
                    vehicle_number: "MH-24-ZZ-9".to_string(),
                    model: "Ace".to_string(),
                    vehicle_type: crate::models::VehicleType::Van,
                    status: crate::models::VehicleStatus::Available,
                    latitude: 18.5204,
                    longitude: 76.5644,
                    speed: 0.0,
                    battery_level: None,
                    fuel_level: Some(100.0),
                },
            )
            .await
            .unwrap();
        assert_eq!(created.id, 3);
        assert_eq!(created.fuel_level, Some(100.0));

        client.delete_vehicle(TOKEN, 3).await.unwrap();
        let err = client.delete_vehicle(TOKEN, 404).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_booking_rejection_surfaces_text() {
        let client = spawn_stub().await;

        let err = client
            .create_booking(
                TOKEN,
                &NewBooking {
                    vehicle_id: 1,
                    start_time: crate::models::parse_datetime("2024-01-01T10:00").unwrap(),
                    end_time: crate::models::parse_datetime("2024-01-02T10:00").unwrap(),
                    pickup_location: "Latur".to_string(),
                    drop_location: "Pune".to_string(),
                    remarks: String::new(),
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadRequest);
        assert_eq!(
            err.user_message("Failed to create booking"),
            "Vehicle is not available for booking"
        );
    }

    #[tokio::test]
    async fn test_undecodable_body_is_decode_error() {
        let client = spawn_stub().await;
        let err = client.my_bookings(TOKEN).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Decode);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = ApiClient::new(&ApiConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let err = client.list_vehicles(TOKEN).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Transport);
        assert_eq!(err.user_message("Failed to load vehicles"), "Failed to load vehicles");
    }
}
