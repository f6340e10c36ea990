//! Fleet management screen: list, add and delete vehicles.

use super::{failure, Confirm, Outcome};
use crate::api::{ClientError, FleetApi};
use crate::config::VehicleConfig;
use crate::models::{Gauge, NewVehicle, Role, Vehicle, VehicleStatus, VehicleType};
use crate::resource::{LoadState, Resource};
use crate::routes::{self, Denial, Route};
use crate::session::SessionContext;
use crate::ui;

const LOAD_FALLBACK: &str = "Failed to load vehicles";
pub const DELETE_QUESTION: &str = "Are you sure you want to delete this vehicle?";

/// Add-vehicle form
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleForm {
    pub vehicle_number: String,
    pub model: String,
    pub vehicle_type: VehicleType,
    pub status: VehicleStatus,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: f64,
    pub battery_level: Option<f64>,
    pub fuel_level: Option<f64>,
}

impl VehicleForm {
    pub fn new(defaults: &VehicleConfig) -> Self {
        Self {
            vehicle_number: String::new(),
            model: String::new(),
            vehicle_type: VehicleType::Car,
            status: VehicleStatus::Available,
            latitude: defaults.default_latitude,
            longitude: defaults.default_longitude,
            speed: 0.0,
            battery_level: None,
            fuel_level: Some(100.0),
        }
    }

    pub fn to_request(&self) -> Result<NewVehicle, ClientError> {
        let vehicle_number = self.vehicle_number.trim();
        let model = self.model.trim();
        if vehicle_number.is_empty() || model.is_empty() {
            return Err(ClientError::Validation(
                "Vehicle number and model are required".to_string(),
            ));
        }
        for level in [self.battery_level, self.fuel_level].into_iter().flatten() {
            if !(0.0..=100.0).contains(&level) {
                return Err(ClientError::Validation(
                    "Battery and fuel levels must be between 0 and 100".to_string(),
                ));
            }
        }

        Ok(NewVehicle {
            vehicle_number: vehicle_number.to_string(),
            model: model.to_string(),
            vehicle_type: self.vehicle_type.clone(),
            status: self.status.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            battery_level: self.battery_level,
            fuel_level: self.fuel_level,
        })
    }
}

#[derive(Debug)]
pub struct VehicleListScreen {
    role: Role,
    vehicles: Resource<Vec<Vehicle>>,
    defaults: VehicleConfig,
    pub form: VehicleForm,
    error: Option<String>,
}

impl VehicleListScreen {
    pub fn open(session: &SessionContext, defaults: &VehicleConfig) -> Result<Self, Denial> {
        let role = routes::require(session.current(), Route::Vehicles)?;
        Ok(Self {
            role,
            vehicles: Resource::new("vehicles"),
            defaults: defaults.clone(),
            form: VehicleForm::new(defaults),
            error: None,
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        self.vehicles.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn state(&self) -> &LoadState<Vec<Vehicle>> {
        self.vehicles.state()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn can_create(&self) -> bool {
        self.role.can_create_vehicles()
    }

    pub fn can_delete(&self) -> bool {
        self.role.can_delete_vehicles()
    }

    /// Back to the role's dashboard
    pub fn back(&self) -> Route {
        Route::dashboard(self.role)
    }

    pub async fn load(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        let result = match session.token() {
            Ok(token) => self.vehicles.ensure(|| api.list_vehicles(token), LOAD_FALLBACK).await,
            Err(e) => Err(e),
        };
        result.err().and_then(|e| session.invalidate(&e))
    }

    /// `GET /vehicles/{id}`
    pub async fn show(
        &self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
        id: i64,
    ) -> Result<Vehicle, ClientError> {
        let result = match session.token() {
            Ok(token) => api.get_vehicle(token, id).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            session.invalidate(e);
        }
        result
    }

    /// POST the form, then refetch the list and reset the form. Failures keep
    /// the form as entered.
    pub async fn create(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Outcome {
        self.error = None;
        if let Err(e) = self.permit(self.can_create(), "add") {
            return self.fail(e.to_string());
        }
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(e) => return self.fail(format!("Error adding vehicle: {}", e.detail())),
        };

        let result = match session.token() {
            Ok(token) => api.create_vehicle(token, &request).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(created) => {
                tracing::info!(vehicle_id = created.id, vehicle_number = %created.vehicle_number, "Vehicle added");
                self.form = VehicleForm::new(&self.defaults);
                self.vehicles.invalidate();
                if let Some(route) = self.load(api, session).await {
                    return Outcome::Redirect(route);
                }
                Outcome::Done(format!("Vehicle {} added", created.vehicle_number))
            }
            Err(e) => {
                let message = format!("Error adding vehicle: {}", e.detail());
                self.error = Some(message.clone());
                failure(session, &e, message)
            }
        }
    }

    /// Admin-only delete behind a confirmation. Declining sends nothing.
    pub async fn delete(
        &mut self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
        id: i64,
        confirm: &mut dyn Confirm,
    ) -> Outcome {
        self.error = None;
        if let Err(e) = self.permit(self.can_delete(), "delete") {
            return self.fail(e.to_string());
        }
        if !confirm.confirm(DELETE_QUESTION) {
            return Outcome::Declined;
        }

        let result = match session.token() {
            Ok(token) => api.delete_vehicle(token, id).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => {
                tracing::info!(vehicle_id = id, "Vehicle deleted");
                self.vehicles.invalidate();
                if let Some(route) = self.load(api, session).await {
                    return Outcome::Redirect(route);
                }
                Outcome::Done(format!("Vehicle {} deleted", id))
            }
            Err(e) => {
                let message = format!("Error deleting vehicle: {}", e.detail());
                self.error = Some(message.clone());
                failure(session, &e, message)
            }
        }
    }

    fn permit(&self, allowed: bool, action: &str) -> Result<(), ClientError> {
        if allowed {
            return Ok(());
        }
        tracing::debug!(role = %self.role, action, "Vehicle action refused for role");
        Err(ClientError::NotPermitted(format!(
            "Role {} may not {} vehicles",
            self.role.label(),
            action
        )))
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.error = Some(message.clone());
        Outcome::Failed(message)
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        ui::heading(&mut out, "Fleet Vehicles");

        match self.vehicles.state() {
            LoadState::Idle | LoadState::Loading => out.push_str("Loading...\n"),
            LoadState::Failed(msg) => out.push_str(&format!("[!!] {}\n", msg)),
            LoadState::Loaded(vehicles) if vehicles.is_empty() => {
                out.push_str("No vehicles found.\n")
            }
            LoadState::Loaded(vehicles) => {
                out.push_str(&format!(
                    "{:<6}  {:<16}  {:<20}  {:<11}  {:<16}  {:<7}  {:<20}  {:>9}  {:>6}  {:>6}\n",
                    "ID", "NUMBER", "MODEL", "TYPE", "STATUS", "COLOR", "LOCATION", "SPEED", "BATT", "FUEL"
                ));
                out.push_str(&format!("{}\n", "-".repeat(138)));
                for v in vehicles {
                    let vehicle_type = v.vehicle_type.as_ref();
                    out.push_str(&format!(
                        "{:<6}  {:<16}  {:<20}  {:<11}  {:<16}  {:<7}  {:<20}  {:>9}  {:>6}  {:>6}\n",
                        v.id,
                        ui::truncate(&v.vehicle_number, 16),
                        ui::truncate(&v.model, 20),
                        format!(
                            "{} {}",
                            ui::vehicle_icon(vehicle_type),
                            vehicle_type.map(|t| t.as_str()).unwrap_or("")
                        ),
                        v.status.as_ref().map(|s| s.as_str()).unwrap_or(""),
                        ui::status_color(v.status.as_ref()),
                        v.location()
                            .map(|(lat, lng)| ui::format_location(lat, lng))
                            .unwrap_or_default(),
                        v.speed.map(|s| format!("{} km/h", s)).unwrap_or_default(),
                        v.battery_level.map(|b| format!("{}%", b)).unwrap_or_default(),
                        v.fuel_level.map(|f| format!("{}%", f)).unwrap_or_default(),
                    ));
                }
            }
        }

        if let Some(error) = &self.error {
            out.push_str(&format!("\n[!!] {}\n", error));
        }
        out
    }
}

/// Detail view of one vehicle
pub fn render_vehicle(v: &Vehicle) -> String {
    let mut out = String::new();
    ui::heading(
        &mut out,
        &format!("{} Vehicle: {}", ui::vehicle_icon(v.vehicle_type.as_ref()), v.vehicle_number),
    );
    out.push_str(&format!("ID:          {}\n", v.id));
    out.push_str(&format!("Model:       {}\n", v.model));
    if let Some(vehicle_type) = &v.vehicle_type {
        out.push_str(&format!("Type:        {}\n", vehicle_type));
    }
    if let Some(status) = &v.status {
        out.push_str(&format!(
            "Status:      {} ({})\n",
            status,
            ui::status_color(Some(status))
        ));
    }
    if let Some((lat, lng)) = v.location() {
        out.push_str(&format!("Location:    {}\n", ui::format_location(lat, lng)));
    }
    if let Some(speed) = v.speed {
        out.push_str(&format!("Speed:       {} km/h\n", speed));
    }
    if let Some(level) = v.battery_level {
        out.push_str(&format!("{}\n", ui::gauge_bar(&Gauge::Battery(level))));
    }
    if let Some(level) = v.fuel_level {
        out.push_str(&format!("{}\n", ui::gauge_bar(&Gauge::Fuel(level))));
    }
    out.push_str(&format!(
        "Updated:     {}\n",
        ui::format_datetime(v.last_updated.as_ref())
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{self, FakeApi};
    use crate::screens::testing::{session_as, Recorder};

    fn fleet() -> Vec<Vehicle> {
        vec![
            fake::vehicle(1, VehicleType::Car, None, Some(70.0)),
            fake::vehicle(2, VehicleType::Bike, Some(55.0), None),
        ]
    }

    async fn open_loaded(role: &str, api: &FakeApi) -> (VehicleListScreen, SessionContext) {
        let mut session = session_as(role);
        let mut screen = VehicleListScreen::open(&session, &VehicleConfig::default()).unwrap();
        assert_eq!(screen.load(api, &mut session).await, None);
        (screen, session)
    }

    #[test]
    fn test_form_defaults() {
        let form = VehicleForm::new(&VehicleConfig::default());
        assert_eq!(form.vehicle_number, "");
        assert_eq!(form.vehicle_type, VehicleType::Car);
        assert_eq!(form.status, VehicleStatus::Available);
        assert!((form.latitude - 18.5204).abs() < 1e-9);
        assert!((form.longitude - 76.5644).abs() < 1e-9);
        assert_eq!(form.speed, 0.0);
        assert_eq!(form.battery_level, None);
        assert_eq!(form.fuel_level, Some(100.0));
    }

    #[test]
    fn test_customer_cannot_open() {
        let session = session_as("CUSTOMER");
        assert!(VehicleListScreen::open(&session, &VehicleConfig::default()).is_err());
    }

    #[tokio::test]
    async fn test_create_refetches_and_resets_form() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("FLEET_MANAGER", &api).await;
        screen.form.vehicle_number = "MH-24-XY-0001".to_string();
        screen.form.model = "Tata Nexon EV".to_string();
        screen.form.battery_level = Some(90.0);

        let outcome = screen.create(&api, &mut session).await;
        assert!(outcome.is_done());
        assert_eq!(screen.vehicles().len(), 3);
        assert_eq!(screen.form, VehicleForm::new(&VehicleConfig::default()));
        assert_eq!(
            api.calls(),
            vec!["list_vehicles", "create_vehicle MH-24-XY-0001", "list_vehicles"]
        );
    }

    #[tokio::test]
    async fn test_create_failure_keeps_form() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("ADMIN", &api).await;
        screen.form.vehicle_number = "DUP-1".to_string();
        screen.form.model = "Innova".to_string();
        api.fail_next("create_vehicle", ClientError::from_response(400, "Vehicle number already exists"));

        let outcome = screen.create(&api, &mut session).await;
        assert_eq!(
            outcome,
            Outcome::Failed("Error adding vehicle: Vehicle number already exists".to_string())
        );
        assert_eq!(screen.form.vehicle_number, "DUP-1");
        assert_eq!(api.count("list_vehicles"), 1);
    }

    #[tokio::test]
    async fn test_driver_create_is_refused_locally() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("DRIVER", &api).await;
        screen.form.vehicle_number = "X".to_string();
        screen.form.model = "Y".to_string();

        assert_eq!(
            screen.create(&api, &mut session).await,
            Outcome::Failed("Role Driver may not add vehicles".to_string())
        );
        assert_eq!(api.count("create_vehicle"), 0);

        let refused = screen.permit(screen.can_delete(), "delete").unwrap_err();
        assert_eq!(refused.code(), crate::api::ErrorCode::NotPermitted);
        assert_eq!(refused.user_message("unused"), "Role Driver may not delete vehicles");
    }

    #[tokio::test]
    async fn test_declined_delete_issues_no_request() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("ADMIN", &api).await;
        let mut confirm = Recorder::new(false);

        let outcome = screen.delete(&api, &mut session, 1, &mut confirm).await;
        assert_eq!(outcome, Outcome::Declined);
        assert_eq!(confirm.asked, vec![DELETE_QUESTION.to_string()]);
        assert_eq!(api.count("delete_vehicle"), 0);
        assert_eq!(screen.vehicles().len(), 2);
    }

    #[tokio::test]
    async fn test_confirmed_delete_refetches() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("ADMIN", &api).await;

        let outcome = screen.delete(&api, &mut session, 1, &mut true).await;
        assert!(outcome.is_done());
        assert_eq!(screen.vehicles().len(), 1);
        assert_eq!(api.count("list_vehicles"), 2);
    }

    #[tokio::test]
    async fn test_delete_failure_message() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("ADMIN", &api).await;

        let outcome = screen.delete(&api, &mut session, 42, &mut true).await;
        assert!(matches!(outcome, Outcome::Failed(ref m) if m.starts_with("Error deleting vehicle: ")));
        assert!(screen.error().is_some());
    }

    #[tokio::test]
    async fn test_fleet_manager_delete_is_refused_without_prompt() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (mut screen, mut session) = open_loaded("FLEET_MANAGER", &api).await;
        let mut confirm = Recorder::new(true);

        assert_eq!(
            screen.delete(&api, &mut session, 1, &mut confirm).await,
            Outcome::Failed("Role Fleet Manager may not delete vehicles".to_string())
        );
        assert_eq!(screen.error(), Some("Role Fleet Manager may not delete vehicles"));
        assert!(confirm.asked.is_empty());
        assert_eq!(api.count("delete_vehicle"), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_load_redirects() {
        let api = FakeApi::new();
        api.fail_next("list_vehicles", ClientError::from_response(401, ""));
        let mut session = session_as("ADMIN");
        let mut screen = VehicleListScreen::open(&session, &VehicleConfig::default()).unwrap();

        assert_eq!(screen.load(&api, &mut session).await, Some(Route::Login));
        assert!(!session.is_logged_in());
    }

    #[tokio::test]
    async fn test_show_one_vehicle() {
        let api = FakeApi::new().with_vehicles(fleet());
        let (screen, mut session) = open_loaded("DRIVER", &api).await;

        let v = screen.show(&api, &mut session, 2).await.unwrap();
        let out = render_vehicle(&v);
        assert!(out.contains("🏍️ Vehicle: MH-24-AB-0002"));
        assert!(out.contains("🔋"));
        assert!(!out.contains("⛽"));
        assert!(out.contains("Updated:     N/A"));
        assert!(screen.show(&api, &mut session, 99).await.is_err());
    }

    #[test]
    fn test_form_validation() {
        let mut form = VehicleForm::new(&VehicleConfig::default());
        assert!(form.to_request().is_err());
        form.vehicle_number = "A".to_string();
        form.model = "B".to_string();
        form.fuel_level = Some(140.0);
        assert!(form.to_request().is_err());
        form.fuel_level = Some(40.0);
        assert!(form.to_request().is_ok());
    }

    #[tokio::test]
    async fn test_render_omits_missing_fields() {
        let mut sparse = fake::vehicle(3, VehicleType::Van, None, None);
        sparse.latitude = None;
        sparse.speed = None;
        let api = FakeApi::new().with_vehicles(vec![sparse]);
        let (screen, _) = open_loaded("DRIVER", &api).await;

        let out = screen.render();
        let row = out.lines().find(|l| l.starts_with("3 ")).unwrap();
        assert!(!row.contains('%'));
        assert!(!row.contains("km/h"));
        assert!(!row.contains("76.5604"));
    }

    #[tokio::test]
    async fn test_list_rows_show_icon_and_status_color() {
        let mut booked = fake::vehicle(4, VehicleType::Other("SCOOTER".to_string()), Some(30.0), None);
        booked.status = Some(VehicleStatus::Other("BOOKED".to_string()));
        let mut repair = fake::vehicle(5, VehicleType::Truck, None, Some(20.0));
        repair.status = Some(VehicleStatus::Maintenance);
        let api = FakeApi::new().with_vehicles(vec![booked, repair]);
        let (screen, _) = open_loaded("ADMIN", &api).await;

        let out = screen.render();
        let row = |id: &str| out.lines().find(|l| l.starts_with(id)).unwrap().to_string();

        let fallback = row("4 ");
        assert!(fallback.contains("🚗 SCOOTER"));
        assert!(fallback.contains("BOOKED"));
        assert!(fallback.contains("#757575"));

        let known = row("5 ");
        assert!(known.contains("🚚 TRUCK"));
        assert!(known.contains("MAINTENANCE"));
        assert!(known.contains("#ff9800"));
    }
}
