//! Role dashboards.

use super::booking::AvailableVehicles;
use crate::api::FleetApi;
use crate::models::{DashboardSummary, Role};
use crate::resource::{LoadState, Resource};
use crate::routes::{self, Denial, Route};
use crate::session::SessionContext;

const FALLBACK: &str = "Failed to load dashboard data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CustomerTab {
    #[default]
    AvailableVehicles,
    MyBookings,
}

impl CustomerTab {
    pub fn label(&self) -> &'static str {
        match self {
            CustomerTab::AvailableVehicles => "Available Vehicles",
            CustomerTab::MyBookings => "My Bookings",
        }
    }
}

/// Where the dashboard's primary action leads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimaryNav {
    Route(Route),
    Tabs([CustomerTab; 2]),
}

#[derive(Debug)]
pub struct DashboardScreen {
    role: Role,
    summary: Resource<DashboardSummary>,
    tab: CustomerTab,
}

impl DashboardScreen {
    /// Dashboard for the session's own role
    pub fn open(session: &SessionContext) -> Result<Self, Denial> {
        let role = session.role().ok_or_else(|| match session.current() {
            Some(s) => Denial::Unauthorized { role: s.role.clone() },
            None => Denial::NotAuthenticated,
        })?;
        let role = routes::require(session.current(), Route::dashboard(role))?;
        Ok(Self {
            role,
            summary: Resource::new("dashboard"),
            tab: CustomerTab::default(),
        })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn route(&self) -> Route {
        Route::dashboard(self.role)
    }

    pub fn state(&self) -> &LoadState<DashboardSummary> {
        self.summary.state()
    }

    pub fn summary(&self) -> Option<&DashboardSummary> {
        self.summary.data()
    }

    pub fn error(&self) -> Option<&str> {
        self.summary.error()
    }

    pub fn tab(&self) -> CustomerTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: CustomerTab) {
        self.tab = tab;
    }

    /// Vehicles offered on the customer's first tab
    pub fn available_vehicles(&self) -> AvailableVehicles {
        AvailableVehicles::new(
            self.summary()
                .map(|s| s.vehicles.clone())
                .unwrap_or_default(),
        )
    }

    pub fn primary_nav(&self) -> PrimaryNav {
        match self.role {
            Role::Admin | Role::FleetManager | Role::Driver => PrimaryNav::Route(Route::Vehicles),
            Role::Customer => {
                PrimaryNav::Tabs([CustomerTab::AvailableVehicles, CustomerTab::MyBookings])
            }
        }
    }

    /// Fetch the summary unless it is already fresh. Returns the login route if
    /// the backend rejected the session.
    pub async fn load(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        self.fetch(api, session, false).await
    }

    /// Manual retry after a failure; always fetches
    pub async fn retry(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        self.fetch(api, session, true).await
    }

    async fn fetch(
        &mut self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
        force: bool,
    ) -> Option<Route> {
        let role = self.role;
        let result = match session.token() {
            Ok(token) if force => self.summary.refresh(|| api.dashboard(token, role), FALLBACK).await,
            Ok(token) => self.summary.ensure(|| api.dashboard(token, role), FALLBACK).await,
            Err(e) => Err(e),
        };
        result.err().and_then(|e| session.invalidate(&e))
    }

    /// A booking went through: refresh counters and show the bookings tab
    pub async fn on_booking_success(
        &mut self,
        api: &dyn FleetApi,
        session: &mut SessionContext,
    ) -> Option<Route> {
        self.tab = CustomerTab::MyBookings;
        self.summary.invalidate();
        self.load(api, session).await
    }

    pub fn logout(&self, session: &mut SessionContext) -> anyhow::Result<Route> {
        session.logout()
    }

    pub fn render(&self, username: &str) -> String {
        let mut out = String::new();
        crate::ui::heading(&mut out, &format!("{} Dashboard", self.role.label()));
        out.push_str(&format!("Welcome, {}\n\n", username));

        match self.summary.state() {
            LoadState::Idle | LoadState::Loading => out.push_str("Loading...\n"),
            LoadState::Failed(msg) => {
                out.push_str(&format!("[!!] {}\n", msg));
                out.push_str("Run the command again to retry.\n");
            }
            LoadState::Loaded(summary) => {
                for counter in summary.counters(self.role) {
                    out.push_str(&format!(
                        "  {} {:<20} {}\n",
                        counter.icon, counter.label, counter.value
                    ));
                }
                out.push('\n');
                match self.primary_nav() {
                    PrimaryNav::Route(route) => {
                        out.push_str(&format!("Manage vehicles: {}\n", route));
                    }
                    PrimaryNav::Tabs(tabs) => {
                        for tab in tabs {
                            let marker = if tab == self.tab { ">" } else { " " };
                            out.push_str(&format!("{} {}\n", marker, tab.label()));
                        }
                    }
                }
            }
        }
        out
    }
}
