//! Role dashboard summaries.

use serde::{Deserialize, Serialize};

use super::{Role, Vehicle};

/// Aggregate counters from `/dashboard/{role}`. Each role receives a different
/// subset; absent counters read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSummary {
    pub total_vehicles: Option<u64>,
    pub available_vehicles: Option<u64>,
    pub in_use_vehicles: Option<u64>,
    pub maintenance_vehicles: Option<u64>,
    pub booked_vehicles: Option<u64>,
    pub total_users: Option<u64>,
    pub total_bookings: Option<u64>,
    pub pending_bookings: Option<u64>,
    pub my_bookings: Option<u64>,
    pub my_active_bookings: Option<u64>,
    pub my_pending_bookings: Option<u64>,
    pub role: Option<String>,
    /// Available vehicles, embedded in the customer summary only
    #[serde(deserialize_with = "super::de::null_as_default")]
    pub vehicles: Vec<Vehicle>,
}

/// A labelled number on a dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counter {
    pub label: &'static str,
    pub icon: &'static str,
    pub value: u64,
}

impl Counter {
    fn new(label: &'static str, icon: &'static str, value: Option<u64>) -> Self {
        Self {
            label,
            icon,
            value: value.unwrap_or(0),
        }
    }
}

impl DashboardSummary {
    /// Counters shown on the given role's dashboard, in display order
    pub fn counters(&self, role: Role) -> Vec<Counter> {
        match role {
            Role::Admin => vec![
                Counter::new("Total Vehicles", "🚘", self.total_vehicles),
                Counter::new("Available", "🟢", self.available_vehicles),
                Counter::new("In Use", "🔵", self.in_use_vehicles),
                Counter::new("Maintenance", "🛠️", self.maintenance_vehicles),
                Counter::new("Total Users", "👥", self.total_users),
                Counter::new("Total Bookings", "📋", self.total_bookings),
                Counter::new("Pending Bookings", "⏳", self.pending_bookings),
            ],
            Role::FleetManager => vec![
                Counter::new("Total Vehicles", "🚘", self.total_vehicles),
                Counter::new("Available", "🟢", self.available_vehicles),
                Counter::new("In Use", "🔵", self.in_use_vehicles),
                Counter::new("Maintenance", "🛠️", self.maintenance_vehicles),
            ],
            Role::Driver => vec![
                Counter::new("Available Vehicles", "🚗", self.available_vehicles),
                Counter::new("My Bookings", "📋", self.my_bookings),
                Counter::new("Active Bookings", "✅", self.my_active_bookings),
            ],
            Role::Customer => vec![
                Counter::new("Available Vehicles", "🚗", self.available_vehicles),
                Counter::new("Total Bookings", "📋", self.my_bookings),
                Counter::new("Active Bookings", "✅", self.my_active_bookings),
                Counter::new("Pending Bookings", "⏳", self.my_pending_bookings),
            ],
        }
    }
}
