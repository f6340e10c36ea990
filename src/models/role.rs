//! Account roles.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role claim issued by the backend at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    FleetManager,
    Driver,
    #[default]
    Customer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::FleetManager, Role::Driver, Role::Customer];

    /// Wire representation (`ADMIN`, `FLEET_MANAGER`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::FleetManager => "FLEET_MANAGER",
            Role::Driver => "DRIVER",
            Role::Customer => "CUSTOMER",
        }
    }

    /// Exact match on the wire name, as issued in a login response.
    /// Anything else (including `admin` or `fleet-manager`) is not a role.
    pub fn from_claim(claim: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|role| role.as_str() == claim)
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::FleetManager => "Fleet Manager",
            Role::Driver => "Driver",
            Role::Customer => "Customer",
        }
    }

    /// Path segment of the role's dashboard endpoint and route
    pub fn slug(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::FleetManager => "fleet-manager",
            Role::Driver => "driver",
            Role::Customer => "customer",
        }
    }

    pub fn can_create_vehicles(&self) -> bool {
        match self {
            Role::Admin | Role::FleetManager => true,
            Role::Driver | Role::Customer => false,
        }
    }

    pub fn can_delete_vehicles(&self) -> bool {
        match self {
            Role::Admin => true,
            Role::FleetManager | Role::Driver | Role::Customer => false,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    /// Lenient parse for typed input such as `--role fleet-manager`.
    /// Session claims go through [`Role::from_claim`] instead.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "ADMIN" => Ok(Role::Admin),
            "FLEET_MANAGER" => Ok(Role::FleetManager),
            "DRIVER" => Ok(Role::Driver),
            "CUSTOMER" => Ok(Role::Customer),
            _ => Err(UnknownRole(s.to_string())),
        }
    }
}
