//! Screen routes and the route guard.
//!
//! The guard is advisory: it only decides whether this client renders a
//! screen. The backend enforces authorization on every request regardless.

use std::fmt;

use crate::models::Role;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Admin,
    FleetManager,
    Driver,
    Customer,
    Vehicles,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Admin => "/admin",
            Route::FleetManager => "/fleet-manager",
            Route::Driver => "/driver",
            Route::Customer => "/customer",
            Route::Vehicles => "/vehicles",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        let route = match path {
            "" => Route::Root,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/admin" => Route::Admin,
            "/fleet-manager" => Route::FleetManager,
            "/driver" => Route::Driver,
            "/customer" => Route::Customer,
            "/vehicles" => Route::Vehicles,
            _ => return None,
        };
        Some(route)
    }

    /// Dashboard for a role
    pub fn dashboard(role: Role) -> Route {
        match role {
            Role::Admin => Route::Admin,
            Role::FleetManager => Route::FleetManager,
            Role::Driver => Route::Driver,
            Role::Customer => Route::Customer,
        }
    }

    /// Where a fresh login lands: the role's dashboard, or the root path
    /// when the claim is not a known role
    pub fn after_login(role_claim: &str) -> Route {
        match Role::from_claim(role_claim) {
            Some(role) => Route::dashboard(role),
            None => Route::Root,
        }
    }

    /// Roles allowed to render this route; `None` for public routes
    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self {
            Route::Root | Route::Login | Route::Register => None,
            Route::Admin => Some(&[Role::Admin]),
            Route::FleetManager => Some(&[Role::FleetManager]),
            Route::Driver => Some(&[Role::Driver]),
            Route::Customer => Some(&[Role::Customer]),
            Route::Vehicles => Some(&[Role::Admin, Role::FleetManager, Role::Driver]),
        }
    }

    /// Public routes forward somewhere else before rendering
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Route::Root => Some(Route::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Why the guard refused to render a screen
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Denial {
    #[error("Please log in to continue")]
    NotAuthenticated,
    /// Logged in, but the role claim is outside the allowed set
    /// (or is not a role this client recognizes)
    #[error("Access denied: role '{role}' may not view this page")]
    Unauthorized { role: String },
}

impl Denial {
    /// Both cases send the user to log in again
    pub fn redirect(&self) -> Route {
        Route::Login
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    /// Public route, no session needed
    Public,
    Granted(Role),
    Denied(Denial),
}

impl Access {
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Access::Denied(_))
    }
}

/// Check a session against a set of allowed roles
pub fn check(session: Option<&Session>, allowed: &[Role]) -> Result<Role, Denial> {
    let session = session.ok_or(Denial::NotAuthenticated)?;
    match session.role() {
        Some(role) if allowed.contains(&role) => Ok(role),
        _ => Err(Denial::Unauthorized {
            role: session.role.clone(),
        }),
    }
}

/// Check whether a session may render `route`
pub fn guard(session: Option<&Session>, route: Route) -> Access {
    let Some(allowed) = route.required_roles() else {
        return Access::Public;
    };
    match check(session, allowed) {
        Ok(role) => Access::Granted(role),
        Err(denial) => {
            tracing::debug!(route = %route, denial = ?denial, "Route guard denied access");
            Access::Denied(denial)
        }
    }
}

/// Like [`guard`], for screens that need the granted role
pub fn require(session: Option<&Session>, route: Route) -> Result<Role, Denial> {
    match guard(session, route) {
        Access::Granted(role) => Ok(role),
        Access::Denied(denial) => Err(denial),
        Access::Public => session
            .and_then(Session::role)
            .ok_or(Denial::NotAuthenticated),
    }
}
