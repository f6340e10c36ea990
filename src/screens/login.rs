use crate::api::FleetApi;
use crate::models::LoginRequest;
use crate::routes::Route;
use crate::session::{Session, SessionContext};

const FALLBACK: &str = "Login failed";

/// Username/password form. A failed attempt keeps what was typed.
#[derive(Debug, Default)]
pub struct LoginScreen {
    pub username: String,
    pub password: String,
    error: Option<String>,
}

impl LoginScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// One login request. On success the session is stored and the route for
    /// the issued role is returned.
    pub async fn submit(&mut self, api: &dyn FleetApi, session: &mut SessionContext) -> Option<Route> {
        self.error = None;

        let request = LoginRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        };

        let response = match api.login(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username = %self.username, error = %e, "Login rejected");
                self.error = Some(e.user_message(FALLBACK));
                return None;
            }
        };

        let route = Route::after_login(&response.role);
        let session_data = Session {
            token: response.token,
            role: response.role,
            username: self.username.clone(),
        };
        if let Err(e) = session.login(session_data) {
            self.error = Some(e.to_string());
            return None;
        }

        Some(route)
    }
}
