use std::time::Duration;

use crate::api::FleetApi;
use crate::models::{RegisterRequest, Role};
use crate::routes::Route;

const FALLBACK: &str = "Registration failed";
pub const SUCCESS_MESSAGE: &str = "Registration successful! Redirecting to login...";
pub const REDIRECT_DELAY: Duration = Duration::from_secs(2);

/// Delayed navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub to: Route,
    pub after: Duration,
}

/// Sign-up form. No strength or uniqueness checks happen client side.
#[derive(Debug, Default)]
pub struct RegisterScreen {
    pub username: String,
    pub password: String,
    pub role: Role,
    error: Option<String>,
    success: Option<String>,
}

impl RegisterScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub async fn submit(&mut self, api: &dyn FleetApi) -> Option<Redirect> {
        self.error = None;
        self.success = None;

        let request = RegisterRequest {
            username: self.username.clone(),
            password: self.password.clone(),
            role: self.role,
        };

        match api.register(&request).await {
            Ok(confirmation) => {
                tracing::info!(username = %self.username, role = %self.role, %confirmation, "Registered");
                self.success = Some(SUCCESS_MESSAGE.to_string());
                Some(Redirect {
                    to: Route::Login,
                    after: REDIRECT_DELAY,
                })
            }
            Err(e) => {
                self.error = Some(e.user_message(FALLBACK));
                None
            }
        }
    }
}
