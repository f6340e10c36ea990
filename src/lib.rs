pub mod api;
pub mod cli;
pub mod config;
pub mod models;
pub mod resource;
pub mod routes;
pub mod screens;
pub mod session;
pub mod ui;

pub use api::{ApiClient, ClientError, FleetApi};
pub use config::Config;
pub use session::{Session, SessionContext};
