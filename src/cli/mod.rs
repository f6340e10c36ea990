//! CLI module for the NeuroFleetX console.
//!
//! Each subcommand drives one screen against the configured API and prints
//! its rendered text:
//! - `login` / `register` / `logout` / `whoami` - Session management
//! - `dashboard` - Role dashboard with counters
//! - `vehicles list|show|add|delete` - Fleet management
//! - `bookings available|book|list|cancel` - Customer booking flow
//! - `config check` - Validate configuration file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::api::FleetApi;
use crate::config::Config;
use crate::models::{Role, VehicleStatus, VehicleType};
use crate::routes::{self, Route};
use crate::screens::{
    vehicles::render_vehicle, Confirm, DashboardScreen, LoginScreen, MyBookingsScreen, Outcome,
    RegisterScreen, VehicleListScreen,
};
use crate::session::SessionContext;

/// CLI arguments structure
#[derive(Parser, Debug)]
#[command(name = "neurofleet")]
#[command(author, version, about = "Terminal console for the NeuroFleetX fleet platform", long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "neurofleet.toml")]
    pub config: PathBuf,

    /// Override log level
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// API base URL, including the /api prefix (overrides api.base_url)
    #[arg(long, env = "NEUROFLEET_API_URL")]
    pub api_url: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and store the session
    Login {
        username: String,
        /// Prompted for when omitted
        #[arg(long, env = "NEUROFLEET_PASSWORD")]
        password: Option<String>,
    },

    /// Create an account
    Register {
        username: String,
        #[arg(long)]
        password: Option<String>,
        /// ADMIN, FLEET_MANAGER, DRIVER or CUSTOMER
        #[arg(long, default_value = "CUSTOMER")]
        role: Role,
    },

    /// Clear the stored session
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Show the dashboard for the session's role
    Dashboard,

    /// Fleet management commands
    #[command(subcommand)]
    Vehicles(VehiclesCommands),

    /// Customer booking commands
    #[command(subcommand)]
    Bookings(BookingsCommands),

    /// Configuration management commands
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Vehicles subcommands
#[derive(Subcommand, Debug)]
pub enum VehiclesCommands {
    /// List all vehicles
    List,
    /// Show details for a specific vehicle
    Show { id: i64 },
    /// Add a vehicle (admin and fleet manager)
    Add {
        /// Registration number
        number: String,
        model: String,
        #[arg(long = "type", default_value = "CAR")]
        vehicle_type: String,
        #[arg(long, default_value = "AVAILABLE")]
        status: String,
        #[arg(long, allow_negative_numbers = true)]
        latitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        longitude: Option<f64>,
        #[arg(long, default_value = "0")]
        speed: f64,
        /// Battery level in percent (electric vehicles)
        #[arg(long)]
        battery: Option<f64>,
        /// Fuel level in percent (default: 100)
        #[arg(long)]
        fuel: Option<f64>,
    },
    /// Delete a vehicle (admin only)
    Delete { id: i64 },
}

/// Bookings subcommands
#[derive(Subcommand, Debug)]
pub enum BookingsCommands {
    /// List vehicles available for booking
    Available,
    /// Book an available vehicle
    Book {
        vehicle_id: i64,
        /// Start time, e.g. 2024-05-01T09:00
        #[arg(long)]
        start: Option<String>,
        /// End time, e.g. 2024-05-02T09:00
        #[arg(long)]
        end: Option<String>,
        #[arg(long, default_value = "")]
        pickup: String,
        #[arg(long = "drop", default_value = "")]
        drop_location: String,
        #[arg(long, default_value = "")]
        remarks: String,
    },
    /// List my bookings
    List,
    /// Cancel a pending or confirmed booking
    Cancel { id: i64 },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Validate configuration file
    Check,
}

/// Reads y/N answers from the terminal unless `--yes` was given
pub struct StdinConfirm {
    assume_yes: bool,
}

impl StdinConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match prompt(&format!("{} [y/N]: ", question)) {
            Ok(answer) => is_yes(&answer),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read confirmation");
                false
            }
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn password_or_prompt(password: &Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p.clone()),
        None => prompt("Password: "),
    }
}

// ============================================================================
// CLI Command Handlers
// ============================================================================

/// Run a CLI command
pub async fn run_command(
    cli: &Cli,
    config: &Config,
    api: &dyn FleetApi,
    session: &mut SessionContext,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    match &cli.command {
        Commands::Login { username, password } => {
            cmd_login(api, session, username, &password_or_prompt(password)?).await
        }
        Commands::Register {
            username,
            password,
            role,
        } => cmd_register(api, username, &password_or_prompt(password)?, *role).await,
        Commands::Logout => cmd_logout(session),
        Commands::Whoami => cmd_whoami(session),
        Commands::Dashboard => cmd_dashboard(api, session).await,
        Commands::Vehicles(VehiclesCommands::List) => cmd_vehicles_list(config, api, session).await,
        Commands::Vehicles(VehiclesCommands::Show { id }) => {
            cmd_vehicles_show(config, api, session, *id).await
        }
        Commands::Vehicles(VehiclesCommands::Add {
            number,
            model,
            vehicle_type,
            status,
            latitude,
            longitude,
            speed,
            battery,
            fuel,
        }) => {
            let mut screen = open_vehicles(config, session)?;
            screen.form.vehicle_number = number.clone();
            screen.form.model = model.clone();
            screen.form.vehicle_type = VehicleType::from(vehicle_type.clone());
            screen.form.status = VehicleStatus::from(status.clone());
            screen.form.latitude = latitude.unwrap_or(config.vehicles.default_latitude);
            screen.form.longitude = longitude.unwrap_or(config.vehicles.default_longitude);
            screen.form.speed = *speed;
            screen.form.battery_level = *battery;
            if fuel.is_some() || battery.is_some() {
                screen.form.fuel_level = *fuel;
            }
            cmd_vehicles_add(api, session, screen).await
        }
        Commands::Vehicles(VehiclesCommands::Delete { id }) => {
            cmd_vehicles_delete(config, api, session, *id, confirm).await
        }
        Commands::Bookings(BookingsCommands::Available) => cmd_bookings_available(api, session).await,
        Commands::Bookings(BookingsCommands::Book {
            vehicle_id,
            start,
            end,
            pickup,
            drop_location,
            remarks,
        }) => {
            let request = BookRequest {
                vehicle_id: *vehicle_id,
                start: start.as_deref().unwrap_or(""),
                end: end.as_deref().unwrap_or(""),
                pickup,
                drop_location,
                remarks,
            };
            cmd_bookings_book(config, api, session, request).await
        }
        Commands::Bookings(BookingsCommands::List) => cmd_bookings_list(config, api, session).await,
        Commands::Bookings(BookingsCommands::Cancel { id }) => {
            cmd_bookings_cancel(config, api, session, *id, confirm).await
        }
        Commands::Config(ConfigCommands::Check) => cmd_config_check(&cli.config),
    }
}

/// Turn a forced navigation into an error the user can act on
fn redirected(route: Option<Route>) -> Result<()> {
    match route {
        None => Ok(()),
        Some(route) => anyhow::bail!(
            "Session expired or not authorized ({}). Log in again with `neurofleet login <username>`.",
            route
        ),
    }
}

fn finish(outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Done(message) => {
            println!("[OK] {}", message);
            Ok(())
        }
        Outcome::Declined => {
            println!("Aborted, nothing was changed.");
            Ok(())
        }
        Outcome::Failed(message) => anyhow::bail!(message),
        Outcome::Redirect(route) => redirected(Some(route)),
    }
}

async fn cmd_login(
    api: &dyn FleetApi,
    session: &mut SessionContext,
    username: &str,
    password: &str,
) -> Result<()> {
    let mut screen = LoginScreen::new();
    screen.username = username.to_string();
    screen.password = password.to_string();

    match screen.submit(api, session).await {
        Some(route) => {
            let role = session.current().map(|s| s.role.as_str()).unwrap_or("");
            println!("[OK] Logged in as {} ({})", username, role);
            println!("Dashboard: {}", route);
            Ok(())
        }
        None => anyhow::bail!(screen.error().unwrap_or("Login failed").to_string()),
    }
}

async fn cmd_register(api: &dyn FleetApi, username: &str, password: &str, role: Role) -> Result<()> {
    let mut screen = RegisterScreen::new();
    screen.username = username.to_string();
    screen.password = password.to_string();
    screen.role = role;

    match screen.submit(api).await {
        Some(redirect) => {
            println!("[OK] {}", screen.success().unwrap_or_default());
            tokio::time::sleep(redirect.after).await;
            println!("Next: neurofleet login {}", username);
            Ok(())
        }
        None => anyhow::bail!(screen.error().unwrap_or("Registration failed").to_string()),
    }
}

fn cmd_logout(session: &mut SessionContext) -> Result<()> {
    let was = session.username().map(str::to_string);
    let route = session.logout()?;
    match was {
        Some(username) => println!("[OK] Logged out {}", username),
        None => println!("Not logged in."),
    }
    println!("Next: {}", route);
    Ok(())
}

fn cmd_whoami(session: &SessionContext) -> Result<()> {
    let Some(current) = session.current() else {
        println!("Not logged in.");
        return Ok(());
    };
    println!("Username:  {}", current.username);
    match current.role() {
        Some(role) => {
            println!("Role:      {}", role.label());
            println!("Dashboard: {}", Route::dashboard(role));
        }
        None => println!("Role:      {} (unrecognized)", current.role),
    }
    Ok(())
}

async fn cmd_dashboard(api: &dyn FleetApi, session: &mut SessionContext) -> Result<()> {
    let mut screen = DashboardScreen::open(session)?;
    redirected(screen.load(api, session).await)?;
    let username = session.username().unwrap_or_default().to_string();
    print!("{}", screen.render(&username));
    Ok(())
}

fn open_vehicles(config: &Config, session: &SessionContext) -> Result<VehicleListScreen> {
    Ok(VehicleListScreen::open(session, &config.vehicles)?)
}

async fn cmd_vehicles_list(config: &Config, api: &dyn FleetApi, session: &mut SessionContext) -> Result<()> {
    let mut screen = open_vehicles(config, session)?;
    redirected(screen.load(api, session).await)?;
    print!("{}", screen.render());
    Ok(())
}

async fn cmd_vehicles_show(
    config: &Config,
    api: &dyn FleetApi,
    session: &mut SessionContext,
    id: i64,
) -> Result<()> {
    let screen = open_vehicles(config, session)?;
    match screen.show(api, session, id).await {
        Ok(vehicle) => {
            print!("{}", render_vehicle(&vehicle));
            Ok(())
        }
        Err(e) if e.is_unauthorized() => redirected(Some(Route::Login)),
        Err(e) => anyhow::bail!("Vehicle {}: {}", id, e.detail()),
    }
}

async fn cmd_vehicles_add(
    api: &dyn FleetApi,
    session: &mut SessionContext,
    mut screen: VehicleListScreen,
) -> Result<()> {
    let outcome = screen.create(api, session).await;
    let done = outcome.is_done();
    finish(outcome)?;
    if done {
        print!("{}", screen.render());
    }
    Ok(())
}

async fn cmd_vehicles_delete(
    config: &Config,
    api: &dyn FleetApi,
    session: &mut SessionContext,
    id: i64,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let mut screen = open_vehicles(config, session)?;
    let outcome = screen.delete(api, session, id, confirm).await;
    finish(outcome)
}

/// The booking flow lives on the customer dashboard
async fn customer_dashboard(api: &dyn FleetApi, session: &mut SessionContext) -> Result<DashboardScreen> {
    routes::require(session.current(), Route::Customer)?;
    let mut screen = DashboardScreen::open(session)?;
    redirected(screen.load(api, session).await)?;
    if let Some(error) = screen.error() {
        anyhow::bail!(error.to_string());
    }
    Ok(screen)
}

async fn cmd_bookings_available(api: &dyn FleetApi, session: &mut SessionContext) -> Result<()> {
    let dashboard = customer_dashboard(api, session).await?;
    print!("{}", dashboard.available_vehicles().render());
    Ok(())
}

struct BookRequest<'a> {
    vehicle_id: i64,
    start: &'a str,
    end: &'a str,
    pickup: &'a str,
    drop_location: &'a str,
    remarks: &'a str,
}

async fn cmd_bookings_book(
    config: &Config,
    api: &dyn FleetApi,
    session: &mut SessionContext,
    request: BookRequest<'_>,
) -> Result<()> {
    let mut dashboard = customer_dashboard(api, session).await?;
    let mut available = dashboard.available_vehicles();

    let Some(modal) = available.book(request.vehicle_id, &config.booking) else {
        anyhow::bail!("Vehicle {} is not available for booking", request.vehicle_id);
    };
    modal.set_start_time(request.start);
    modal.set_end_time(request.end);
    modal.form.pickup_location = request.pickup.to_string();
    modal.form.drop_location = request.drop_location.to_string();
    modal.form.remarks = request.remarks.to_string();
    if let Some(estimate) = modal.estimate_display() {
        println!("Estimated cost: {}", estimate);
    }

    let outcome = available.submit(api, session).await;
    let done = outcome.is_done();
    finish(outcome)?;

    if done {
        redirected(dashboard.on_booking_success(api, session).await)?;
        let mut bookings = MyBookingsScreen::new(config.booking.currency.clone());
        redirected(bookings.load(api, session).await)?;
        print!("{}", bookings.render());
    }
    Ok(())
}

async fn cmd_bookings_list(config: &Config, api: &dyn FleetApi, session: &mut SessionContext) -> Result<()> {
    routes::require(session.current(), Route::Customer)?;
    let mut screen = MyBookingsScreen::new(config.booking.currency.clone());
    redirected(screen.load(api, session).await)?;
    print!("{}", screen.render());
    Ok(())
}

async fn cmd_bookings_cancel(
    config: &Config,
    api: &dyn FleetApi,
    session: &mut SessionContext,
    id: i64,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    routes::require(session.current(), Route::Customer)?;
    let mut screen = MyBookingsScreen::new(config.booking.currency.clone());
    redirected(screen.load(api, session).await)?;
    if let Some(error) = screen.error() {
        anyhow::bail!(error.to_string());
    }
    let outcome = screen.cancel(api, session, id, confirm).await;
    finish(outcome)
}

/// Validate configuration file
pub fn cmd_config_check(config_path: &Path) -> Result<()> {
    println!("Checking configuration file: {}", config_path.display());
    println!();

    if !config_path.exists() {
        println!(
            "[!] Configuration file not found: {}",
            config_path.display()
        );
        println!();
        println!("Built-in defaults will be used.");
        return Ok(());
    }

    match Config::load(config_path) {
        Ok(config) => {
            println!("[OK] Configuration file is valid!");
            println!();
            println!("=== Configuration Summary ===");
            println!();
            println!("API:");
            println!("  Base URL:     {}", config.api.base_url);
            println!("  Timeout:      {}s", config.api.timeout_secs);
            println!();
            println!("Session:");
            println!("  File:         {}", config.session.session_file().display());
            println!();
            println!("Booking:");
            println!(
                "  Daily Rate:   {}",
                crate::ui::format_money(&config.booking.currency, config.booking.daily_rate)
            );
            println!();
            println!("Vehicles:");
            println!(
                "  Default Location: {}",
                crate::ui::format_location(
                    config.vehicles.default_latitude,
                    config.vehicles.default_longitude
                )
            );
            println!();
            println!("Logging:");
            println!("  Level:        {}", config.logging.level);
            println!();
            Ok(())
        }
        Err(e) => {
            println!("[!!] Configuration file is invalid!");
            println!();
            println!("Error: {:#}", e);
            println!();
            anyhow::bail!("Invalid configuration");
        }
    }
}
