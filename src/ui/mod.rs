//! Text rendering helpers shared by the screens.

use chrono::NaiveDateTime;

use crate::models::{BookingStatus, Gauge, VehicleStatus, VehicleType};

/// Icon for a vehicle type; unknown or missing types fall back to the car icon
pub fn vehicle_icon(vehicle_type: Option<&VehicleType>) -> &'static str {
    match vehicle_type {
        Some(VehicleType::Bike) => "🏍️",
        Some(VehicleType::Truck) => "🚚",
        Some(VehicleType::Van) => "🚐",
        Some(VehicleType::Car) | Some(VehicleType::Other(_)) | None => "🚗",
    }
}

/// Badge color for a vehicle status
pub fn status_color(status: Option<&VehicleStatus>) -> &'static str {
    match status {
        Some(VehicleStatus::Available) => "#4caf50",
        Some(VehicleStatus::InUse) => "#2196f3",
        Some(VehicleStatus::Maintenance) => "#ff9800",
        Some(VehicleStatus::OutOfService) => "#f44336",
        Some(VehicleStatus::Other(_)) | None => "#757575",
    }
}

/// `⏳ PENDING`, `✅ CONFIRMED`, ... Unknown statuses render without an icon.
pub fn booking_badge(status: Option<&BookingStatus>) -> String {
    let Some(status) = status else {
        return "UNKNOWN".to_string();
    };
    let icon = match status {
        BookingStatus::Pending => "⏳",
        BookingStatus::Confirmed => "✅",
        BookingStatus::InProgress => "🚗",
        BookingStatus::Completed => "✔️",
        BookingStatus::Cancelled => "❌",
        BookingStatus::Other(_) => return status.as_str().to_string(),
    };
    format!("{} {}", icon, status.as_str())
}

/// `🔋 Battery [########--] 80%`
pub fn gauge_bar(gauge: &Gauge) -> String {
    const WIDTH: usize = 10;
    let percent = gauge.percent().clamp(0.0, 100.0);
    let filled = ((percent / 100.0) * WIDTH as f64).round() as usize;
    format!(
        "{} {:<7} [{}{}] {:.0}%",
        gauge.icon(),
        gauge.label(),
        "#".repeat(filled),
        "-".repeat(WIDTH - filled),
        gauge.percent()
    )
}

/// `5 Mar 2024, 08:15 am`, or `N/A`
pub fn format_datetime(value: Option<&NaiveDateTime>) -> String {
    match value {
        Some(dt) => dt.format("%-d %b %Y, %I:%M %P").to_string(),
        None => "N/A".to_string(),
    }
}

pub fn format_money(currency: &str, amount: f64) -> String {
    format!("{}{:.2}", currency, amount)
}

pub fn format_location(latitude: f64, longitude: f64) -> String {
    format!("{:.4}, {:.4}", latitude, longitude)
}

/// Truncate a string to max length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// `=== Title ===` with a blank line either side
pub fn heading(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(&format!("=== {} ===\n", title));
    out.push('\n');
}
