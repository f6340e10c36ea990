//! Wire models for the NeuroFleetX API.
//!
//! These are read-only snapshots of backend-owned records. Fields the backend
//! may omit or send as `null` are modelled as `Option` (or defaulted) so that a
//! partially populated record never fails to decode.

pub mod auth;
pub mod booking;
pub mod dashboard;
pub mod role;
pub mod vehicle;

pub use auth::*;
pub use booking::*;
pub use dashboard::*;
pub use role::*;
pub use vehicle::*;

use chrono::NaiveDateTime;

/// Accepted shapes for backend `LocalDateTime` values and `datetime-local` input
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a local date-time in any of the accepted formats
pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

pub(crate) mod de {
    use super::parse_datetime;
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer};

    /// Treat an explicit `null` like a missing field
    pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Default + Deserialize<'de>,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Date-times that fail to parse decode as `None` instead of failing the record
    pub fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_datetime))
    }
}
