//! Utility functions for the rating tracker

use crate::error::CampError;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Generate a new unique match ID
pub fn generate_match_id() -> Uuid {
    Uuid::new_v4()
}

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    current_timestamp().date_naive()
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(value: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        CampError::InvalidWindow {
            reason: format!("'{}' is not a date in YYYY-MM-DD form", value),
        }
        .into()
    })
}

/// Signed rating delta with one decimal, e.g. `+12.3` or `-4.0`
pub fn format_delta(delta: f64) -> String {
    // Avoid printing "-0.0" for tiny negative rounding noise
    if delta.abs() < 0.05 {
        return "+0.0".to_string();
    }
    format!("{:+.1}", delta)
}
