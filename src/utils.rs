/// Utility functions for unit conversion and log formatting
use time::{format_description, OffsetDateTime};

// Conversion factors applied to the decoded pressure reading
const MMHG_PER_PASCAL: f64 = 0.007500616827042;
const ATM_PER_PASCAL: f64 = 0.00000986923266716;

/// Convert a pressure in pascals to millimeters of mercury
pub fn pascals_to_mmhg(pascals: f64) -> f64 {
    pascals * MMHG_PER_PASCAL
}

/// Convert a pressure in pascals to standard atmospheres
pub fn pascals_to_atm(pascals: f64) -> f64 {
    pascals * ATM_PER_PASCAL
}

/// Convert a temperature in degrees Celsius to degrees Fahrenheit
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Format a timestamp for human-readable logging
///
/// Converts an OffsetDateTime to DD.MM.YYYY - HH:MM:SS format
/// Falls back to default string representation if formatting fails.
pub fn format_datetime(dt: &OffsetDateTime) -> String {
    let format = format_description::parse("[day].[month].[year] - [hour]:[minute]:[second]")
        .expect("Failed to create format description");
    dt.format(&format).unwrap_or_else(|_| dt.to_string())
}

/// Convert a time::Duration to seconds as u64
///
/// Helper function to report the age of the last reading in the main loop.
pub fn duration_to_seconds(duration: time::Duration) -> u64 {
    duration.whole_seconds() as u64
}
