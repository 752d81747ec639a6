//! Decoding and scanning library for a BLE environmental sensing peripheral.
//!
//! The binary (`src/main.rs`) owns the poll loop and log output. The
//! decoding logic lives here where it can be tested deterministically:
//! [`bluetooth::advertisement`] parses raw advertising data buffers and
//! [`bluetooth::decoder`] extracts sensor readings from the peripheral's
//! fixed advertisement layout.

pub mod bluetooth;
pub mod config;
pub mod models;
pub mod utils;

// Re-export commonly used types at the crate root
pub use bluetooth::advertisement::parse_advertisement;
pub use bluetooth::decoder::{decode_advertisement, decode_service_data, DecodeError};
pub use bluetooth::scanner::scan_for_readings;
pub use config::MonitorConfig;
pub use models::{Advertisement, SensorReadings};
