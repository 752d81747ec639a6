/// A generic advertisement record assembled from EIR/AD structures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advertisement {
    /// Advertised service UUIDs as hex strings, in order of first appearance
    pub service_uuids: Vec<String>,
    /// Shortened or complete local name, last occurrence wins
    pub local_name: Option<String>,
    /// Transmit power level in dBm
    pub tx_power_level: Option<i8>,
    /// Raw manufacturer-specific payload, last occurrence wins
    pub manufacturer_data: Option<Vec<u8>>,
}

/// One set of readings decoded from the peripheral's advertisement
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReadings {
    pub pressure_pascals: f64,
    pub humidity_percent: f32,
    pub temperature_celsius: f32,
    pub lux: u16,
    pub acceleration_immediate: bool,
    pub acceleration_interval: bool,
}
