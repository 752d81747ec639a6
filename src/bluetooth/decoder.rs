/// Fixed-layout decoding of the environmental sensing advertisement frame
use std::fmt;

use crate::models::SensorReadings;

// The peripheral broadcasts a fixed frame: the 16-bit Environmental
// Sensing Service UUID sits at bytes 12-13 (little-endian), followed by
// an 11-byte readings block.
const SERVICE_UUID_OFFSET: usize = 12;
const ESS_UUID_LE: [u8; 2] = [0x1A, 0x18];
const READINGS_OFFSET: usize = 14;
const READINGS_LEN: usize = 11;
const FRAME_LEN: usize = READINGS_OFFSET + READINGS_LEN;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The frame does not carry the Environmental Sensing Service UUID
    /// at the expected offset
    NotTargetService,
    /// The buffer is too short to hold every fixed-offset field
    BufferTooShort { actual: usize, expected: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::NotTargetService => {
                write!(f, "advertisement does not carry the environmental sensing service")
            }
            DecodeError::BufferTooShort { actual, expected } => {
                write!(f, "buffer too short: {} bytes, need {}", actual, expected)
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Decode sensor readings from a complete advertisement frame
///
/// Verifies the Environmental Sensing Service UUID at bytes 12-13 and
/// decodes the readings block at bytes 14-24. A frame advertising a
/// different service yields [`DecodeError::NotTargetService`]; the
/// caller's usual policy is to keep scanning. Buffers shorter than 25
/// bytes yield [`DecodeError::BufferTooShort`] and no partial readings.
///
/// # Arguments
/// * `frame` - Raw advertising data bytes from a discovery event
///
/// # Returns
/// The decoded readings, or the reason the frame was rejected
pub fn decode_advertisement(frame: &[u8]) -> Result<SensorReadings, DecodeError> {
    if frame.len() < FRAME_LEN {
        return Err(DecodeError::BufferTooShort {
            actual: frame.len(),
            expected: FRAME_LEN,
        });
    }
    if frame[SERVICE_UUID_OFFSET..SERVICE_UUID_OFFSET + 2] != ESS_UUID_LE {
        return Err(DecodeError::NotTargetService);
    }

    Ok(decode_readings(&frame[READINGS_OFFSET..FRAME_LEN]))
}

/// Decode sensor readings from an 11-byte readings block
///
/// BlueZ delivers advertisement structures pre-parsed, so the scanner
/// receives the service data payload already split out of the frame.
/// This decodes the same readings block that [`decode_advertisement`]
/// locates at its fixed offset.
pub fn decode_service_data(data: &[u8]) -> Result<SensorReadings, DecodeError> {
    if data.len() < READINGS_LEN {
        return Err(DecodeError::BufferTooShort {
            actual: data.len(),
            expected: READINGS_LEN,
        });
    }

    Ok(decode_readings(data))
}

/// Decode the readings block: pressure u32, humidity u16, temperature
/// i16, lux u16, status byte, all little-endian
fn decode_readings(data: &[u8]) -> SensorReadings {
    let pressure_raw = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
    let humidity_raw = u16::from_le_bytes([data[4], data[5]]);
    let temperature_raw = i16::from_le_bytes([data[6], data[7]]);
    let lux = u16::from_le_bytes([data[8], data[9]]);
    let status = data[10];

    SensorReadings {
        pressure_pascals: f64::from(pressure_raw) / 10.0,
        humidity_percent: f32::from(humidity_raw) / 100.0,
        temperature_celsius: f32::from(temperature_raw) / 100.0,
        lux,
        // Status bit masks as the peripheral firmware emits them:
        // bit 4 flags an immediate event, bit 0 an interval event
        acceleration_immediate: (status & 0x11) >> 4 != 0,
        acceleration_interval: status & 0x01 != 0,
    }
}
