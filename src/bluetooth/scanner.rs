/// Bluetooth Low Energy scanning for the environmental sensing peripheral
use futures_util::StreamExt;
use log::{debug, error, warn};
use tokio::time::{sleep, Duration};

use crate::bluetooth::decoder::decode_service_data;
use crate::config::MonitorConfig;
use crate::models::SensorReadings;

// 16-bit Environmental Sensing Service UUID on the Bluetooth base UUID,
// the key BlueZ uses for the peripheral's service data entry
const ESS_SERVICE_UUID: bluer::Uuid = bluer::Uuid::from_u128(0x0000181A_0000_1000_8000_00805F9B34FB);
const SCAN_DURATION_SECS: u64 = 20; // How long to actively scan for devices

/// Scan for the configured peripheral and decode its advertised readings
///
/// Runs a Bluetooth Low Energy discovery pass for a fixed duration, then
/// looks up the configured device and decodes the Environmental Sensing
/// Service data it advertised. Other peripherals seen during the pass
/// are ignored.
///
/// # Arguments
/// * `config` - Configuration naming the target device
///
/// # Returns
/// Result containing the decoded readings if the device advertised them
/// during this pass, or error if the scan itself fails
pub async fn scan_for_readings(
    config: &MonitorConfig,
) -> Result<Option<SensorReadings>, Box<dyn std::error::Error>> {
    // Initialize Bluetooth session
    let session = match bluer::Session::new().await {
        Ok(session) => session,
        Err(e) => {
            error!("Failed to create Bluetooth session: {}", e);
            return Err(e.into());
        }
    };

    // Get the default Bluetooth adapter
    let adapter = match session.default_adapter().await {
        Ok(adapter) => adapter,
        Err(e) => {
            error!("Failed to get default Bluetooth adapter: {}", e);
            return Err(e.into());
        }
    };

    // Ensure Bluetooth adapter is powered on
    if let Err(e) = adapter.set_powered(true).await {
        error!("Failed to power on adapter: {}", e);
        return Err(e.into());
    }

    // Configure discovery filter for Low Energy devices only
    let filter = bluer::DiscoveryFilter {
        transport: bluer::DiscoveryTransport::Le, // Bluetooth Low Energy only
        duplicate_data: false,                    // Filter out duplicate advertisements
        ..Default::default()
    };

    // Apply the discovery filter (warn if it fails, but continue)
    if let Err(e) = adapter.set_discovery_filter(filter).await {
        warn!("Failed to set discovery filter: {}", e);
    }

    // Start device discovery in background
    let discovery_handle = {
        match adapter.discover_devices().await {
            Ok(discovery_stream) => tokio::spawn(async move {
                let mut stream = discovery_stream;
                while let Some(event) = stream.next().await {
                    debug!("Discovery event: {:?}", event);
                }
            }),
            Err(e) => {
                error!("Failed to start device discovery: {}", e);
                return Err(e.into());
            }
        }
    };

    // Let discovery run for the configured duration
    sleep(Duration::from_secs(SCAN_DURATION_SECS)).await;

    // Stop discovery
    discovery_handle.abort();

    // Get all discovered device addresses
    let devices = match adapter.device_addresses().await {
        Ok(devices) => devices,
        Err(e) => {
            error!("Failed to get device addresses: {}", e);
            return Err(e.into());
        }
    };

    // Look for the configured peripheral among the discovered devices
    for addr in devices {
        let device = match adapter.device(addr) {
            Ok(device) => device,
            Err(_) => continue,
        };

        let addr_str = device.address().to_string().to_uppercase();
        if addr_str != config.device_mac {
            continue;
        }

        match device.service_data().await {
            Ok(Some(service_data)) => {
                if let Some(payload) = service_data.get(&ESS_SERVICE_UUID) {
                    match decode_service_data(payload) {
                        Ok(readings) => {
                            debug!(
                                "Received data from {}: pressure={:.1} Pa, humidity={:.2}%, temperature={:.2}\u{00B0}C, lux={}",
                                addr_str,
                                readings.pressure_pascals,
                                readings.humidity_percent,
                                readings.temperature_celsius,
                                readings.lux
                            );
                            return Ok(Some(readings));
                        }
                        Err(e) => {
                            warn!("Invalid service data from {}: {}", addr_str, e);
                        }
                    }
                } else {
                    debug!(
                        "No environmental sensing service data for {} ({} entries)",
                        addr_str,
                        service_data.len()
                    );
                }
            }
            Ok(None) => {
                debug!("No service data for {}", addr_str);
            }
            Err(e) => {
                debug!("Failed to get service data for {}: {}", addr_str, e);
            }
        }
    }

    Ok(None)
}
