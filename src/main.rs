use log::{error, info, warn};
use time::OffsetDateTime;
use tokio::time::{sleep, Duration};

use ess_monitor::bluetooth::scanner::scan_for_readings;
use ess_monitor::config::MonitorConfig;
use ess_monitor::models::SensorReadings;
use ess_monitor::utils::{
    celsius_to_fahrenheit, duration_to_seconds, format_datetime, pascals_to_atm, pascals_to_mmhg,
};

const POLL_INTERVAL_SECS: u64 = 30;
const SCAN_DURATION_SECS: u64 = 20;

/// Log one set of readings in engineering units
fn log_readings(config: &MonitorConfig, readings: &SensorReadings) {
    let mmhg = pascals_to_mmhg(readings.pressure_pascals);
    let atm = pascals_to_atm(readings.pressure_pascals);
    let fahrenheit = celsius_to_fahrenheit(readings.temperature_celsius);

    info!("Readings from {}:", config.device_name);
    info!(
        "  Pressure: {} Pa ({:.2} mmHg, {:.4} atm)",
        readings.pressure_pascals, mmhg, atm
    );
    info!("  Humidity: {}%", readings.humidity_percent);
    info!(
        "  Temperature: {:.1}\u{00B0}C ({:.1}\u{00B0}F)",
        readings.temperature_celsius, fahrenheit
    );
    info!("  Light level: {} lux", readings.lux);
    info!(
        "  Immediate acceleration: {}",
        readings.acceleration_immediate
    );
    info!(
        "  Interval acceleration: {}",
        readings.acceleration_interval
    );
}

async fn main_loop(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        "Starting environmental sensing monitor for {} ({})",
        config.device_name, config.device_mac
    );

    // Timestamp of the most recent successful reading
    let mut last_update: Option<OffsetDateTime> = None;

    loop {
        match scan_for_readings(&config).await {
            Ok(Some(readings)) => {
                last_update = Some(OffsetDateTime::now_utc());
                log_readings(&config, &readings);

                if !config.steady_scan {
                    info!("Steady scan disabled, stopping after first reading");
                    return Ok(());
                }
            }
            Ok(None) => match last_update {
                Some(timestamp) => {
                    let age = duration_to_seconds(OffsetDateTime::now_utc() - timestamp);
                    warn!(
                        "No reading this pass, last update {} ({} seconds ago)",
                        format_datetime(&timestamp),
                        age
                    );
                }
                None => warn!("No reading this pass, nothing received yet"),
            },
            Err(e) => error!("Scan failed: {}", e),
        }

        // Wait until the next poll, accounting for the scan duration
        let sleep_time = POLL_INTERVAL_SECS.saturating_sub(SCAN_DURATION_SECS);
        if sleep_time > 0 {
            sleep(Duration::from_secs(sleep_time)).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    // Handle Ctrl+C gracefully
    let (tx, mut rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to listen for Ctrl+C");
        let _ = tx.send(());
    });

    // Run main loop or wait for shutdown signal
    tokio::select! {
        result = main_loop(config) => {
            match result {
                Ok(_) => info!("Program completed successfully"),
                Err(e) => error!("Fatal error: {}", e),
            }
        }
        _ = &mut rx => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
