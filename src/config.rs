use std::env;

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub device_mac: String,
    pub device_name: String,
    pub steady_scan: bool,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        // Load environment variables
        dotenv::dotenv().ok();

        let device_mac = env::var("DEVICE_MAC")
            .map_err(|_| "DEVICE_MAC environment variable not set")?
            .trim()
            .to_uppercase();
        if device_mac.is_empty() {
            return Err("DEVICE_MAC must not be empty".into());
        }

        let device_name = env::var("DEVICE_NAME")
            .ok()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "ESS sensor".to_string());

        // Keep scanning after the first reading unless explicitly disabled
        let steady_scan = match env::var("STEADY_SCAN") {
            Ok(value) => matches!(
                value.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            ),
            Err(_) => true,
        };

        Ok(MonitorConfig {
            device_mac,
            device_name,
            steady_scan,
        })
    }
}
