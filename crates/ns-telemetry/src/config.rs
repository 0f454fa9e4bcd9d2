//! Telemetry configuration from environment variables.

use std::env;

/// Configuration for logging and metrics.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every log line
    pub service_name: String,

    /// Log level filter (trace, debug, info, warn, error) or a full directive
    pub log_level: String,

    /// Whether to enable console output
    pub console_output: bool,

    /// Whether to enable JSON formatted logs
    pub json_logs: bool,

    /// Network identifier (testnet, mainnet, devnet)
    pub network: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "ns-registration".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
            network: "testnet".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `NS_SERVICE_NAME`: Service name (default: ns-registration)
    /// - `NS_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `NS_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `NS_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    /// - `NS_NETWORK`: Network name (default: testnet)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("NS_SERVICE_NAME")
                .unwrap_or_else(|_| "ns-registration".to_string()),

            log_level: env::var("NS_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("NS_CONSOLE_OUTPUT")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),

            json_logs: env::var("NS_JSON_LOGS")
                .map(|v| parse_flag(&v))
                .unwrap_or(is_container),

            network: env::var("NS_NETWORK").unwrap_or_else(|_| "testnet".to_string()),
        }
    }

    /// Service name qualified with the network, e.g. `ns-registration-mainnet`.
    pub fn full_service_name(&self) -> String {
        format!("{}-{}", self.service_name, self.network)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.to_lowercase().as_str(), "true" | "1" | "yes")
}
