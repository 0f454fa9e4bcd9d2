//! # Registration Runtime
//!
//! Composes and submits one SuiNS registration or renewal.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (`NS_LOG_LEVEL`, `NS_JSON_LOGS`, ...)
//! 2. Load configuration (`NS_CONFIG_JSON` and overrides)
//! 3. Read the request from `NS_REQUEST_JSON`
//! 4. Compose, submit through the dry-run submitter, print the outcome

use anyhow::{Context, Result};
use ns_runtime::{load_request, RegistrationRuntime};
use ns_telemetry::{gather_metrics, init_telemetry, TelemetryConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let request = load_request()?;
    let runtime = RegistrationRuntime::from_env()?;

    let outcome = runtime.run_once(request).await?;
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome).context("Failed to render outcome")?
    );

    if std::env::var("NS_PRINT_METRICS").is_ok() {
        print!("{}", gather_metrics().context("Failed to gather metrics")?);
    }

    info!("Done");
    Ok(())
}
