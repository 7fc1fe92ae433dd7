pub mod config;
pub mod cooldown;
pub mod error;

pub use config::{
    BackendConfig, Config, ExplainConfig, ForecastConfig, GeocodeConfig, Units, ValidationResult,
};
pub use cooldown::{CooldownRejected, SubmitCooldown};
pub use error::{
    AppError, ConfigError, ForecastError, InputError, NetworkError, ReqwestErrorExt,
    CONNECTIVITY_MESSAGE,
};

use anyhow::Result;

/// Initialize logging for the front end.
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;

    tracing::info!("WeatherBear core initialized");
    Ok(())
}
