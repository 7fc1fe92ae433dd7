use std::path::PathBuf;

use anyhow::{Context, Result};
use bear_core::{AppError, Config, Units};
use bear_ui::{Frontend, SubmitOutcome};
use bear_weather::{Coordinates, FixedGeolocation, NoGeolocation};
use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "weatherbear")]
#[command(about = "Fetch a WeatherBear forecast and print the rendered page")]
#[command(version)]
struct Cli {
    /// City, address or place name
    #[arg(short, long)]
    location: Option<String>,

    /// Detected latitude; used when no location is given
    #[arg(long, requires = "longitude", allow_hyphen_values = true)]
    latitude: Option<f64>,

    /// Detected longitude; used when no location is given
    #[arg(long, requires = "latitude", allow_hyphen_values = true)]
    longitude: Option<f64>,

    /// Temperature and wind units
    #[arg(short, long, value_enum)]
    units: Option<UnitsOpt>,

    /// Summary expertise level (none, expert, ...)
    #[arg(short, long)]
    expertise: Option<String>,

    /// Backend base URL
    #[arg(long, env = "WEATHERBEAR_BACKEND")]
    backend: Option<String>,

    /// Also load the tropical outlooks
    #[arg(long)]
    tropical: bool,

    /// Config file, instead of the one in the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum UnitsOpt {
    Imperial,
    Metric,
}

impl From<UnitsOpt> for Units {
    fn from(value: UnitsOpt) -> Self {
        match value {
            UnitsOpt::Imperial => Units::Imperial,
            UnitsOpt::Metric => Units::Metric,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    bear_core::init()?;
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(backend) = cli.backend {
        config.backend.base_url = backend;
    }
    if let Some(units) = cli.units {
        config.forecast.units = units.into();
    }
    if let Some(expertise) = cli.expertise {
        config.forecast.expertise = expertise;
    }

    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config: {}", warning);
    }
    if let Err(err) = validation.into_result() {
        let err = AppError::from(err);
        eprintln!("{}", err.user_message());
        return Err(err.into());
    }

    let app = Frontend::from_config(&config).context("Failed to create backend client")?;
    tracing::info!("WeatherBear started against {}", config.backend.base_url);
    tracing::debug!("Config directory: {}", config.config_dir.display());

    let prefill = match (cli.latitude, cli.longitude) {
        (Some(latitude), Some(longitude)) => {
            app.prefill_location(&FixedGeolocation(Coordinates {
                latitude,
                longitude,
            }))
            .await
        }
        _ => app.prefill_location(&NoGeolocation).await,
    };
    tracing::debug!("Location prefill: {:?}", prefill);

    if let Some(location) = cli.location {
        app.page().lock().form.location = location;
    }

    if cli.tropical {
        let loaded = app.tropical().load_defaults().await;
        tracing::info!("Loaded {} tropical outlook(s)", loaded);
    }

    let outcome = app.submit().submit().await;
    if let Some(alert) = app.page().lock().take_blocking_alert() {
        eprintln!("{}", alert);
    }

    println!("{}", app.render());

    if outcome != SubmitOutcome::Completed {
        let message = app
            .page()
            .lock()
            .error
            .message()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{:?}", outcome));
        anyhow::bail!(message);
    }
    Ok(())
}
