use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Err` carrying every error when the config cannot be used.
    pub fn into_result(self) -> std::result::Result<(), ConfigError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(ConfigError::Invalid(self.error_summary()))
        }
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Unit system requested from the backend and used for display suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Imperial,
    Metric,
}

impl Units {
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
        }
    }

    /// Letter shown after the degree sign.
    pub fn temperature_suffix(self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
        }
    }

    pub fn wind_speed_suffix(self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric => "km/h",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Forecast backend settings
    pub backend: BackendConfig,

    #[serde(default)]
    pub forecast: ForecastConfig,

    #[serde(default)]
    pub explain: ExplainConfig,

    #[serde(default)]
    pub geocode: GeocodeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL serving /get-forecast, /get-summary, /get-tropical-summary and /explain-text
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_backend_timeout")]
    pub timeout_secs: u64,
}

fn default_backend_timeout() -> u64 {
    60
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: default_backend_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Units preselected in the form
    #[serde(default)]
    pub units: Units,

    /// Expertise level preselected in the form
    #[serde(default = "default_expertise")]
    pub expertise: String,

    /// Minimum seconds between two accepted form submissions
    #[serde(default = "default_submit_cooldown")]
    pub submit_cooldown_secs: u64,

    /// Number of period panels present on the page (1..=6)
    #[serde(default = "default_panels")]
    pub panels: usize,
}

fn default_expertise() -> String {
    "none".to_string()
}

fn default_submit_cooldown() -> u64 {
    15
}

fn default_panels() -> usize {
    3
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            units: Units::default(),
            expertise: default_expertise(),
            submit_cooldown_secs: default_submit_cooldown(),
            panels: default_panels(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainConfig {
    /// Delay after a pointer release before the selection is inspected
    #[serde(default = "default_pointer_release_delay")]
    pub pointer_release_delay_ms: u64,

    /// Delay after a selection change; longer to let touch drags settle
    #[serde(default = "default_selection_change_delay")]
    pub selection_change_delay_ms: u64,
}

fn default_pointer_release_delay() -> u64 {
    400
}

fn default_selection_change_delay() -> u64 {
    1000
}

impl Default for ExplainConfig {
    fn default() -> Self {
        Self {
            pointer_release_delay_ms: default_pointer_release_delay(),
            selection_change_delay_ms: default_selection_change_delay(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Nominatim-compatible reverse geocoding endpoint
    #[serde(default = "default_reverse_url")]
    pub reverse_url: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_geocode_timeout")]
    pub timeout_secs: u64,
}

fn default_reverse_url() -> String {
    "https://nominatim.openstreetmap.org/reverse".to_string()
}

fn default_user_agent() -> String {
    "WeatherBearApp/1.0".to_string()
}

fn default_geocode_timeout() -> u64 {
    10
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            reverse_url: default_reverse_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_geocode_timeout(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("weatherbear");

        Self {
            config_dir,
            backend: BackendConfig::default(),
            forecast: ForecastConfig::default(),
            explain: ExplainConfig::default(),
            geocode: GeocodeConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, writing defaults there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.backend.base_url, "backend.base_url", &mut result);
        self.validate_url(&self.geocode.reverse_url, "geocode.reverse_url", &mut result);

        if self.backend.timeout_secs == 0 {
            result.add_error("backend.timeout_secs", "Timeout must be greater than 0");
        }

        if self.forecast.submit_cooldown_secs == 0 {
            result.add_warning(
                "forecast.submit_cooldown_secs",
                "Submission cooldown disabled (0 seconds)",
            );
        } else if self.forecast.submit_cooldown_secs > 300 {
            result.add_warning(
                "forecast.submit_cooldown_secs",
                "Submission cooldown is more than 5 minutes",
            );
        }

        if self.forecast.panels == 0 || self.forecast.panels > 6 {
            result.add_error("forecast.panels", "Panel count must be between 1 and 6");
        }

        if self.forecast.expertise.trim().is_empty() {
            result.add_warning("forecast.expertise", "No expertise level set");
        }

        if self.explain.pointer_release_delay_ms == 0 || self.explain.selection_change_delay_ms == 0
        {
            result.add_warning(
                "explain",
                "A zero selection delay fires explanations mid-selection",
            );
        }

        if self.geocode.user_agent.trim().is_empty() {
            result.add_error("geocode.user_agent", "Nominatim requires a user agent");
        }

        result
    }

    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weatherbear");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
    }

    #[test]
    fn test_invalid_backend_url() {
        let mut config = Config::default();
        config.backend.base_url = "not-a-url".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "backend.base_url"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.geocode.reverse_url = "ftp://example.com/reverse".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_zero_cooldown_is_warning() {
        let mut config = Config::default();
        config.forecast.submit_cooldown_secs = 0;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result
            .warnings
            .iter()
            .any(|w| w.field == "forecast.submit_cooldown_secs"));
    }

    #[test]
    fn test_panel_count_bounds() {
        let mut config = Config::default();
        config.forecast.panels = 7;
        assert!(!config.validate().is_valid());
        config.forecast.panels = 6;
        assert!(config.validate().is_valid());
    }

    #[test]
    fn test_units_suffixes() {
        assert_eq!(Units::Metric.as_str(), "metric");
        assert_eq!(Units::Metric.temperature_suffix(), "C");
        assert_eq!(Units::Imperial.wind_speed_suffix(), "mph");
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config.forecast.submit_cooldown_secs, 15);
        assert_eq!(config.explain.pointer_release_delay_ms, 400);
    }

    #[test]
    fn test_partial_file_uses_section_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
config_dir = "/tmp/weatherbear"

[backend]
base_url = "https://wx.example.com"

[forecast]
units = "metric"
panels = 6
"#,
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.backend.base_url, "https://wx.example.com");
        assert_eq!(config.backend.timeout_secs, 60);
        assert_eq!(config.forecast.units, Units::Metric);
        assert_eq!(config.forecast.panels, 6);
        assert_eq!(config.forecast.submit_cooldown_secs, 15);
        assert_eq!(config.geocode.user_agent, "WeatherBearApp/1.0");
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_invalid_config_into_result() {
        let mut config = Config::default();
        config.backend.timeout_secs = 0;
        let err = config.validate().into_result().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(ref s) if s.contains("backend.timeout_secs")));
        assert!(Config::default().validate().into_result().is_ok());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[backend\nbase_url = ").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::ParseError(_))
        ));
    }
}
