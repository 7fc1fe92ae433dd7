//! Centralized error types for the WeatherBear front end.
//!
//! Every failure is recovered at a controller boundary and turned into a
//! message for the page. `user_message()` gives that message; the `Display`
//! impl keeps the detail for logs.

use thiserror::Error;

/// Shown for any transport or parse failure while fetching a forecast.
pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to reach the weather service. Check your connection and try again.";

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Forecast service error: {0}")]
    Forecast(#[from] ForecastError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

impl AppError {
    /// Returns a message suitable for the page's error region.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(e) => e.user_message().to_string(),
            AppError::Config(e) => e.user_message().to_string(),
            AppError::Forecast(e) => e.user_message(),
            AppError::Input(e) => e.user_message(),
        }
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => CONNECTIVITY_MESSAGE,
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The server is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Errors reported by, or while reading from, the forecast backend.
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The backend answered with an `error` field; the text is shown as-is.
    #[error("Backend reported: {0}")]
    Reported(String),

    /// Non-2xx answer whose JSON body carried no `error` field.
    #[error("Backend returned status {0}")]
    Status(u16),

    /// Body was not JSON or did not have the expected shape.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ForecastError {
    pub fn user_message(&self) -> String {
        match self {
            ForecastError::Reported(message) => message.clone(),
            ForecastError::Status(_) => "Something went wrong.".to_string(),
            ForecastError::UnexpectedResponse(_) => "Unexpected response from server.".to_string(),
        }
    }
}

/// Problems with what the user entered; no request is made.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("No location provided")]
    MissingLocation,

    #[error("Submitted again {remaining_secs}s before the cooldown ended")]
    CoolingDown { window_secs: u64, remaining_secs: u64 },

    #[error("Unknown tropical region: {0}")]
    UnknownRegion(String),
}

impl InputError {
    pub fn user_message(&self) -> String {
        match self {
            InputError::MissingLocation => "No location provided".to_string(),
            InputError::CoolingDown { window_secs, .. } => format!(
                "Please wait at least {} seconds before submitting again.",
                window_secs
            ),
            InputError::UnknownRegion(region) => format!("Unknown region: {}", region),
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}
