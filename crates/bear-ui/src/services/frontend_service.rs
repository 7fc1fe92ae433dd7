//! Background submissions and tropical fetches.
//! Work runs on the tokio runtime; results come back as messages.

use std::sync::Arc;
use std::time::Instant;

use bear_core::{NetworkError, ReqwestErrorExt};
use bear_weather::{TropicalRegion, WeatherError};

use crate::submit::{SubmitHandler, SubmitOutcome};
use crate::tropical::TropicalController;

/// Error type for front-end service operations
#[derive(Debug, Clone)]
pub enum FrontendError {
    Connection(String),
    Timeout,
    Reported(String),
    Status(u16),
    Unexpected(String),
    NotInitialized,
}

impl FrontendError {
    /// Failures that produced no readable answer from the backend.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            FrontendError::Connection(_)
                | FrontendError::Timeout
                | FrontendError::Unexpected(_)
                | FrontendError::NotInitialized
        )
    }
}

impl std::fmt::Display for FrontendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrontendError::Connection(s) => write!(f, "Connection error: {}", s),
            FrontendError::Timeout => write!(f, "Request timed out"),
            FrontendError::Reported(s) => write!(f, "Backend error: {}", s),
            FrontendError::Status(code) => write!(f, "Backend returned status {}", code),
            FrontendError::Unexpected(s) => write!(f, "Unexpected response: {}", s),
            FrontendError::NotInitialized => write!(f, "Async runtime not available"),
        }
    }
}

impl std::error::Error for FrontendError {}

impl From<WeatherError> for FrontendError {
    fn from(e: WeatherError) -> Self {
        match e {
            WeatherError::Network(e) => match e.into_network_error() {
                NetworkError::Timeout => FrontendError::Timeout,
                other => FrontendError::Connection(other.to_string()),
            },
            WeatherError::Reported(message) => FrontendError::Reported(message),
            WeatherError::Status(code) => FrontendError::Status(code),
            WeatherError::UnexpectedResponse(detail) => FrontendError::Unexpected(detail),
        }
    }
}

/// Messages sent from background work back to the host
#[derive(Debug)]
pub enum FrontendMessage {
    SubmitDone(Result<SubmitOutcome, FrontendError>),
    TropicalDone {
        region: TropicalRegion,
        loaded: bool,
    },
}

/// Run a submission in the background, stamped with the current time.
/// Sends `SubmitDone` on the channel when complete.
pub fn request_submit(tx: &std::sync::mpsc::Sender<FrontendMessage>, handler: Arc<SubmitHandler>) {
    request_submit_at(tx, handler, Instant::now());
}

pub fn request_submit_at(
    tx: &std::sync::mpsc::Sender<FrontendMessage>,
    handler: Arc<SubmitHandler>,
    now: Instant,
) {
    let tx = tx.clone();
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(r) => r,
        Err(_) => {
            let _ = tx.send(FrontendMessage::SubmitDone(Err(FrontendError::NotInitialized)));
            return;
        }
    };

    runtime.spawn(async move {
        let outcome = handler.submit_at(now).await;
        tracing::debug!("Submission finished: {:?}", outcome);
        let _ = tx.send(FrontendMessage::SubmitDone(Ok(outcome)));
    });
}

/// Fetch a region's tropical summary in the background.
pub fn request_tropical(
    tx: &std::sync::mpsc::Sender<FrontendMessage>,
    controller: Arc<TropicalController>,
    region: TropicalRegion,
    expertise: String,
) {
    let tx = tx.clone();
    let runtime = match tokio::runtime::Handle::try_current() {
        Ok(r) => r,
        Err(_) => {
            let _ = tx.send(FrontendMessage::TropicalDone {
                region,
                loaded: false,
            });
            return;
        }
    };

    runtime.spawn(async move {
        let loaded = controller.fetch_summary(region, &expertise).await;
        let _ = tx.send(FrontendMessage::TropicalDone { region, loaded });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontend_error_display() {
        assert!(format!("{}", FrontendError::Connection("refused".into())).contains("Connection"));
        assert!(format!("{}", FrontendError::Status(502)).contains("502"));
        assert!(format!("{}", FrontendError::NotInitialized).contains("not available"));
    }

    #[test]
    fn transport_classification() {
        assert!(FrontendError::Timeout.is_transport());
        assert!(FrontendError::Unexpected("html".into()).is_transport());
        assert!(!FrontendError::Reported("bad".into()).is_transport());
        assert!(!FrontendError::Status(500).is_transport());
    }

    #[test]
    fn reported_error_passes_through() {
        let err = FrontendError::from(WeatherError::Reported("Location not found".into()));
        assert!(matches!(err, FrontendError::Reported(ref m) if m == "Location not found"));
    }
}
