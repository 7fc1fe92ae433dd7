use crate::services::FrontendError;
use bear_core::{AppError, ForecastError, NetworkError};

impl From<FrontendError> for AppError {
    fn from(e: FrontendError) -> Self {
        match e {
            FrontendError::Connection(s) => AppError::Network(NetworkError::ConnectionFailed(s)),
            FrontendError::Timeout => AppError::Network(NetworkError::Timeout),
            FrontendError::Reported(s) => AppError::Forecast(ForecastError::Reported(s)),
            FrontendError::Status(code) => AppError::Forecast(ForecastError::Status(code)),
            FrontendError::Unexpected(s) => {
                AppError::Forecast(ForecastError::UnexpectedResponse(s))
            }
            FrontendError::NotInitialized => AppError::Network(NetworkError::ConnectionFailed(
                "async runtime not available".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bear_core::CONNECTIVITY_MESSAGE;

    #[test]
    fn summary_failures_map_to_page_messages() {
        let message = |e: FrontendError| AppError::from(e).user_message();

        assert_eq!(message(FrontendError::Reported("Bad location".into())), "Bad location");
        assert_eq!(message(FrontendError::Status(500)), "Something went wrong.");
        assert_eq!(
            message(FrontendError::Unexpected("<html>".into())),
            "Unexpected response from server."
        );
        assert_eq!(
            message(FrontendError::Connection("refused".into())),
            CONNECTIVITY_MESSAGE
        );
    }
}
