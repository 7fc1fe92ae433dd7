//! HTTP client for the forecast backend.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::types::{
    ExplainRequest, ExplainResponse, ForecastRequest, ForecastResponse, SummaryRequest,
    SummaryResponse, TropicalRegion, TropicalSummaryRequest, TropicalSummaryResponse,
    WeatherError,
};

const FORECAST_PATH: &str = "/get-forecast";
const SUMMARY_PATH: &str = "/get-summary";
const TROPICAL_SUMMARY_PATH: &str = "/get-tropical-summary";
const EXPLAIN_PATH: &str = "/explain-text";

#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WeatherError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &bear_core::BackendConfig) -> Result<Self, WeatherError> {
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Fetch current conditions, periods and alerts.
    #[instrument(skip(self), level = "info")]
    pub async fn get_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResponse, WeatherError> {
        let response = self
            .client
            .post(self.url(FORECAST_PATH))
            .json(request)
            .send()
            .await?;

        read_reply(response).await
    }

    /// Fetch the narrative summary and the discussion it was written from.
    #[instrument(skip(self), level = "info")]
    pub async fn get_summary(
        &self,
        request: &SummaryRequest,
    ) -> Result<SummaryResponse, WeatherError> {
        let response = self
            .client
            .post(self.url(SUMMARY_PATH))
            .form(request)
            .send()
            .await?;

        read_reply(response).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn get_tropical_summary(
        &self,
        region: TropicalRegion,
        expertise: &str,
    ) -> Result<TropicalSummaryResponse, WeatherError> {
        let body = TropicalSummaryRequest {
            region: region.backend_name().to_string(),
            expertise: expertise.to_string(),
        };
        self.post_json(TROPICAL_SUMMARY_PATH, &body).await
    }

    #[instrument(skip(self, request), level = "info", fields(chars = request.text.len()))]
    pub async fn explain_text(
        &self,
        request: &ExplainRequest,
    ) -> Result<ExplainResponse, WeatherError> {
        self.post_json(EXPLAIN_PATH, request).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, WeatherError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        read_reply(response).await
    }
}

/// Decode a backend answer.
///
/// An `error` field wins over the status code; a non-2xx answer without one
/// becomes `Status`. Bodies that are not JSON are `UnexpectedResponse`.
async fn read_reply<T: DeserializeOwned>(response: Response) -> Result<T, WeatherError> {
    let status = response.status();
    let text = response.text().await?;

    let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
        tracing::debug!("Backend returned non-JSON body ({}): {}", status, e);
        WeatherError::UnexpectedResponse(e.to_string())
    })?;

    if let Some(message) = reported_error(&value) {
        tracing::warn!("Backend reported error ({}): {}", status, message);
        return Err(WeatherError::Reported(message));
    }

    if !status.is_success() {
        tracing::warn!("Backend returned status {}", status);
        return Err(WeatherError::Status(status.as_u16()));
    }

    serde_json::from_value(value).map_err(|e| WeatherError::UnexpectedResponse(e.to_string()))
}

fn reported_error(value: &serde_json::Value) -> Option<String> {
    ["error", "Error"]
        .iter()
        .filter_map(|key| value.get(*key))
        .find_map(|e| match e {
            serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
            serde_json::Value::String(_)
            | serde_json::Value::Null
            | serde_json::Value::Bool(false) => None,
            other => Some(other.to_string()),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reported_error_variants() {
        assert_eq!(
            reported_error(&json!({ "error": "Location not found" })).as_deref(),
            Some("Location not found")
        );
        assert_eq!(
            reported_error(&json!({ "Error": "boom" })).as_deref(),
            Some("boom")
        );
        assert_eq!(reported_error(&json!({ "error": null })), None);
        assert_eq!(reported_error(&json!({ "error": "" })), None);
        assert_eq!(reported_error(&json!({ "summary": "ok" })), None);
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = BackendClient::new("http://localhost:5000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url(FORECAST_PATH), "http://localhost:5000/get-forecast");
    }
}
