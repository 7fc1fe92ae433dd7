//! Reverse geocoding: turn detected coordinates into a city name for the form.
//! Talks to Nominatim (OpenStreetMap) or anything answering in its format.

use crate::types::Coordinates;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct NominatimResponse {
    address: Option<NominatimAddress>,
}

#[derive(Debug, Deserialize)]
struct NominatimAddress {
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    state: Option<String>,
}

impl NominatimAddress {
    /// First non-blank of city, town, village, state.
    fn place_name(self) -> Option<String> {
        [self.city, self.town, self.village, self.state]
            .into_iter()
            .flatten()
            .find(|p| !p.trim().is_empty())
    }
}

#[derive(Debug, Clone)]
pub struct ReverseGeocoder {
    client: Client,
    reverse_url: String,
}

impl ReverseGeocoder {
    /// Returns `None` if the HTTP client cannot be built.
    pub fn new(reverse_url: &str, user_agent: &str, timeout: Duration) -> Option<Self> {
        let client = match Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
        {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!("Failed to create geocoding client: {}", e);
                return None;
            }
        };

        Some(Self {
            client,
            reverse_url: reverse_url.to_string(),
        })
    }

    pub fn from_config(config: &bear_core::GeocodeConfig) -> Option<Self> {
        Self::new(
            &config.reverse_url,
            &config.user_agent,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Best place name for the coordinates: city, then town, village, state.
    /// Returns `None` on any failure so the caller can leave the field empty.
    pub async fn reverse(&self, coords: &Coordinates) -> Option<String> {
        let url = format!(
            "{}?format=json&lat={}&lon={}",
            self.reverse_url, coords.latitude, coords.longitude
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Reverse geocoding failed: {}", e);
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::debug!("Reverse geocode returned status {}", response.status());
            return None;
        }

        let body: NominatimResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => {
                tracing::debug!("Reverse geocode parse error: {}", e);
                return None;
            }
        };

        let place = body.address?.place_name()?;

        tracing::info!("Reverse geocoded to: {}", place);
        Some(place)
    }
}
