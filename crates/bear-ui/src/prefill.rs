//! Fill the location form from the device position.

use bear_weather::{Geolocator, ReverseGeocoder};

use crate::page::SharedPage;

pub const DETECTED_STATUS: &str = "Location auto-detected! You may edit it if needed.";
pub const FAILED_STATUS: &str = "Unable to auto-detect location. Please enter manually.";
pub const UNSUPPORTED_STATUS: &str = "Geolocation not supported. Please enter location manually.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefillOutcome {
    Detected,
    Failed,
    Unsupported,
}

/// Never blocks manual entry: every failure only sets a status line.
pub async fn prefill_location<G: Geolocator>(
    locator: &G,
    geocoder: Option<&ReverseGeocoder>,
    page: &SharedPage,
) -> PrefillOutcome {
    if !locator.is_supported() {
        page.lock().form.geo_status = UNSUPPORTED_STATUS.to_string();
        return PrefillOutcome::Unsupported;
    }

    let coords = match locator.current_position().await {
        Ok(coords) => coords,
        Err(e) => {
            tracing::warn!("Geolocation error: {}", e);
            page.lock().form.geo_status = FAILED_STATUS.to_string();
            return PrefillOutcome::Failed;
        }
    };
    tracing::info!("Got location: {}, {}", coords.latitude, coords.longitude);

    {
        let mut page = page.lock();
        page.form.latitude = coords.latitude.to_string();
        page.form.longitude = coords.longitude.to_string();
        page.form.location_optional = true;
    }

    if let Some(geocoder) = geocoder {
        if let Some(place) = geocoder.reverse(&coords).await {
            page.lock().form.location = place;
        }
    }

    page.lock().form.geo_status = DETECTED_STATUS.to_string();
    PrefillOutcome::Detected
}
