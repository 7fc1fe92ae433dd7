//! One front-end instance: the page plus every controller that drives it.
//!
//! All state is owned here and handed to controllers by `Arc`, so two
//! instances never share anything.

use std::sync::Arc;

use bear_core::{Config, SubmitCooldown};
use bear_weather::{BackendClient, Geolocator, ReverseGeocoder, WeatherError};

use crate::explain::ExplainController;
use crate::forecast::ForecastController;
use crate::page::{Page, SharedPage};
use crate::prefill::{self, PrefillOutcome};
use crate::submit::SubmitHandler;
use crate::tropical::TropicalController;

pub struct Frontend {
    page: SharedPage,
    forecast: Arc<ForecastController>,
    explain: Arc<ExplainController>,
    submit: Arc<SubmitHandler>,
    tropical: Arc<TropicalController>,
    geocoder: Option<ReverseGeocoder>,
}

impl Frontend {
    pub fn from_config(config: &Config) -> Result<Self, WeatherError> {
        let client = BackendClient::from_config(&config.backend)?;
        Ok(Self::with_client(config, client))
    }

    /// Build around an existing client, e.g. one pointed at a test server.
    pub fn with_client(config: &Config, client: BackendClient) -> Self {
        let page = Page::from_config(config).shared();
        let forecast = Arc::new(ForecastController::new(client.clone(), Arc::clone(&page)));
        let explain = Arc::new(ExplainController::new(
            client.clone(),
            Arc::clone(&page),
            &config.explain,
        ));
        let submit = Arc::new(SubmitHandler::new(
            client.clone(),
            Arc::clone(&page),
            Arc::clone(&forecast),
            Arc::clone(&explain),
            SubmitCooldown::from_secs(config.forecast.submit_cooldown_secs),
        ));
        let tropical = Arc::new(TropicalController::new(client, Arc::clone(&page)));

        tracing::info!(
            "Front end ready: {} period panel(s), {}s cooldown",
            config.forecast.panels,
            config.forecast.submit_cooldown_secs
        );

        Self {
            page,
            forecast,
            explain,
            submit,
            tropical,
            geocoder: ReverseGeocoder::from_config(&config.geocode),
        }
    }

    pub fn page(&self) -> &SharedPage {
        &self.page
    }

    pub fn forecast(&self) -> &Arc<ForecastController> {
        &self.forecast
    }

    pub fn explain(&self) -> &Arc<ExplainController> {
        &self.explain
    }

    pub fn submit(&self) -> &Arc<SubmitHandler> {
        &self.submit
    }

    pub fn tropical(&self) -> &Arc<TropicalController> {
        &self.tropical
    }

    /// Page-load geolocation step.
    pub async fn prefill_location<G: Geolocator>(&self, locator: &G) -> PrefillOutcome {
        prefill::prefill_location(locator, self.geocoder.as_ref(), &self.page).await
    }

    /// Current page as HTML.
    pub fn render(&self) -> String {
        self.page.lock().render().into_string()
    }
}
