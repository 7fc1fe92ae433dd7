//! Form submission: cooldown, validation, forecast, then summary.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use bear_core::{AppError, InputError, SubmitCooldown};
use bear_weather::{BackendClient, Coordinates, ForecastRequest, SummaryRequest};
use parking_lot::Mutex;

use crate::explain::{ExplainContext, ExplainController};
use crate::forecast::ForecastController;
use crate::page::{FormView, SharedPage};
use crate::services::FrontendError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected by the cooldown; nothing was sent.
    CoolingDown { remaining_secs: u64 },
    /// Neither a location nor coordinates; nothing was sent.
    MissingLocation,
    ForecastFailed,
    SummaryFailed,
    Completed,
}

/// Requests for the current form contents. A typed location wins and
/// clears any detected coordinates.
pub fn build_requests(
    form: &mut FormView,
) -> Result<(ForecastRequest, SummaryRequest), InputError> {
    let location = form.location.trim().to_string();

    let forecast = if !location.is_empty() {
        form.latitude.clear();
        form.longitude.clear();
        ForecastRequest::for_location(location.clone(), form.units)
    } else {
        let latitude = form.latitude.trim().parse::<f64>();
        let longitude = form.longitude.trim().parse::<f64>();
        match (latitude, longitude) {
            (Ok(latitude), Ok(longitude)) => ForecastRequest::for_coordinates(
                Coordinates {
                    latitude,
                    longitude,
                },
                form.units,
            ),
            _ => return Err(InputError::MissingLocation),
        }
    };

    let summary = SummaryRequest {
        location,
        latitude: form.latitude.trim().to_string(),
        longitude: form.longitude.trim().to_string(),
        units: form.units,
        expertise: form.expertise.clone(),
    };
    Ok((forecast, summary))
}

pub struct SubmitHandler {
    client: BackendClient,
    page: SharedPage,
    forecast: Arc<ForecastController>,
    explain: Arc<ExplainController>,
    cooldown: Mutex<SubmitCooldown>,
    /// Submissions past validation and not yet finished. Only touched
    /// under the page lock.
    in_flight: AtomicUsize,
}

impl SubmitHandler {
    pub fn new(
        client: BackendClient,
        page: SharedPage,
        forecast: Arc<ForecastController>,
        explain: Arc<ExplainController>,
        cooldown: SubmitCooldown,
    ) -> Self {
        Self {
            client,
            page,
            forecast,
            explain,
            cooldown: Mutex::new(cooldown),
            in_flight: AtomicUsize::new(0),
        }
    }

    pub async fn submit(&self) -> SubmitOutcome {
        self.submit_at(Instant::now()).await
    }

    /// Run one submission as if the button were pressed at `now`.
    pub async fn submit_at(&self, now: Instant) -> SubmitOutcome {
        let rejection = {
            let mut cooldown = self.cooldown.lock();
            cooldown
                .try_submit(now)
                .err()
                .map(|rejected| cooldown.rejection(rejected))
        };
        if let Some(err) = rejection {
            tracing::info!("Submission blocked: {}", err);
            let remaining_secs = match &err {
                InputError::CoolingDown { remaining_secs, .. } => *remaining_secs,
                _ => 0,
            };
            self.page.lock().blocking_alert = Some(err.user_message());
            return SubmitOutcome::CoolingDown { remaining_secs };
        }

        let requests = {
            let mut page = self.page.lock();
            match build_requests(&mut page.form) {
                Ok(requests) => {
                    self.in_flight.fetch_add(1, Ordering::SeqCst);
                    page.form.busy = true;
                    Ok(requests)
                }
                Err(err) => {
                    page.error.show(err.user_message());
                    Err(err)
                }
            }
        };
        let Ok((forecast_request, summary_request)) = requests else {
            return SubmitOutcome::MissingLocation;
        };

        let outcome = self.run(&forecast_request, &summary_request).await;
        let mut page = self.page.lock();
        if self.in_flight.fetch_sub(1, Ordering::SeqCst) == 1 {
            page.form.busy = false;
        }
        outcome
    }

    /// Accepted submissions still waiting on the backend.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    async fn run(&self, forecast: &ForecastRequest, summary: &SummaryRequest) -> SubmitOutcome {
        if !self.forecast.fetch_and_render_forecast(forecast).await {
            return SubmitOutcome::ForecastFailed;
        }

        match self.client.get_summary(summary).await {
            Ok(reply) => {
                {
                    let mut page = self.page.lock();
                    page.error.clear();
                    page.form.condensed = true;
                    page.summary.show(reply.summary.clone());
                }
                self.explain.reset(ExplainContext {
                    summary: reply.summary,
                    afd: reply.afd.unwrap_or_default(),
                    expertise: summary.expertise.clone(),
                });
                tracing::info!("Summary loaded");
                SubmitOutcome::Completed
            }
            Err(e) => {
                let message = AppError::from(FrontendError::from(e)).user_message();
                tracing::warn!("Summary failed: {}", message);
                self.page.lock().error.show(message);
                SubmitOutcome::SummaryFailed
            }
        }
    }
}
