//! Fetch, render and chart orchestration for the forecast panels.

use std::collections::HashMap;
use std::sync::Arc;

use bear_core::{AppError, Units, CONNECTIVITY_MESSAGE};
use bear_weather::{
    BackendClient, ForecastRequest, ForecastResponse, HourlySample, PeriodSlot, Variable,
};
use parking_lot::Mutex;

use crate::chart::{ClickTarget, SelectionChange};
use crate::page::SharedPage;
use crate::render;
use crate::services::FrontendError;

/// Hourly series of the last successful forecast, per period.
#[derive(Debug, Clone, Default)]
struct HourlyCache {
    units: Units,
    series: HashMap<PeriodSlot, Arc<[HourlySample]>>,
}

impl HourlyCache {
    fn from_forecast(forecast: &ForecastResponse, units: Units) -> Self {
        Self {
            units,
            series: forecast
                .periods()
                .map(|(slot, period)| (slot, Arc::from(period.hourly_forecast.as_slice())))
                .collect(),
        }
    }
}

/// Owns the hourly cache. Lock order is page, then cache.
pub struct ForecastController {
    client: BackendClient,
    page: SharedPage,
    cache: Mutex<Option<HourlyCache>>,
}

impl ForecastController {
    pub fn new(client: BackendClient, page: SharedPage) -> Self {
        Self {
            client,
            page,
            cache: Mutex::new(None),
        }
    }

    /// Fetch and render. On failure the panels are left as they were and
    /// the error region explains why.
    pub async fn fetch_and_render_forecast(&self, request: &ForecastRequest) -> bool {
        tracing::info!("Fetching forecast ({})", request.units);

        let forecast = match self.client.get_forecast(request).await {
            Ok(forecast) => forecast,
            Err(e) => {
                let err = FrontendError::from(e);
                let message = if err.is_transport() {
                    tracing::error!("Forecast fetch failed: {}", err);
                    CONNECTIVITY_MESSAGE.to_string()
                } else {
                    tracing::warn!("Forecast rejected: {}", err);
                    AppError::from(err).user_message()
                };
                self.page.lock().error.show(message);
                return false;
            }
        };

        let mut page = self.page.lock();
        page.error.clear();
        let updated = render::render_forecast(&mut page, &forecast, request.units);
        *self.cache.lock() = Some(HourlyCache::from_forecast(&forecast, request.units));
        drop(page);

        tracing::info!(
            "Forecast rendered: {} panel(s), {} alert(s)",
            updated,
            forecast.alerts.len()
        );
        true
    }

    /// Units of the cached forecast, if one has loaded.
    pub fn cached_units(&self) -> Option<Units> {
        self.cache.lock().as_ref().map(|cache| cache.units)
    }

    pub fn cached_series(&self, slot: PeriodSlot) -> Option<Arc<[HourlySample]>> {
        self.cache
            .lock()
            .as_ref()
            .and_then(|cache| cache.series.get(&slot).cloned())
    }

    /// Show or hide a panel's charts. Returns visibility, or `None` when the
    /// page has no such panel.
    pub fn toggle_chart(&self, slot: PeriodSlot, initial: &[Variable]) -> Option<bool> {
        let mut page = self.page.lock();
        let Some(panel) = page.panel_mut(slot) else {
            tracing::warn!("No {} panel to toggle", slot.id());
            return None;
        };
        let (units, series) = self.snapshot(slot);
        Some(panel.chart.toggle(initial, &series, units))
    }

    /// Selector button press inside an open chart container.
    pub fn select_variable(&self, slot: PeriodSlot, variable: Variable) -> Option<SelectionChange> {
        let mut page = self.page.lock();
        let panel = page.panel_mut(slot)?;
        let (units, series) = self.snapshot(slot);
        panel.chart.select(variable, &series, units)
    }

    /// Click anywhere on a period panel. Buttons and canvases never toggle
    /// the container.
    pub fn click_panel(&self, slot: PeriodSlot, target: ClickTarget) {
        match target {
            ClickTarget::Panel => {
                self.toggle_chart(slot, &[]);
            }
            ClickTarget::SelectorButton(variable) => {
                self.select_variable(slot, variable);
            }
            ClickTarget::Canvas => {}
        }
    }

    fn snapshot(&self, slot: PeriodSlot) -> (Units, Arc<[HourlySample]>) {
        match self.cache.lock().as_ref() {
            Some(cache) => (
                cache.units,
                cache.series.get(&slot).cloned().unwrap_or_else(|| Arc::from(Vec::new())),
            ),
            None => (Units::default(), Arc::from(Vec::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use std::time::Duration;

    fn controller(page: &SharedPage) -> ForecastController {
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        ForecastController::new(client, Arc::clone(page))
    }

    #[test]
    fn test_toggle_without_forecast_draws_empty_chart() {
        let page = Page::new(PeriodSlot::leading(3)).shared();
        let controller = controller(&page);

        assert_eq!(controller.toggle_chart(PeriodSlot::First, &[]), Some(true));
        let page = page.lock();
        let chart = &page.panel(PeriodSlot::First).unwrap().chart;
        assert!(chart.is_rendered());
        assert!(chart.charts()[0].values.is_empty());
    }

    #[test]
    fn test_toggle_missing_panel() {
        let page = Page::new(PeriodSlot::leading(3)).shared();
        let controller = controller(&page);
        assert_eq!(controller.toggle_chart(PeriodSlot::Sixth, &[]), None);
    }

    #[test]
    fn test_canvas_and_button_clicks_do_not_toggle() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let controller = controller(&page);

        controller.click_panel(PeriodSlot::First, ClickTarget::Panel);
        controller.click_panel(PeriodSlot::First, ClickTarget::Canvas);
        controller.click_panel(
            PeriodSlot::First,
            ClickTarget::SelectorButton(Variable::WindSpeed),
        );

        let page = page.lock();
        let chart = &page.panel(PeriodSlot::First).unwrap().chart;
        assert!(!chart.is_hidden());
        assert_eq!(
            chart.selection().selected(),
            &[Variable::Temperature, Variable::WindSpeed]
        );
    }

    #[tokio::test]
    async fn test_transport_failure_shows_connectivity_message() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let controller = controller(&page);

        let ok = controller
            .fetch_and_render_forecast(&ForecastRequest::for_location("Norman", Units::Imperial))
            .await;

        assert!(!ok);
        assert_eq!(page.lock().error.message(), Some(CONNECTIVITY_MESSAGE));
        assert!(controller.cached_units().is_none());
    }
}
