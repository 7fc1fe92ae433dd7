//! Forecast response to panel HTML.

use bear_core::Units;
use bear_weather::{CurrentConditions, DisplayValue, ForecastResponse, Period};
use maud::{html, Markup};

use crate::chart::ChartContainer;
use crate::page::{AlertList, Page};

fn shown(value: &Option<DisplayValue>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

fn degrees(value: &Option<DisplayValue>, units: Units) -> String {
    format!("{}°{}", shown(value), units.temperature_suffix())
}

pub fn current_conditions(current: &CurrentConditions, units: Units) -> Markup {
    html! {
        h2 class="text-xl font-bold mb-2" { "Current Conditions" }
        div class="flex items-center gap-4" {
            img src=(current.icon.as_deref().unwrap_or_default()) alt="weather icon" class="w-16 h-16";
            div {
                p class="text-4xl font-semibold" { (degrees(&current.temperature, units)) }
                p { (current.clouds.as_deref().unwrap_or_default()) }
                p { (current.text.as_deref().unwrap_or_default()) }
            }
        }
        p class="mt-2" { "Dewpoint: " (degrees(&current.dewpoint, units)) }
        @if current.wind_chill.is_some() {
            p { "Feels Like: " (degrees(&current.wind_chill, units)) }
        }
        @if current.heat_index.is_some() {
            p { "Heat Index: " (degrees(&current.heat_index, units)) }
        }
        p class="text-sm text-gray-500 mt-2" { (current.station.as_deref().unwrap_or_default()) }
    }
}

pub fn period(period: &Period, units: Units) -> Markup {
    html! {
        h3 class="text-xl font-bold mb-2" { (period.title.as_deref().unwrap_or_default()) }
        div class="flex items-center gap-4" {
            img src=(period.icon.as_deref().unwrap_or_default()) alt="forecast icon" class="w-16 h-16";
            div {
                p class="text-4xl font-semibold" { (degrees(&period.temperature, units)) }
                p { (period.text.as_deref().unwrap_or_default()) }
            }
        }
        p class="text-sm text-gray-500 mt-2" {
            "Wind: " (shown(&period.wind_speed)) " " (period.wind_dir.as_deref().unwrap_or_default())
        }
        p class="text-sm text-gray-500" {
            "Precipitation Chances: " (shown(&period.precip_chance)) "%"
        }
    }
}

/// Rewrite the page from a forecast. Alerts are replaced, every chart
/// container is collapsed, and each period with a panel gets fresh content.
/// Periods without a panel are skipped. Returns how many panels were updated.
pub fn render_forecast(page: &mut Page, forecast: &ForecastResponse, units: Units) -> usize {
    page.alerts = AlertList::from_alerts(&forecast.alerts);

    // Charts drawn from the previous series must not outlive its cache.
    for (&slot, panel) in page.panels.iter_mut() {
        panel.chart = ChartContainer::new(slot);
    }

    if let Some(current) = &forecast.current {
        page.current_panel = Some(current_conditions(current, units).into_string());
    }

    let mut updated = 0;
    for (slot, data) in forecast.periods() {
        match page.panel_mut(slot) {
            Some(panel) => {
                panel.content = period(data, units).into_string();
                updated += 1;
            }
            None => tracing::debug!("No {} panel on the page, skipping", slot.id()),
        }
    }
    updated
}

#[cfg(test)]
mod tests {
    use super::*;
    use bear_weather::{PeriodSlot, Variable};
    use serde_json::json;

    fn forecast(value: serde_json::Value) -> ForecastResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_current_conditions_optional_lines() {
        let current: CurrentConditions = serde_json::from_value(json!({
            "temperature": 95,
            "clouds": "Clear",
            "dewpoint": 72,
            "heatIndex": 104,
            "station": "KOKC"
        }))
        .unwrap();

        let html = current_conditions(&current, Units::Imperial).into_string();
        assert!(html.contains("95°F"));
        assert!(html.contains("Dewpoint: 72°F"));
        assert!(html.contains("Heat Index: 104°F"));
        assert!(!html.contains("Feels Like"));
        assert!(html.contains("KOKC"));
    }

    #[test]
    fn test_period_uses_metric_suffix() {
        let data: Period = serde_json::from_value(json!({
            "title": "Tonight",
            "temperature": 18,
            "text": "Clear",
            "wind_speed": "9 km/h",
            "wind_dir": "SW",
            "precip_chance": 10
        }))
        .unwrap();

        let html = period(&data, Units::Metric).into_string();
        assert!(html.contains("18°C"));
        assert!(html.contains("Wind: 9 km/h SW"));
        assert!(html.contains("Precipitation Chances: 10%"));
    }

    #[test]
    fn test_six_periods_three_panels() {
        let mut page = Page::new(PeriodSlot::leading(3));
        let response = forecast(json!({
            "first_period": { "title": "Today" },
            "second_period": { "title": "Tonight" },
            "third_period": { "title": "Tuesday" },
            "fourth_period": { "title": "Tuesday Night" },
            "fifth_period": { "title": "Wednesday" },
            "sixth_period": { "title": "Wednesday Night" }
        }));

        let updated = render_forecast(&mut page, &response, Units::Imperial);

        assert_eq!(updated, 3);
        assert_eq!(page.panels.len(), 3);
        assert!(page.panel(PeriodSlot::Third).unwrap().content.contains("Tuesday"));
    }

    #[test]
    fn test_absent_period_leaves_panel_alone() {
        let mut page = Page::new(PeriodSlot::leading(3));
        page.panel_mut(PeriodSlot::Third).unwrap().content = "old".into();

        render_forecast(
            &mut page,
            &forecast(json!({ "first_period": { "title": "Today" } })),
            Units::Imperial,
        );

        assert_eq!(page.panel(PeriodSlot::Third).unwrap().content, "old");
    }

    #[test]
    fn test_rerender_collapses_charts_and_replaces_alerts() {
        let mut page = Page::new(PeriodSlot::leading(1));
        let first = forecast(json!({
            "first_period": { "title": "Today", "hourly_forecast": [{ "temperature": 70 }] },
            "alerts": [{ "headline": "Old" }, { "headline": "Older" }]
        }));
        render_forecast(&mut page, &first, Units::Imperial);
        page.alerts.toggle(0);
        page.panel_mut(PeriodSlot::First)
            .unwrap()
            .chart
            .toggle(&[], &first.first_period.as_ref().unwrap().hourly_forecast, Units::Imperial);

        let second = forecast(json!({ "first_period": { "title": "Tonight" }, "alerts": null }));
        render_forecast(&mut page, &second, Units::Imperial);

        let panel = page.panel(PeriodSlot::First).unwrap();
        assert!(panel.chart.is_hidden());
        assert!(!panel.chart.is_rendered());
        assert!(page.alerts.is_empty());
    }

    #[test]
    fn test_absent_period_chart_is_collapsed() {
        let mut page = Page::new(PeriodSlot::leading(2));
        let first = forecast(json!({
            "first_period": { "title": "Today" },
            "second_period": { "title": "Tonight", "hourly_forecast": [{ "dewpoint": 21 }] }
        }));
        render_forecast(&mut page, &first, Units::Imperial);
        page.panel_mut(PeriodSlot::Second).unwrap().chart.toggle(
            &[Variable::Dewpoint],
            &first.second_period.as_ref().unwrap().hourly_forecast,
            Units::Imperial,
        );

        render_forecast(
            &mut page,
            &forecast(json!({ "first_period": { "title": "Today" } })),
            Units::Metric,
        );

        let panel = page.panel(PeriodSlot::Second).unwrap();
        assert!(panel.chart.is_hidden());
        assert!(!panel.chart.is_rendered());
        assert!(panel.content.contains("Tonight"));
    }

    #[test]
    fn test_backend_text_is_escaped() {
        let data: Period =
            serde_json::from_value(json!({ "title": "<b>Tonight</b>" })).unwrap();
        let html = period(&data, Units::Imperial).into_string();
        assert!(html.contains("&lt;b&gt;Tonight&lt;/b&gt;"));
    }
}
