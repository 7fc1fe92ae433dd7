//! In-memory page model.
//!
//! Every region the front end reads or rewrites is a typed field here; the
//! rest of the crate mutates it under one lock and `render()` turns it into
//! HTML. Nothing holds the lock across an `.await`.

use std::collections::BTreeMap;
use std::sync::Arc;

use bear_core::{Config, Units};
use bear_weather::{Alert, PeriodSlot, TropicalRegion};
use maud::{html, Markup, PreEscaped};
use parking_lot::Mutex;

use crate::chart::ChartContainer;

pub type SharedPage = Arc<Mutex<Page>>;

pub const SUBMIT_LABEL: &str = "Get Forecast";
pub const SUBMIT_BUSY_LABEL: &str = "Loading...";

#[derive(Debug, Clone)]
pub struct Page {
    pub form: FormView,
    pub error: ErrorRegion,
    /// Message for a blocking `alert()`; the host shows it and clears it.
    pub blocking_alert: Option<String>,
    pub current_panel: Option<String>,
    pub panels: BTreeMap<PeriodSlot, PeriodPanel>,
    pub alerts: AlertList,
    pub summary: SummaryPanel,
    pub popup: Option<ExplanationPopup>,
    pub tropical: BTreeMap<TropicalRegion, TropicalPanel>,
}

impl Page {
    /// A page with period panels for `slots` and no tropical panels.
    pub fn new(slots: &[PeriodSlot]) -> Self {
        Self {
            form: FormView::default(),
            error: ErrorRegion::default(),
            blocking_alert: None,
            current_panel: None,
            panels: slots
                .iter()
                .map(|&slot| (slot, PeriodPanel::new(slot)))
                .collect(),
            alerts: AlertList::default(),
            summary: SummaryPanel::default(),
            popup: None,
            tropical: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut page = Self::new(PeriodSlot::leading(config.forecast.panels));
        page.form.units = config.forecast.units;
        page.form.expertise = config.forecast.expertise.clone();
        page.tropical = TropicalRegion::ALL
            .into_iter()
            .map(|region| (region, TropicalPanel::default()))
            .collect();
        page
    }

    pub fn shared(self) -> SharedPage {
        Arc::new(Mutex::new(self))
    }

    pub fn panel(&self, slot: PeriodSlot) -> Option<&PeriodPanel> {
        self.panels.get(&slot)
    }

    pub fn panel_mut(&mut self, slot: PeriodSlot) -> Option<&mut PeriodPanel> {
        self.panels.get_mut(&slot)
    }

    pub fn take_blocking_alert(&mut self) -> Option<String> {
        self.blocking_alert.take()
    }

    pub fn render(&self) -> Markup {
        html! {
            (self.form.markup())
            (self.error.markup())
            div id="alerts_container" { (self.alerts.markup()) }
            div class="current-panel" {
                @if let Some(current) = &self.current_panel {
                    (PreEscaped(current.as_str()))
                }
            }
            @for (slot, panel) in &self.panels {
                (panel.markup(*slot))
            }
            (self.summary.markup())
            @if let Some(popup) = &self.popup {
                (popup.markup())
            }
            @for (region, panel) in &self.tropical {
                div id=(region.panel_id()) {
                    p { (panel.summary) }
                }
            }
        }
    }
}

/// The location form and its busy state.
#[derive(Debug, Clone, Default)]
pub struct FormView {
    pub location: String,
    pub latitude: String,
    pub longitude: String,
    pub units: Units,
    pub expertise: String,
    /// Cleared once geolocation filled the coordinates.
    pub location_optional: bool,
    pub geo_status: String,
    pub busy: bool,
    /// Shrunk and moved up after the first summary arrives.
    pub condensed: bool,
}

impl FormView {
    pub fn submit_label(&self) -> &'static str {
        if self.busy {
            SUBMIT_BUSY_LABEL
        } else {
            SUBMIT_LABEL
        }
    }

    fn markup(&self) -> Markup {
        let class = if self.condensed {
            "transition-all opacity-80 scale-95 -translate-y-4"
        } else {
            "transition-all"
        };
        html! {
            form id="location-form" class=(class) {
                input id="location" name="location" value=(self.location) required[!self.location_optional];
                input id="latitude" type="hidden" value=(self.latitude);
                input id="longitude" type="hidden" value=(self.longitude);
                input id="units" type="hidden" value=(self.units.as_str());
                input id="expertise" type="hidden" value=(self.expertise);
                p id="geo-status" { (self.geo_status) }
                button type="submit" disabled[self.busy] { (self.submit_label()) }
                @if self.busy {
                    img src="/static/assets/tornado_loading.gif" alt="Loading..." class="w-8 h-8 mx-auto mt-4";
                }
            }
        }
    }
}

/// The page's single error box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorRegion {
    message: String,
    visible: bool,
}

impl ErrorRegion {
    pub fn show(&mut self, message: impl Into<String>) {
        self.message = message.into();
        self.visible = true;
    }

    pub fn clear(&mut self) {
        self.message.clear();
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn message(&self) -> Option<&str> {
        self.visible.then_some(self.message.as_str())
    }

    fn markup(&self) -> Markup {
        let style = if self.visible {
            "display: block"
        } else {
            "display: none"
        };
        html! {
            div id="error-box" style=(style) { (self.message) }
        }
    }
}

/// One period panel: the rendered forecast plus its chart container.
#[derive(Debug, Clone)]
pub struct PeriodPanel {
    pub content: String,
    pub chart: ChartContainer,
}

impl PeriodPanel {
    pub fn new(slot: PeriodSlot) -> Self {
        Self {
            content: String::new(),
            chart: ChartContainer::new(slot),
        }
    }

    pub fn markup(&self, slot: PeriodSlot) -> Markup {
        html! {
            div class=(format!("{}Period-panel panel", slot.id())) {
                (PreEscaped(self.content.as_str()))
                (self.chart.markup())
            }
        }
    }
}

/// A collapsible alert. Each toggles on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertView {
    pub headline: String,
    pub description: String,
    pub instruction: String,
    pub expanded: bool,
}

impl From<&Alert> for AlertView {
    fn from(alert: &Alert) -> Self {
        Self {
            headline: alert.headline.clone().unwrap_or_default(),
            description: alert.description.clone().unwrap_or_default(),
            instruction: alert.instruction.clone().unwrap_or_default(),
            expanded: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlertList {
    pub items: Vec<AlertView>,
}

impl AlertList {
    pub fn from_alerts(alerts: &[Alert]) -> Self {
        Self {
            items: alerts.iter().map(AlertView::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Click on an alert box. Returns the new expanded state.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        let item = self.items.get_mut(index)?;
        item.expanded = !item.expanded;
        Some(item.expanded)
    }

    pub fn markup(&self) -> Markup {
        html! {
            @for (index, alert) in self.items.iter().enumerate() {
                div class="w-full bg-red-500 text-white px-3 rounded-md shadow-lg cursor-pointer transition-all duration-300 hover:bg-red-700 hover:shadow-xl mb-2" {
                    div class="font-bold text-md" { (alert.headline) }
                    div id=(format!("alert-detail-{}", index))
                        class=(if alert.expanded { "mt-2 space-y-2 text-sm" } else { "hidden mt-2 space-y-2 text-sm" }) {
                        div { (alert.description) }
                        div { (alert.instruction) }
                    }
                }
            }
        }
    }
}

/// Narrative summary and the explain-mode toggle under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryPanel {
    pub text: String,
    pub visible: bool,
    pub explain_enabled: bool,
}

impl SummaryPanel {
    pub fn show(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn explain_label(&self) -> &'static str {
        if self.explain_enabled {
            crate::explain::ENABLED_LABEL
        } else {
            crate::explain::DISABLED_LABEL
        }
    }

    fn markup(&self) -> Markup {
        html! {
            div class=(if self.visible { "summary-panel" } else { "summary-panel hidden" }) {
                p id="summary-text" { (self.text) }
                label {
                    input id="explain-toggle" type="checkbox" checked[self.explain_enabled];
                    span { (self.explain_label()) }
                }
            }
        }
    }
}

/// Floating explanation shown under a text selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplanationPopup {
    /// Distinguishes a popup from the one that replaced it.
    pub id: u64,
    pub text: String,
    pub top: f64,
    pub left: f64,
}

impl ExplanationPopup {
    fn markup(&self) -> Markup {
        html! {
            div id="explanation-popup"
                class="absolute z-50 bg-white text-sm text-gray-800 border border-gray-300 rounded-xl shadow-lg p-2 max-w-xs"
                style=(format!("top: {}px; left: {}px", self.top, self.left)) {
                (self.text)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TropicalPanel {
    pub summary: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_region_show_and_clear() {
        let mut error = ErrorRegion::default();
        assert_eq!(error.message(), None);

        error.show("No location provided");
        assert!(error.is_visible());
        assert_eq!(error.message(), Some("No location provided"));

        error.clear();
        assert!(!error.is_visible());
        assert_eq!(error.message(), None);
    }

    #[test]
    fn test_alerts_toggle_independently() {
        let alerts = vec![
            Alert {
                headline: Some("Heat Advisory".into()),
                description: Some("Hot".into()),
                instruction: None,
            },
            Alert {
                headline: Some("Air Quality Alert".into()),
                description: None,
                instruction: None,
            },
        ];
        let mut list = AlertList::from_alerts(&alerts);

        assert_eq!(list.toggle(0), Some(true));
        assert_eq!(list.toggle(1), Some(true));
        assert!(list.items.iter().all(|a| a.expanded));
        assert_eq!(list.toggle(0), Some(false));
        assert!(list.items[1].expanded);
        assert_eq!(list.toggle(5), None);
    }

    #[test]
    fn test_collapsed_alert_detail_is_hidden() {
        let list = AlertList::from_alerts(&[Alert {
            headline: Some("Flood Watch".into()),
            description: Some("Rain".into()),
            instruction: Some("Move to higher ground".into()),
        }]);
        let html = list.markup().into_string();
        assert!(html.contains("Flood Watch"));
        assert!(html.contains(r#"id="alert-detail-0" class="hidden"#));
    }

    #[test]
    fn test_page_from_config_panels() {
        let mut config = Config::default();
        config.forecast.panels = 6;
        config.forecast.units = Units::Metric;
        let page = Page::from_config(&config);

        assert_eq!(page.panels.len(), 6);
        assert_eq!(page.tropical.len(), 3);
        assert_eq!(page.form.units, Units::Metric);
    }

    #[test]
    fn test_form_label_follows_busy_state() {
        let mut form = FormView::default();
        assert_eq!(form.submit_label(), "Get Forecast");
        form.busy = true;
        assert_eq!(form.submit_label(), "Loading...");
    }

    #[test]
    fn test_render_escapes_summary() {
        let mut page = Page::new(&[PeriodSlot::First]);
        page.summary.show("<script>alert(1)</script>");
        let html = page.render().into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("firstPeriod-panel"));
    }
}
