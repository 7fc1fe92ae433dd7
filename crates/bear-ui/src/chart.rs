//! Per-panel chart state: which variables are plotted and what gets drawn.

use bear_core::Units;
use bear_weather::units::convert_series;
use bear_weather::{HourlySample, PeriodSlot, Variable};
use maud::{html, Markup};
use serde_json::json;

/// Most variables a panel plots at once.
pub const MAX_SELECTED: usize = 2;

/// Seed selection for a panel opened without explicit variables.
pub const DEFAULT_VARIABLES: [Variable; 1] = [Variable::Temperature];

/// Line and button highlight color.
pub fn color(variable: Variable) -> &'static str {
    match variable {
        Variable::Temperature => "#c10007",
        Variable::ProbabilityOfPrecipitation => "#155dfc",
        Variable::RelativeHumidity => "#008236",
        Variable::WindSpeed => "#9f2d00",
        Variable::Dewpoint => "#004f3b",
    }
}

pub fn tick_suffix(variable: Variable, units: Units) -> &'static str {
    match variable {
        Variable::ProbabilityOfPrecipitation | Variable::RelativeHumidity => "%",
        Variable::WindSpeed => units.wind_speed_suffix(),
        Variable::Temperature | Variable::Dewpoint => "°",
    }
}

/// Y-axis `(min, max)` for a series. Empty series get `(0, 0)`.
pub fn axis_bounds(variable: Variable, values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    match variable {
        Variable::ProbabilityOfPrecipitation => (0.0, 100.0),
        Variable::RelativeHumidity => (0.0, (max + 5.0).min(100.0)),
        Variable::WindSpeed => ((min - 5.0).max(0.0), max + 5.0),
        Variable::Temperature | Variable::Dewpoint => (min - 5.0, max + 5.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    Added { evicted: Option<Variable> },
    Removed,
}

/// Selected variables in the order they were picked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartSelection {
    order: Vec<Variable>,
}

impl ChartSelection {
    /// Seeds from `initial`, keeping the last `MAX_SELECTED` distinct entries.
    pub fn seeded(initial: &[Variable]) -> Self {
        let mut selection = Self::default();
        for &variable in initial {
            if !selection.contains(variable) {
                selection.push(variable);
            }
        }
        selection
    }

    /// Button click: deselect if selected, otherwise add with FIFO eviction.
    pub fn toggle(&mut self, variable: Variable) -> SelectionChange {
        if let Some(pos) = self.order.iter().position(|&v| v == variable) {
            self.order.remove(pos);
            return SelectionChange::Removed;
        }
        let evicted = self.push(variable);
        SelectionChange::Added { evicted }
    }

    fn push(&mut self, variable: Variable) -> Option<Variable> {
        let evicted = if self.order.len() >= MAX_SELECTED {
            Some(self.order.remove(0))
        } else {
            None
        };
        self.order.push(variable);
        evicted
    }

    pub fn selected(&self) -> &[Variable] {
        &self.order
    }

    pub fn contains(&self, variable: Variable) -> bool {
        self.order.contains(&variable)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// One drawn line chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub canvas_id: String,
    pub variable: Variable,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub y_min: f64,
    pub y_max: f64,
    pub tick_suffix: &'static str,
}

impl ChartSpec {
    pub fn build(
        canvas_id: String,
        variable: Variable,
        series: &[HourlySample],
        units: Units,
    ) -> Self {
        let values = convert_series(series, variable, units);
        let (y_min, y_max) = axis_bounds(variable, &values);
        Self {
            canvas_id,
            variable,
            labels: series.iter().map(HourlySample::hour_label).collect(),
            values,
            y_min,
            y_max,
            tick_suffix: tick_suffix(variable, units),
        }
    }

    pub fn color(&self) -> &'static str {
        color(self.variable)
    }

    /// Line-chart configuration in the charting library's JSON shape.
    pub fn to_chart_config(&self) -> serde_json::Value {
        json!({
            "type": "line",
            "data": {
                "labels": self.labels,
                "datasets": [{
                    "label": self.variable.label(),
                    "data": self.values,
                    "borderColor": self.color(),
                    "backgroundColor": self.color(),
                    "tension": 0.3,
                    "fill": false
                }]
            },
            "options": {
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "display": false } },
                "scales": {
                    "y": {
                        "min": self.y_min,
                        "max": self.y_max,
                        "ticks": { "suffix": self.tick_suffix }
                    }
                }
            }
        })
    }
}

/// Where a click on a period panel landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Panel,
    SelectorButton(Variable),
    Canvas,
}

/// Chart area under a period panel. Built lazily on first open.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartContainer {
    slot: PeriodSlot,
    hidden: bool,
    rendered: bool,
    selection: ChartSelection,
    charts: Vec<ChartSpec>,
    redraws: u64,
}

impl ChartContainer {
    pub fn new(slot: PeriodSlot) -> Self {
        Self {
            slot,
            hidden: true,
            rendered: false,
            selection: ChartSelection::default(),
            charts: Vec::new(),
            redraws: 0,
        }
    }

    pub fn element_id(&self) -> String {
        format!("{}-chart-container", self.slot.id())
    }

    /// Show or hide. The first call builds the selector and draws. Returns
    /// whether the container is now visible.
    pub fn toggle(&mut self, initial: &[Variable], series: &[HourlySample], units: Units) -> bool {
        if !self.rendered {
            let initial = if initial.is_empty() {
                &DEFAULT_VARIABLES[..]
            } else {
                initial
            };
            self.selection = ChartSelection::seeded(initial);
            self.rendered = true;
            self.redraw(series, units);
        }
        self.hidden = !self.hidden;
        !self.hidden
    }

    /// Selector button click. `None` until the container has been built.
    pub fn select(
        &mut self,
        variable: Variable,
        series: &[HourlySample],
        units: Units,
    ) -> Option<SelectionChange> {
        if !self.rendered {
            return None;
        }
        let change = self.selection.toggle(variable);
        self.redraw(series, units);
        Some(change)
    }

    fn redraw(&mut self, series: &[HourlySample], units: Units) {
        let slot = self.slot.id();
        self.charts = self
            .selection
            .selected()
            .iter()
            .enumerate()
            .map(|(i, &variable)| {
                ChartSpec::build(format!("{}-chart-{}", slot, i + 1), variable, series, units)
            })
            .collect();
        self.redraws += 1;
        tracing::debug!(
            "Redrew {} chart(s) for {} panel ({} samples)",
            self.charts.len(),
            slot,
            series.len()
        );
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn is_rendered(&self) -> bool {
        self.rendered
    }

    pub fn selection(&self) -> &ChartSelection {
        &self.selection
    }

    pub fn charts(&self) -> &[ChartSpec] {
        &self.charts
    }

    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub fn markup(&self) -> Markup {
        let class = if self.hidden {
            "chart-container hidden"
        } else {
            "chart-container"
        };
        html! {
            div id=(self.element_id()) class=(class) {
                @if self.rendered {
                    div class="flex flex-wrap gap-2 mb-2" {
                        @for variable in Variable::ALL {
                            @let selected = self.selection.contains(variable);
                            button type="button" data-var=(variable.key())
                                style=(if selected {
                                    format!("background-color: {}; color: white", color(variable))
                                } else {
                                    format!("border: 1px solid {}; color: {}", color(variable), color(variable))
                                }) {
                                (variable.label())
                            }
                        }
                    }
                    div class="flex gap-4" {
                        @for chart in &self.charts {
                            div class="w-1/2 h-64" {
                                canvas id=(chart.canvas_id) data-chart=(chart.to_chart_config().to_string()) {}
                            }
                        }
                    }
                }
            }
        }
    }
}
