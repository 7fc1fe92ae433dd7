//! WeatherBear page logic: forecast panels, charts, summaries and explain mode.

pub mod app;
pub mod chart;
pub mod debounce;
mod error_mapping;
pub mod explain;
pub mod forecast;
pub mod page;
pub mod prefill;
pub mod render;
pub mod services;
pub mod submit;
pub mod tropical;

pub use app::Frontend;
pub use chart::{ChartContainer, ChartSelection, ChartSpec, ClickTarget, SelectionChange};
pub use debounce::Debouncer;
pub use explain::{ExplainContext, ExplainController, SelectionTrigger, TextSelection};
pub use forecast::ForecastController;
pub use page::{Page, SharedPage};
pub use prefill::PrefillOutcome;
pub use services::{FrontendError, FrontendMessage};
pub use submit::{SubmitHandler, SubmitOutcome};
pub use tropical::TropicalController;
