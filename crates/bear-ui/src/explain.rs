//! Explain mode: select summary text, get a plain-language explanation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use bear_core::ExplainConfig;
use bear_weather::{BackendClient, ExplainRequest};
use parking_lot::Mutex;

use crate::debounce::Debouncer;
use crate::page::{ExplanationPopup, SharedPage};

pub const ENABLED_LABEL: &str =
    "🟢 Explanation mode enabled. Select text to get an explanation (click to disable).";
pub const DISABLED_LABEL: &str =
    "Enable explanation mode and select a portion of text for an in-depth explanation";

pub const LOADING_TEXT: &str = "Loading explanation...";
pub const NOT_FOUND_TEXT: &str = "No explanation found.";
pub const ERROR_TEXT: &str = "Error getting explanation.";

/// Gap between the selection and the popup, in pixels.
const POPUP_OFFSET: f64 = 5.0;

/// What the last summary fetch returned, sent along with each selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExplainContext {
    pub summary: String,
    pub afd: String,
    pub expertise: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionTrigger {
    PointerRelease,
    SelectionChange,
}

/// The user's text selection as the host reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSelection {
    pub text: String,
    /// Whether the selection sits inside the summary container.
    pub in_summary: bool,
    pub bottom: f64,
    pub left: f64,
}

#[derive(Debug, Default)]
struct ExplainState {
    enabled: bool,
    context: ExplainContext,
}

pub struct ExplainController {
    client: BackendClient,
    page: SharedPage,
    state: Mutex<ExplainState>,
    pointer_release: Debouncer,
    selection_change: Debouncer,
    next_popup: AtomicU64,
}

impl ExplainController {
    pub fn new(client: BackendClient, page: SharedPage, config: &ExplainConfig) -> Self {
        Self {
            client,
            page,
            state: Mutex::new(ExplainState::default()),
            pointer_release: Debouncer::new(Duration::from_millis(
                config.pointer_release_delay_ms,
            )),
            selection_change: Debouncer::new(Duration::from_millis(
                config.selection_change_delay_ms,
            )),
            next_popup: AtomicU64::new(1),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub fn context(&self) -> ExplainContext {
        self.state.lock().context.clone()
    }

    /// Flip explain mode from the toggle. Returns the new state.
    pub fn toggle(&self) -> bool {
        let enabled = {
            let mut state = self.state.lock();
            state.enabled = !state.enabled;
            state.enabled
        };
        self.page.lock().summary.explain_enabled = enabled;
        tracing::debug!("Explain mode {}", if enabled { "on" } else { "off" });
        enabled
    }

    /// New summary loaded: store its context and switch the mode off.
    pub fn reset(&self, context: ExplainContext) {
        {
            let mut state = self.state.lock();
            state.enabled = false;
            state.context = context;
        }
        self.pointer_release.cancel();
        self.selection_change.cancel();
        self.page.lock().summary.explain_enabled = false;
    }

    fn debouncer(&self, trigger: SelectionTrigger) -> &Debouncer {
        match trigger {
            SelectionTrigger::PointerRelease => &self.pointer_release,
            SelectionTrigger::SelectionChange => &self.selection_change,
        }
    }

    /// Selection event from the host. Ignored while the mode is off;
    /// otherwise (re)starts that trigger's timer.
    pub fn on_selection_event(
        self: &Arc<Self>,
        trigger: SelectionTrigger,
        selection: TextSelection,
    ) {
        if !self.is_enabled() {
            return;
        }
        let this = Arc::clone(self);
        self.debouncer(trigger).schedule(async move {
            this.explain_selection(selection).await;
        });
    }

    /// Explain `selection` now. Returns false when nothing was requested.
    pub async fn explain_selection(&self, selection: TextSelection) -> bool {
        let text = selection.text.trim();
        if text.is_empty() || !selection.in_summary {
            return false;
        }
        let context = {
            let state = self.state.lock();
            if !state.enabled {
                return false;
            }
            state.context.clone()
        };

        let id = self.next_popup.fetch_add(1, Ordering::Relaxed);
        self.page.lock().popup = Some(ExplanationPopup {
            id,
            text: LOADING_TEXT.to_string(),
            top: selection.bottom + POPUP_OFFSET,
            left: selection.left,
        });

        let request = ExplainRequest {
            text: text.to_string(),
            summary: context.summary,
            afd: context.afd,
            expertise: context.expertise,
        };
        let reply_text = match self.client.explain_text(&request).await {
            Ok(reply) => reply
                .explanation
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| NOT_FOUND_TEXT.to_string()),
            Err(e) => {
                tracing::warn!("Explain request failed: {}", e);
                ERROR_TEXT.to_string()
            }
        };

        let mut page = self.page.lock();
        match page.popup.as_mut() {
            Some(popup) if popup.id == id => {
                popup.text = reply_text;
                true
            }
            _ => {
                tracing::debug!("Explanation popup {} closed before reply", id);
                false
            }
        }
    }

    /// Pointer pressed somewhere on the page.
    pub fn on_pointer_down(&self, inside_popup: bool) {
        if !inside_popup {
            self.page.lock().popup = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use bear_weather::PeriodSlot;

    fn controller(page: &SharedPage) -> ExplainController {
        let client = BackendClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        ExplainController::new(client, Arc::clone(page), &ExplainConfig::default())
    }

    fn selection(text: &str) -> TextSelection {
        TextSelection {
            text: text.into(),
            in_summary: true,
            bottom: 120.0,
            left: 40.0,
        }
    }

    #[test]
    fn test_toggle_updates_label() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);

        assert!(explain.toggle());
        assert_eq!(page.lock().summary.explain_label(), ENABLED_LABEL);
        assert!(!explain.toggle());
        assert_eq!(page.lock().summary.explain_label(), DISABLED_LABEL);
    }

    #[test]
    fn test_reset_disables_and_stores_context() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);
        explain.toggle();

        let context = ExplainContext {
            summary: "Storms".into(),
            afd: "AFD".into(),
            expertise: "none".into(),
        };
        explain.reset(context.clone());

        assert!(!explain.is_enabled());
        assert!(!page.lock().summary.explain_enabled);
        assert_eq!(explain.context(), context);
    }

    #[tokio::test]
    async fn test_disabled_mode_makes_no_request() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);

        assert!(!explain.explain_selection(selection("CAPE")).await);
        assert!(page.lock().popup.is_none());
    }

    #[tokio::test]
    async fn test_blank_or_outside_selection_is_ignored() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);
        explain.toggle();

        assert!(!explain.explain_selection(selection("   ")).await);
        let mut outside = selection("CAPE");
        outside.in_summary = false;
        assert!(!explain.explain_selection(outside).await);
        assert!(page.lock().popup.is_none());
    }

    #[tokio::test]
    async fn test_failed_request_shows_error_text() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);
        explain.toggle();

        assert!(explain.explain_selection(selection("CAPE")).await);

        let page = page.lock();
        let popup = page.popup.as_ref().unwrap();
        assert_eq!(popup.text, ERROR_TEXT);
        assert_eq!(popup.top, 125.0);
        assert_eq!(popup.left, 40.0);
    }

    #[test]
    fn test_pointer_down_outside_closes_popup() {
        let page = Page::new(PeriodSlot::leading(1)).shared();
        let explain = controller(&page);
        page.lock().popup = Some(ExplanationPopup {
            id: 1,
            text: "Energy".into(),
            top: 0.0,
            left: 0.0,
        });

        explain.on_pointer_down(true);
        assert!(page.lock().popup.is_some());
        explain.on_pointer_down(false);
        assert!(page.lock().popup.is_none());
    }
}
