//! In-session dashboard state.
//!
//! The store owns the mutable widget list for the lifetime of one analysis.
//! Tab order and per-tab widget membership are projections recomputed from
//! the widget list on every call, so edits that move a widget between tabs
//! can never leave stale derived state behind. Loading a new payload
//! replaces everything atomically.

use crate::schema::{DashboardPayload, Insight, KpiCard, Widget};

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub title: String,
    pub summary: String,
    pub file_name: String,
    pub kpis: Vec<KpiCard>,
    pub insights: Vec<Insight>,
    widgets: Vec<Widget>,
    active_tab: Option<String>,
    edit_target: Option<String>,
}

impl DashboardState {
    pub fn new(payload: DashboardPayload, file_name: impl Into<String>) -> Self {
        let mut state = Self {
            title: payload.title,
            summary: payload.summary,
            file_name: file_name.into(),
            kpis: payload.kpis,
            insights: payload.insights,
            widgets: payload.widgets,
            active_tab: None,
            edit_target: None,
        };
        state.active_tab = state.tabs().into_iter().next();
        state
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    /// Distinct tab names in first-occurrence order.
    pub fn tabs(&self) -> Vec<String> {
        let mut tabs: Vec<String> = Vec::new();
        for w in &self.widgets {
            if !tabs.iter().any(|t| t == &w.tab) {
                tabs.push(w.tab.clone());
            }
        }
        tabs
    }

    pub fn active_tab(&self) -> Option<&str> {
        self.active_tab.as_deref()
    }

    /// Switch tabs. Unknown names are ignored. Edit state is left alone: the
    /// customizer stays attached to its widget even when that widget's tab
    /// is no longer visible.
    pub fn set_active_tab(&mut self, tab: &str) {
        if self.tabs().iter().any(|t| t == tab) {
            self.active_tab = Some(tab.to_string());
        }
    }

    /// Widgets belonging to the active tab, in payload order.
    pub fn active_widgets(&self) -> Vec<&Widget> {
        let Some(tab) = self.active_tab.as_deref() else {
            return Vec::new();
        };
        self.widgets.iter().filter(|w| w.tab == tab).collect()
    }

    /// Replace the widget whose id matches. A miss is a silent no-op: the
    /// edit was against local state only, so there is nothing to corrupt.
    pub fn update_widget(&mut self, updated: Widget) {
        if let Some(slot) = self.widgets.iter_mut().find(|w| w.id == updated.id) {
            *slot = updated;
        } else {
            tracing::debug!(id = %updated.id, "update for unknown widget ignored");
        }
    }

    pub fn edit_target(&self) -> Option<&str> {
        self.edit_target.as_deref()
    }

    pub fn set_edit_target(&mut self, id: Option<String>) {
        self.edit_target = id;
    }

    /// Toggle edit mode for one widget; editing a second widget moves the
    /// single edit slot there.
    pub fn toggle_edit(&mut self, id: &str) {
        if self.edit_target.as_deref() == Some(id) {
            self.edit_target = None;
        } else {
            self.edit_target = Some(id.to_string());
        }
    }
}
