//! # Application State
//!
//! One [`MapSession`] per mounted dashboard, held in a reactive signal and
//! shared through context. Components read it with `with` and mutate it
//! with `update`; the derived layers recompute whenever it changes.

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use trawlwatch_map::stores::ViewState;
use trawlwatch_map::{MapEvent, MapSession};

use crate::config::FrontendConfig;
use crate::services::ApiClient;

/// Global application state
#[derive(Clone, Copy, Debug)]
pub struct AppState {
    pub session: RwSignal<MapSession>,
    /// Camera move the map component should animate next
    pub camera: RwSignal<Option<ViewState>>,
    /// Text for whatever the pointer is over
    pub tooltip: RwSignal<Option<String>>,
    pub metrics_window_days: RwSignal<i64>,
    pub last_refresh: RwSignal<Option<DateTime<Utc>>>,
    pub api: StoredValue<ApiClient>,
}

impl AppState {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            session: RwSignal::new(MapSession::new(config.initial_view)),
            camera: RwSignal::new(None),
            tooltip: RwSignal::new(None),
            metrics_window_days: RwSignal::new(config.metrics_window_days),
            last_refresh: RwSignal::new(None),
            api: StoredValue::new(ApiClient::new(config)),
        }
    }

    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    /// Feed a renderer event to the session and queue any camera move
    pub fn dispatch(&self, event: MapEvent) {
        if let Some(view) = self.session.try_update(|s| s.handle(event)).flatten() {
            self.camera.set(Some(view));
        }
    }

    /// Hover without invalidating the layers, which do not depend on it
    pub fn hover(&self, event: MapEvent) {
        let tooltip = self
            .session
            .try_update_untracked(|s| {
                s.handle(event);
                s.tooltip()
            })
            .flatten();
        self.tooltip.set(tooltip);
    }

    pub fn fly_to(&self, view: Option<ViewState>) {
        if view.is_some() {
            self.camera.set(view);
        }
    }
}

pub fn provide_app_state(config: &FrontendConfig) -> AppState {
    let state = AppState::new(config);
    provide_context(state);
    state
}

pub fn use_app_state() -> AppState {
    expect_context::<AppState>()
}
