//! # TrawlWatch Frontend
//!
//! Browser dashboard for fishing-vessel tracking: a Leaflet map of latest
//! positions, historical tracks and regulatory zones, with ranked activity
//! metrics on a second page.
//!
//! ```text
//! ┌──────────── AppState (context) ────────────┐
//! │  RwSignal<MapSession>   camera   tooltip   │
//! └──────┬──────────────────────▲──────────────┘
//!        │ layers(now)          │ MapEvent / apply_*(ticket, result)
//!        ▼                      │
//!   MapPanel (Leaflet)    services::actions ──► ApiClient (gloo-net)
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod components;
pub mod config;
pub mod services;
pub mod state;

use leptos::prelude::*;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use components::*;
use config::FrontendConfig;
use services::{load_reference_data, refresh_positions};
use state::*;

/// Map page: panels around the live map
#[component]
fn MapPage() -> impl IntoView {
    view! {
        <div class="hud-left-panel">
            <TrackPanel />
        </div>
        <div class="hud-main">
            <MapPanel />
        </div>
        <div class="hud-right-panel">
            <VesselPreview />
            <FleetStatsPanel />
            <FiltersPanel />
        </div>
    }
}

#[component]
fn MetricsPage() -> impl IntoView {
    view! {
        <div class="hud-main">
            <MetricsPanel />
        </div>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    let config = FrontendConfig::from_build_env();
    let state = provide_app_state(&config);

    load_reference_data(state);

    // Poll latest positions for as long as the app lives
    let refresh_ms = config.positions_refresh_ms;
    Effect::new(move |_| {
        let handle = gloo_timers::callback::Interval::new(refresh_ms, move || {
            refresh_positions(state);
        });
        handle.forget();
    });

    view! {
        <Title text="TrawlWatch" />
        <Router>
            <div class="hud-container">
                <Header />
                <Routes fallback=|| view! { <div class="hud-main text-muted">"Page not found"</div> }>
                    <Route path=path!("/") view=MapPage />
                    <Route path=path!("/metrics") view=MetricsPage />
                </Routes>
                <Footer />
            </div>
        </Router>
    }
}

pub fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
    log::info!("TrawlWatch v{}", env!("CARGO_PKG_VERSION"));
    leptos::mount::mount_to_body(App);
}
