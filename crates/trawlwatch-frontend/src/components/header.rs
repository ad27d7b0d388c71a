//! # Header Component
//!
//! Top bar with logo, mode switch, UTC clock and loading status.

use chrono::{DateTime, Utc};
use leptos::prelude::*;
use leptos_router::components::A;
use trawlwatch_map::stores::ModeKind;

use crate::state::use_app_state;

/// Position / track mode switch
#[component]
fn ModeSwitch() -> impl IntoView {
    let state = use_app_state();
    let mode = move || state.session.with(|s| s.map_view.mode());
    let set_mode = move |kind: ModeKind| state.session.update(|s| s.set_mode(kind));

    view! {
        <div class="mode-switch">
            <button
                class="btn btn-sm"
                class:active=move || mode() == ModeKind::Position
                on:click=move |_| set_mode(ModeKind::Position)
            >"POSITIONS"</button>
            <button
                class="btn btn-sm"
                class:active=move || mode() == ModeKind::Track
                on:click=move |_| set_mode(ModeKind::Track)
            >"TRACKS"</button>
        </div>
    }
}

#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();
    let (time, set_time) = signal(Utc::now());

    // Update clock every second
    Effect::new(move |_| {
        let handle = gloo_timers::callback::Interval::new(1000, move || {
            set_time.set(Utc::now());
        });
        handle.forget();
    });

    let format_utc = |dt: DateTime<Utc>| dt.format("%H:%M:%SZ").to_string();
    let format_date = |dt: DateTime<Utc>| dt.format("%d %b %Y").to_string().to_uppercase();

    let loading = move || state.session.with(|s| s.loading.any());

    view! {
        <header class="hud-header">
            <div class="logo">
                <svg class="logo-icon" viewBox="0 0 24 24" fill="currentColor">
                    <path d="M3 17l2-6h14l2 6H3zm4-8l1-4h8l1 4H7zM2 19h20v2H2z"/>
                </svg>
                <div>
                    <div class="logo-text">"TRAWLWATCH"</div>
                    <div class="logo-subtitle">"FISHING ACTIVITY MONITOR"</div>
                </div>
            </div>

            <nav class="flex items-center gap-md">
                <A href="/">"MAP"</A>
                <A href="/metrics">"METRICS"</A>
                <ModeSwitch />
            </nav>

            <div class="mission-clock">
                <div class="clock-segment">
                    <div class="clock-label">"UTC"</div>
                    <div class="clock-value">{move || format_utc(time.get())}</div>
                </div>
                <div class="clock-segment">
                    <div class="clock-label">"DATE"</div>
                    <div class="clock-value">{move || format_date(time.get())}</div>
                </div>
            </div>

            <div class="flex items-center gap-md">
                <div class="status-badge" class:warning=loading class:nominal=move || !loading()>
                    <span class="status-dot" class:warning=loading class:nominal=move || !loading()></span>
                    {move || if loading() { "LOADING" } else { "READY" }}
                </div>
            </div>
        </header>
    }
}
