//! # Footer Component
//!
//! Status bar with fleet counts and the last positions refresh.

use leptos::prelude::*;

use crate::state::use_app_state;

#[component]
pub fn Footer() -> impl IntoView {
    let state = use_app_state();

    let vessel_count = move || state.session.with(|s| s.vessels.vessels().len());
    let position_count = move || state.session.with(|s| s.map_view.positions().len());
    let tracked_count = move || state.session.with(|s| s.track.tracked_vessel_ids().len());
    let last_refresh = move || {
        state
            .last_refresh
            .get()
            .map_or_else(|| "--:--:--".to_string(), |at| at.format("%H:%M:%SZ").to_string())
    };
    let backend = state.api.with_value(|api| api.base_url().to_string());

    view! {
        <footer class="hud-footer">
            <div class="flex items-center gap-lg">
                <span class="text-muted">{concat!("TRAWLWATCH v", env!("CARGO_PKG_VERSION"))}</span>
                <span class="text-muted">"|"</span>
                <span>
                    <span class="text-muted">"VESSELS: "</span>
                    <span class="text-accent">{vessel_count}</span>
                </span>
                <span>
                    <span class="text-muted">"POSITIONS: "</span>
                    <span class="text-accent">{position_count}</span>
                </span>
                <span>
                    <span class="text-muted">"TRACKED: "</span>
                    <span class="text-accent">{tracked_count}</span>
                </span>
            </div>

            <div class="flex items-center gap-lg">
                <span>
                    <span class="text-muted">"LAST FIX: "</span>
                    <span>{last_refresh}</span>
                </span>
                <span class="text-muted">{backend}</span>
            </div>
        </footer>
    }
}
