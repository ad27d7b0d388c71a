//! # Vessel Preview Card
//!
//! Details of the position clicked in position mode.

use chrono::Utc;
use leptos::prelude::*;
use trawlwatch_domain::{format_duration, VesselPosition};

use crate::services::track_and_follow;
use crate::state::use_app_state;

/// `47.8403°N 3.7881°W`
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    let ns = if latitude < 0.0 { 'S' } else { 'N' };
    let ew = if longitude < 0.0 { 'W' } else { 'E' };
    format!("{:.4}°{ns} {:.4}°{ew}", latitude.abs(), longitude.abs())
}

#[component]
fn PreviewCard(position: VesselPosition) -> impl IntoView {
    let state = use_app_state();
    let vessel = position.vessel.clone();
    let vessel_id = vessel.id;
    let age = (Utc::now() - position.timestamp).num_seconds();
    let dash = || "-".to_string();

    view! {
        <div class="panel preview-card">
            <div class="panel-header">
                <span class="panel-title">{vessel.display_name()}</span>
                <button class="btn btn-sm" on:click=move |_| {
                    state.session.update(|s| {
                        s.map_view.set_active_position(None);
                    });
                }>"×"</button>
            </div>
            <div class="panel-body">
                <div class="metric">
                    <span class="metric-label">"MMSI"</span>
                    <span class="metric-value">{vessel.mmsi.map_or_else(dash, |m| m.to_string())}</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"TYPE"</span>
                    <span class="metric-value">{vessel.vessel_type.clone().unwrap_or_else(dash)}</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"FLAG"</span>
                    <span class="metric-value">{vessel.country_iso3.clone().unwrap_or_else(dash)}</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"POS"</span>
                    <span class="metric-value">
                        {format_coordinates(position.position.latitude(), position.position.longitude())}
                    </span>
                </div>
                <div class="metric">
                    <span class="metric-label">"SOG"</span>
                    <span class="metric-value">{position.speed.map_or_else(dash, |s| format!("{s:.1} kn"))}</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"HDG"</span>
                    <span class="metric-value">{position.heading.map_or_else(dash, |h| format!("{h:.0}°"))}</span>
                </div>
                <div class="metric">
                    <span class="metric-label">"FIX"</span>
                    <span class="metric-value">
                        {format!("{} ago", format_duration(u64::try_from(age).unwrap_or(0)))}
                    </span>
                </div>
                <button class="btn" on:click=move |_| track_and_follow(state, vessel_id)>
                    "TRACK THIS VESSEL"
                </button>
            </div>
        </div>
    }
}

/// Preview of the active position, absent outside position mode
#[component]
pub fn VesselPreview() -> impl IntoView {
    let state = use_app_state();
    let active = move || state.session.with(|s| s.map_view.active_position().cloned());

    view! {
        {move || active().map(|position| view! { <PreviewCard position=position /> })}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinates() {
        assert_eq!(format_coordinates(47.840_291, -3.788_086), "47.8403°N 3.7881°W");
        assert_eq!(format_coordinates(-12.5, 45.0), "12.5000°S 45.0000°E");
    }
}
