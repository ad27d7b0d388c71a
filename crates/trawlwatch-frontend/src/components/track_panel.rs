//! # Track Panel
//!
//! Left panel for track mode: vessel picker, date range, display toggles,
//! and one card per tracked vessel with its totals and excursions.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use leptos::prelude::*;
use trawlwatch_domain::{format_duration, ExcursionId, ExcursionMetrics, VesselExcursion, VesselId};
use trawlwatch_map::palette::{color_for_index, to_hex};
use trawlwatch_map::stores::SegmentMode;

use crate::services::{focus_excursion, refresh_tracked, track_vessel, untrack_vessel};
use crate::state::use_app_state;

/// Search results shown at once
const SEARCH_LIMIT: usize = 8;

/// `12 Mar 14:05 → 15 Mar 09:30`, or `→ at sea` while ongoing
pub fn excursion_label(excursion: &VesselExcursion) -> String {
    let stamp = |at: Option<DateTime<Utc>>| at.map(|t| t.format("%d %b %H:%M").to_string());
    let departure = stamp(excursion.departure_at).unwrap_or_else(|| "?".to_string());
    let arrival = stamp(excursion.arrival_at).unwrap_or_else(|| "at sea".to_string());
    format!("{departure} → {arrival}")
}

pub fn totals_summary(totals: &ExcursionMetrics) -> String {
    format!(
        "sea {} · fishing {} · AMP {}",
        format_duration(totals.time_at_sea),
        format_duration(totals.time_fishing),
        format_duration(totals.time_in_amp),
    )
}

fn parse_day(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Inclusive start of the picked day
fn day_start(value: &str) -> Option<DateTime<Utc>> {
    parse_day(value).map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

/// Last second of the picked day
fn day_end(value: &str) -> Option<DateTime<Utc>> {
    parse_day(value)
        .and_then(|d| d.and_hms_opt(23, 59, 59))
        .map(|t| t.and_utc())
}

fn date_value(at: Option<DateTime<Utc>>) -> String {
    at.map(|t| t.format("%Y-%m-%d").to_string()).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq)]
struct TrackedRow {
    vessel_id: VesselId,
    name: String,
    color: String,
    hidden: bool,
    totals: String,
    excursions: Vec<ExcursionRow>,
}

#[derive(Clone, Debug, PartialEq)]
struct ExcursionRow {
    id: ExcursionId,
    label: String,
    hidden: bool,
    focused: bool,
}

#[component]
fn VesselPicker() -> impl IntoView {
    let state = use_app_state();
    let (query, set_query) = signal(String::new());

    let results = move || {
        let query = query.get();
        if query.trim().is_empty() {
            return Vec::new();
        }
        state.session.with(|s| {
            s.vessels
                .search(&query)
                .into_iter()
                .filter(|v| !s.track.is_tracked(v.id))
                .take(SEARCH_LIMIT)
                .map(|v| (v.id, v.display_name()))
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="vessel-picker">
            <input
                class="input"
                type="search"
                placeholder="Name, MMSI or IMO"
                prop:value=query
                on:input=move |ev| set_query.set(event_target_value(&ev))
            />
            <For
                each=results
                key=|(id, _)| *id
                children=move |(id, name)| view! {
                    <div class="search-result" on:click=move |_| {
                        track_vessel(state, id);
                        set_query.set(String::new());
                    }>{name}</div>
                }
            />
        </div>
    }
}

#[component]
fn TrackOptionsForm() -> impl IntoView {
    let state = use_app_state();
    let (range_error, set_range_error) = signal(false);

    let start = move || state.session.with(|s| date_value(s.track.start_date()));
    let end = move || state.session.with(|s| date_value(s.track.end_date()));
    let by_speed = move || state.session.with(|s| s.track.segment_mode() == SegmentMode::Speed);
    let show_positions = move || state.session.with(|s| s.track.show_positions());

    let on_start = move |ev: web_sys::Event| {
        let start = day_start(&event_target_value(&ev));
        state.session.update(|s| s.track.set_start_date(start));
        set_range_error.set(false);
        refresh_tracked(state);
    };
    let on_end = move |ev: web_sys::Event| {
        let end = day_end(&event_target_value(&ev));
        let accepted = state.session.try_update(|s| s.track.set_end_date(end)).unwrap_or(false);
        set_range_error.set(!accepted);
        if accepted {
            refresh_tracked(state);
        } else {
            log::warn!("end date before start date ignored");
        }
    };

    view! {
        <div class="track-options">
            <label class="text-xs text-muted">"FROM"
                <input class="input" type="date" prop:value=start on:change=on_start />
            </label>
            <label class="text-xs text-muted">"TO"
                <input class="input" type="date" prop:value=end on:change=on_end />
            </label>
            {move || range_error.get().then(|| view! {
                <div class="text-xs text-warning">"End date must not precede start date"</div>
            })}
            <label class="text-xs">
                <input
                    type="checkbox"
                    prop:checked=by_speed
                    on:change=move |ev| {
                        let mode = if event_target_checked(&ev) { SegmentMode::Speed } else { SegmentMode::Vessel };
                        state.session.update(|s| s.track.set_segment_mode(mode));
                    }
                />
                " Colour by speed"
            </label>
            <label class="text-xs">
                <input
                    type="checkbox"
                    prop:checked=show_positions
                    on:change=move |ev| {
                        let show = event_target_checked(&ev);
                        state.session.update(|s| s.track.set_show_positions(show));
                    }
                />
                " Show positions"
            </label>
        </div>
    }
}

#[component]
fn TrackedVesselCard(row: TrackedRow) -> impl IntoView {
    let state = use_app_state();
    let vessel_id = row.vessel_id;

    view! {
        <div class="drone-card" class:muted=row.hidden>
            <div class="flex items-center gap-sm">
                <span class="swatch" style=format!("background: {};", row.color)></span>
                <span class="drone-callsign">{row.name}</span>
                <button class="btn btn-sm" on:click=move |_| {
                    state.session.update(|s| s.track.toggle_vessel_visibility(vessel_id));
                }>{if row.hidden { "SHOW" } else { "HIDE" }}</button>
                <button class="btn btn-sm" on:click=move |_| untrack_vessel(state, vessel_id)>"×"</button>
            </div>
            <div class="text-xs text-muted">{row.totals}</div>
            <ul class="excursion-list">
                {row.excursions.into_iter().map(|e| {
                    let id = e.id;
                    view! {
                        <li class="excursion" class:selected=e.focused class:muted=e.hidden>
                            <span on:click=move |_| focus_excursion(state, id)>{e.label}</span>
                            <button class="btn btn-sm" on:click=move |_| {
                                state.session.update(|s| s.track.toggle_excursion_visibility(id));
                            }>{if e.hidden { "○" } else { "●" }}</button>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </div>
    }
}

/// Left panel, shown when the session opens it
#[component]
pub fn TrackPanel() -> impl IntoView {
    let state = use_app_state();
    let open = move || state.session.with(|s| s.map_view.left_panel_open());

    let rows = move || {
        state.session.with(|s| {
            let focused = s.track.focused_excursion_id();
            s.track
                .tracked_vessel_ids()
                .iter()
                .enumerate()
                .map(|(index, &vessel_id)| TrackedRow {
                    vessel_id,
                    name: s
                        .vessels
                        .get(vessel_id)
                        .map_or_else(|| format!("Vessel #{vessel_id}"), |v| v.display_name()),
                    color: to_hex(color_for_index(index)),
                    hidden: s.track.is_vessel_hidden(vessel_id),
                    totals: s
                        .vessel_totals(vessel_id)
                        .map_or_else(|e| format!("totals unavailable: {e}"), |t| totals_summary(&t)),
                    excursions: s
                        .track
                        .vessel_excursions(vessel_id)
                        .iter()
                        .map(|e| ExcursionRow {
                            id: e.id,
                            label: excursion_label(e),
                            hidden: s.track.is_excursion_hidden(e.id),
                            focused: focused == Some(e.id),
                        })
                        .collect(),
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="panel" class:collapsed=move || !open()>
            <div class="panel-header">
                <span class="panel-title">"TRACKED VESSELS"</span>
                <span class="panel-badge">{move || rows().len()}</span>
                <button class="btn btn-sm" on:click=move |_| state.session.update(|s| s.map_view.toggle_left_panel())>
                    {move || if open() { "◀" } else { "▶" }}
                </button>
            </div>
            <Show when=open>
                <div class="panel-body" style="display: flex; flex-direction: column; gap: 8px;">
                    <VesselPicker />
                    <TrackOptionsForm />
                    {move || rows()
                        .into_iter()
                        .map(|row| view! { <TrackedVesselCard row=row /> })
                        .collect_view()}
                    <button class="btn btn-sm" on:click=move |_| state.session.update(|s| s.track.clear())>
                        "CLEAR ALL"
                    </button>
                </div>
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn excursion() -> VesselExcursion {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "vessel_id": 7,
            "departure_at": "2024-03-12T14:05:00Z",
            "segments": []
        }))
        .unwrap()
    }

    #[test]
    fn test_excursion_label_ongoing() {
        assert_eq!(excursion_label(&excursion()), "12 Mar 14:05 → at sea");
    }

    #[test]
    fn test_day_bounds() {
        assert_eq!(day_start("2024-03-12"), Some(Utc.with_ymd_and_hms(2024, 3, 12, 0, 0, 0).unwrap()));
        assert_eq!(day_end("2024-03-12"), Some(Utc.with_ymd_and_hms(2024, 3, 12, 23, 59, 59).unwrap()));
        assert_eq!(day_start(""), None);
    }

    #[test]
    fn test_totals_summary() {
        let totals = ExcursionMetrics { time_at_sea: 7200, time_fishing: 1800, ..Default::default() };
        assert_eq!(totals_summary(&totals), "sea 2h 00m · fishing 30m · AMP 0m");
    }
}
