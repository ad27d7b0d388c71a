//! # Fetch Actions
//!
//! Every fetch opens a ticket on the session, awaits the backend without
//! holding the signal, then hands the result back with the ticket. The
//! session drops responses that a newer request already superseded.

use std::future::Future;

use chrono::{Duration, Utc};
use futures::future::join;
use leptos::prelude::*;
use leptos::task::spawn_local;
use trawlwatch_domain::{ExcursionId, MetricsQuery, VesselId};
use trawlwatch_map::commands::fetch_excursions_with_segments;
use trawlwatch_map::stores::{FilterDimension, ModeKind};
use trawlwatch_map::{ApiResult, FetchSlot, MapSession, Ticket, TrackOutcome, TrawlwatchApi};

use crate::state::AppState;

/// Run one fetch for `slot` in the background and apply its result
fn fetch<T, R, F>(state: AppState, slot: FetchSlot, request: R, apply: F)
where
    T: 'static,
    R: Future<Output = ApiResult<T>> + 'static,
    F: FnOnce(&mut MapSession, &Ticket, ApiResult<T>) -> bool + 'static,
{
    spawn_local(async move {
        let Some(ticket) = state.session.try_update(|s| s.begin(slot)) else {
            return;
        };
        let result = request.await;
        state.session.update(|s| {
            apply(s, &ticket, result);
        });
    });
}

/// Vessels, zones, ports, filter enumerations and positions, in parallel
pub fn load_reference_data(state: AppState) {
    let api = state.api();

    let client = api.clone();
    fetch(state, FetchSlot::Vessels, async move { client.vessels().await }, MapSession::apply_vessels);

    let client = api.clone();
    fetch(state, FetchSlot::Zones, async move { client.zones().await }, MapSession::apply_zones);

    let client = api.clone();
    fetch(state, FetchSlot::Ports, async move { client.ports().await }, MapSession::apply_ports);

    for dimension in FilterDimension::ALL {
        let client = api.clone();
        let request = async move {
            match dimension {
                FilterDimension::Type => client.vessel_types().await,
                FilterDimension::LengthClass => client.vessel_classes().await,
                FilterDimension::Country => client.vessel_countries().await,
            }
        };
        fetch(state, FetchSlot::FilterOptions(dimension), request, MapSession::apply_filter_options);
    }

    refresh_positions(state);
}

pub fn refresh_positions(state: AppState) {
    let client = state.api();
    fetch(
        state,
        FetchSlot::Positions,
        async move { client.latest_positions().await },
        move |session, ticket, result| {
            let applied = session.apply_positions(ticket, result);
            if applied {
                state.last_refresh.set(Some(Utc::now()));
            }
            applied
        },
    );
}

async fn load_excursions(state: AppState, ticket: Ticket) {
    let FetchSlot::Excursions(vessel_id) = ticket.slot() else {
        return;
    };
    let result = fetch_excursions_with_segments(&state.api(), vessel_id).await;
    let outcome = state.session.try_update(|s| s.apply_excursions(&ticket, result));
    match outcome {
        Some(TrackOutcome::Loaded { excursions }) => {
            log::info!("vessel {vessel_id}: {excursions} excursions loaded");
        }
        Some(TrackOutcome::Failed) => log::warn!("vessel {vessel_id}: excursions unavailable"),
        Some(other) => log::debug!("vessel {vessel_id}: {other:?}"),
        None => {}
    }
}

/// Track a vessel and load its excursions
pub fn track_vessel(state: AppState, vessel_id: VesselId) {
    let Some(ticket) = state.session.try_update(|s| s.begin_track(vessel_id)) else {
        return;
    };
    spawn_local(load_excursions(state, ticket));
}

/// Track the previewed vessel and switch to track mode
pub fn track_and_follow(state: AppState, vessel_id: VesselId) {
    track_vessel(state, vessel_id);
    state.session.update(|s| {
        s.set_mode(ModeKind::Track);
        s.map_view.set_left_panel_open(true);
    });
}

pub fn untrack_vessel(state: AppState, vessel_id: VesselId) {
    state.session.update(|s| {
        s.track.remove_tracked_vessel(vessel_id);
    });
}

/// Reload every tracked vessel's excursions, e.g. after a date change
pub fn refresh_tracked(state: AppState) {
    let tickets = state.session.try_update(MapSession::begin_refresh_tracked).unwrap_or_default();
    for ticket in tickets {
        spawn_local(load_excursions(state, ticket));
    }
}

pub fn focus_excursion(state: AppState, excursion_id: ExcursionId) {
    let view = state.session.try_update(|s| s.focus_excursion(excursion_id)).flatten();
    state.fly_to(view);
}

/// Metrics for the last `days` days ending now
pub fn load_metrics(state: AppState, days: i64) {
    let end_at = Utc::now();
    let query = MetricsQuery::new(end_at - Duration::days(days), end_at);
    let client = state.api();

    spawn_local(async move {
        let Some(ticket) = state.session.try_update(|s| s.begin(FetchSlot::Metrics)) else {
            return;
        };
        let (vessels, zones) = join(client.vessels_in_activity(&query), client.zones_visited(&query)).await;
        state.session.update(|s| {
            s.apply_metrics(&ticket, vessels, zones);
        });
    });
}
