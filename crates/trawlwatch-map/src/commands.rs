//! # Fetch Orchestration
//!
//! Every backend fetch runs in two phases so the browser can hold the
//! session in a reactive cell across the `await`:
//!
//! ```text
//! begin_*  ──► Ticket (loading flag raised, sequence number issued)
//!    │
//!    ▼  await api call (session not borrowed)
//! apply_*(ticket, result)
//!    ├─ older than a result already applied to the slot ──► dropped
//!    ├─ Err  ──► warn!, store empty data
//!    └─ Ok   ──► store
//! ```
//!
//! The async helpers at the bottom chain both phases for callers that own
//! the session outright, like the CLI and the tests.

use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};
use trawlwatch_domain::{
    MetricsQuery, Port, Vessel, VesselActivity, VesselExcursion, VesselId, VesselPosition, Zone,
    ZoneVisit,
};

use crate::api::TrawlwatchApi;
use crate::error::ApiResult;
use crate::session::MapSession;
use crate::stores::{DataDomain, FilterDimension};

/// Logical request slot; a newer result for a slot supersedes older ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchSlot {
    Vessels,
    Positions,
    Zones,
    Ports,
    Excursions(VesselId),
    Metrics,
    FilterOptions(FilterDimension),
}

impl FetchSlot {
    pub fn domain(&self) -> DataDomain {
        match self {
            Self::Vessels | Self::FilterOptions(_) => DataDomain::Vessels,
            Self::Positions => DataDomain::Positions,
            Self::Zones => DataDomain::Zones,
            Self::Ports => DataDomain::Ports,
            Self::Excursions(_) => DataDomain::Excursions,
            Self::Metrics => DataDomain::Metrics,
        }
    }
}

/// Proof that a fetch was started; hand it back with the result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a ticket must be settled or the loading flag stays raised"]
pub struct Ticket {
    slot: FetchSlot,
    seq: u64,
}

impl Ticket {
    pub fn slot(&self) -> FetchSlot {
        self.slot
    }
}

/// Sequence numbers per slot.
///
/// A result is accepted when its sequence number is higher than the last
/// one applied to the same slot, regardless of completion order.
#[derive(Debug, Default)]
pub struct RequestTracker {
    next_seq: u64,
    applied: HashMap<FetchSlot, u64>,
}

impl RequestTracker {
    pub fn issue(&mut self, slot: FetchSlot) -> Ticket {
        self.next_seq += 1;
        Ticket { slot, seq: self.next_seq }
    }

    /// Record the ticket as applied unless something newer already was
    pub fn accept(&mut self, ticket: &Ticket) -> bool {
        let last = self.applied.entry(ticket.slot).or_default();
        if ticket.seq <= *last {
            return false;
        }
        *last = ticket.seq;
        true
    }
}

/// What happened to a vessel's excursion fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum TrackOutcome {
    /// Stored, after date-range scoping
    Loaded { excursions: usize },
    /// The fetch failed; an empty list was stored
    Failed,
    /// A newer fetch for the vessel already landed
    Stale,
    /// The vessel was untracked while the fetch was in flight
    Untracked,
}

/// Ranked metrics for the dashboard
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    pub vessels: Vec<VesselActivity>,
    pub zones: Vec<ZoneVisit>,
}

/// Log a failed fetch and fall back to the empty value
fn or_empty<T: Default>(slot: FetchSlot, result: ApiResult<T>) -> T {
    result.unwrap_or_else(|err| {
        warn!(slot = ?slot, error = %err, "fetch failed, using empty data");
        T::default()
    })
}

impl MapSession {
    pub fn begin(&mut self, slot: FetchSlot) -> Ticket {
        self.loading.begin(slot.domain());
        self.requests.issue(slot)
    }

    /// Lower the loading flag and check the ticket is still current
    fn settle(&mut self, ticket: &Ticket) -> bool {
        self.loading.finish(ticket.slot.domain());
        let current = self.requests.accept(ticket);
        if !current {
            debug!(slot = ?ticket.slot, seq = ticket.seq, "discarding superseded response");
        }
        current
    }

    pub fn apply_vessels(&mut self, ticket: &Ticket, result: ApiResult<Vec<Vessel>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.vessels.set_vessels(or_empty(ticket.slot, result));
        true
    }

    /// Replace the latest-positions snapshot wholesale
    pub fn apply_positions(&mut self, ticket: &Ticket, result: ApiResult<Vec<VesselPosition>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.map_view.set_positions(or_empty(ticket.slot, result));
        true
    }

    pub fn apply_zones(&mut self, ticket: &Ticket, result: ApiResult<Vec<Zone>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.zones.set_zones(or_empty(ticket.slot, result));
        true
    }

    pub fn apply_ports(&mut self, ticket: &Ticket, result: ApiResult<Vec<Port>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.ports.set_ports(or_empty(ticket.slot, result));
        true
    }

    pub fn apply_filter_options(&mut self, ticket: &Ticket, result: ApiResult<Vec<String>>) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        let FetchSlot::FilterOptions(dimension) = ticket.slot else {
            return false;
        };
        self.vessels.set_options(dimension, or_empty(ticket.slot, result));
        true
    }

    pub fn apply_metrics(
        &mut self,
        ticket: &Ticket,
        vessels: ApiResult<Vec<VesselActivity>>,
        zones: ApiResult<Vec<ZoneVisit>>,
    ) -> bool {
        if !self.settle(ticket) {
            return false;
        }
        self.metrics = MetricsReport {
            vessels: or_empty(ticket.slot, vessels),
            zones: or_empty(ticket.slot, zones),
        };
        true
    }

    /// Track a vessel and open its excursion fetch
    pub fn begin_track(&mut self, vessel_id: VesselId) -> Ticket {
        if self.track.add_tracked_vessel(vessel_id) {
            info!(vessel_id, "tracking vessel");
        }
        self.begin(FetchSlot::Excursions(vessel_id))
    }

    /// Store fetched excursions, keeping those that overlap the date range
    pub fn apply_excursions(
        &mut self,
        ticket: &Ticket,
        result: ApiResult<Vec<VesselExcursion>>,
    ) -> TrackOutcome {
        if !self.settle(ticket) {
            return TrackOutcome::Stale;
        }
        let FetchSlot::Excursions(vessel_id) = ticket.slot else {
            return TrackOutcome::Stale;
        };

        let (start, end) = (self.track.start_date(), self.track.end_date());
        let (excursions, outcome) = match result {
            Ok(all) => {
                let kept: Vec<_> = all.into_iter().filter(|e| e.overlaps(start, end)).collect();
                let loaded = TrackOutcome::Loaded { excursions: kept.len() };
                (kept, loaded)
            }
            Err(err) => {
                warn!(vessel_id, error = %err, "excursion fetch failed, using empty data");
                (Vec::new(), TrackOutcome::Failed)
            }
        };

        if self.track.set_vessel_excursions(vessel_id, excursions) {
            outcome
        } else {
            debug!(vessel_id, "vessel untracked before its excursions arrived");
            TrackOutcome::Untracked
        }
    }

    /// Open a fresh excursion fetch for every tracked vessel, e.g. after
    /// the date range changed
    pub fn begin_refresh_tracked(&mut self) -> Vec<Ticket> {
        let ids = self.track.tracked_vessel_ids().to_vec();
        ids.into_iter()
            .map(|id| self.begin(FetchSlot::Excursions(id)))
            .collect()
    }
}

/// Excursions of a vessel with each excursion's segments attached
///
/// # Errors
///
/// Any failed request fails the whole fetch.
pub async fn fetch_excursions_with_segments<A>(
    api: &A,
    vessel_id: VesselId,
) -> ApiResult<Vec<VesselExcursion>>
where
    A: TrawlwatchApi + ?Sized,
{
    let mut excursions = api.vessel_excursions(vessel_id).await?;
    for excursion in &mut excursions {
        excursion.segments = api.excursion_segments(vessel_id, excursion.id).await?;
    }
    Ok(excursions)
}

/// Vessels, zones, ports, filter enumerations and the first positions snapshot
pub async fn load_reference_data<A>(session: &mut MapSession, api: &A)
where
    A: TrawlwatchApi + ?Sized,
{
    let ticket = session.begin(FetchSlot::Vessels);
    session.apply_vessels(&ticket, api.vessels().await);

    let ticket = session.begin(FetchSlot::Zones);
    session.apply_zones(&ticket, api.zones().await);

    let ticket = session.begin(FetchSlot::Ports);
    session.apply_ports(&ticket, api.ports().await);

    for dimension in FilterDimension::ALL {
        let ticket = session.begin(FetchSlot::FilterOptions(dimension));
        let result = match dimension {
            FilterDimension::Type => api.vessel_types().await,
            FilterDimension::LengthClass => api.vessel_classes().await,
            FilterDimension::Country => api.vessel_countries().await,
        };
        session.apply_filter_options(&ticket, result);
    }

    refresh_positions(session, api).await;
    info!(
        vessels = session.vessels.vessels().len(),
        zones = session.zones.zones().len(),
        ports = session.ports.ports().len(),
        positions = session.map_view.positions().len(),
        "reference data loaded"
    );
}

pub async fn refresh_positions<A>(session: &mut MapSession, api: &A) -> bool
where
    A: TrawlwatchApi + ?Sized,
{
    let ticket = session.begin(FetchSlot::Positions);
    session.apply_positions(&ticket, api.latest_positions().await)
}

/// Track a vessel and load its excursions as one operation
pub async fn track_vessel<A>(session: &mut MapSession, api: &A, vessel_id: VesselId) -> TrackOutcome
where
    A: TrawlwatchApi + ?Sized,
{
    let ticket = session.begin_track(vessel_id);
    let result = fetch_excursions_with_segments(api, vessel_id).await;
    session.apply_excursions(&ticket, result)
}

pub async fn load_metrics<A>(session: &mut MapSession, api: &A, query: &MetricsQuery) -> bool
where
    A: TrawlwatchApi + ?Sized,
{
    let ticket = session.begin(FetchSlot::Metrics);
    let vessels = api.vessels_in_activity(query).await;
    let zones = api.zones_visited(query).await;
    session.apply_metrics(&ticket, vessels, zones)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::stores::map_view::tests::position_at;
    use crate::stores::track::tests::{excursion, segment};
    use crate::stores::vessels::tests::vessel;
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::cell::Cell;
    use trawlwatch_domain::{ExcursionId, SegmentType, VesselExcursionSegment, ZoneSummary};

    /// In-memory backend. `fail` makes every call error out.
    #[derive(Default)]
    pub(crate) struct FakeApi {
        pub vessels: Vec<Vessel>,
        pub positions: Vec<VesselPosition>,
        pub excursions: HashMap<VesselId, Vec<VesselExcursion>>,
        pub segments: HashMap<ExcursionId, Vec<VesselExcursionSegment>>,
        pub fail: bool,
        pub calls: Cell<usize>,
    }

    impl FakeApi {
        fn answer<T: Clone>(&self, value: &T) -> ApiResult<T> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(ApiError::Status { status: 503, path: "/fake".into() });
            }
            Ok(value.clone())
        }
    }

    #[async_trait(?Send)]
    impl TrawlwatchApi for FakeApi {
        async fn vessels(&self) -> ApiResult<Vec<Vessel>> {
            self.answer(&self.vessels)
        }

        async fn latest_positions(&self) -> ApiResult<Vec<VesselPosition>> {
            self.answer(&self.positions)
        }

        async fn vessel_excursions(&self, vessel_id: VesselId) -> ApiResult<Vec<VesselExcursion>> {
            self.answer(&self.excursions.get(&vessel_id).cloned().unwrap_or_default())
        }

        async fn excursion_segments(
            &self,
            _vessel_id: VesselId,
            excursion_id: ExcursionId,
        ) -> ApiResult<Vec<VesselExcursionSegment>> {
            self.answer(&self.segments.get(&excursion_id).cloned().unwrap_or_default())
        }

        async fn zones(&self) -> ApiResult<Vec<Zone>> {
            self.answer(&Vec::new())
        }

        async fn ports(&self) -> ApiResult<Vec<Port>> {
            self.answer(&Vec::new())
        }

        async fn vessels_in_activity(&self, _query: &MetricsQuery) -> ApiResult<Vec<VesselActivity>> {
            let ranked = self
                .vessels
                .iter()
                .map(|v| VesselActivity { vessel: v.clone(), total_time_at_sea: Some("PT5H".into()) })
                .collect();
            self.answer(&ranked)
        }

        async fn zones_visited(&self, _query: &MetricsQuery) -> ApiResult<Vec<ZoneVisit>> {
            self.answer(&vec![ZoneVisit {
                zone: ZoneSummary {
                    id: 1,
                    name: "Iroise".into(),
                    category: trawlwatch_domain::ZoneCategory::Amp,
                    sub_category: None,
                },
                visiting_duration: Some("PT3H".into()),
            }])
        }

        async fn vessel_types(&self) -> ApiResult<Vec<String>> {
            self.answer(&vec!["seiner".to_string(), "trawler".to_string()])
        }

        async fn vessel_classes(&self) -> ApiResult<Vec<String>> {
            self.answer(&Vec::new())
        }

        async fn vessel_countries(&self) -> ApiResult<Vec<String>> {
            self.answer(&Vec::new())
        }
    }

    pub(crate) fn fleet_api() -> FakeApi {
        let now = Utc::now();
        let mut api = FakeApi {
            vessels: vec![
                vessel(1, "Belle Ile", "trawler", "FRA"),
                vessel(2, "Mar Azul", "seiner", "ESP"),
                vessel(3, "Ile de Sein", "trawler", "FRA"),
            ],
            positions: vec![
                position_at(1, -4.0, 47.5, now),
                position_at(2, -3.0, 46.0, now),
                position_at(3, -5.0, 48.0, now),
            ],
            ..FakeApi::default()
        };
        api.excursions.insert(1, vec![excursion(10, 1, Vec::new()), excursion(11, 1, Vec::new())]);
        api.segments.insert(
            10,
            vec![segment(1, 10, [-4.0, 47.0], [-4.5, 47.2], SegmentType::Fishing)],
        );
        api
    }

    #[test]
    fn test_tracker_last_issued_wins() {
        let mut tracker = RequestTracker::default();
        let older = tracker.issue(FetchSlot::Positions);
        let newer = tracker.issue(FetchSlot::Positions);
        let other = tracker.issue(FetchSlot::Zones);

        assert!(tracker.accept(&newer));
        assert!(!tracker.accept(&older));
        assert!(tracker.accept(&other));
    }

    #[test]
    fn test_in_order_results_both_apply() {
        let mut tracker = RequestTracker::default();
        let first = tracker.issue(FetchSlot::Excursions(1));
        let second = tracker.issue(FetchSlot::Excursions(1));
        assert!(tracker.accept(&first));
        assert!(tracker.accept(&second));
        assert!(!tracker.accept(&second));
    }

    #[test]
    fn test_late_positions_are_dropped() {
        let now = Utc::now();
        let mut session = MapSession::default();
        let slow = session.begin(FetchSlot::Positions);
        let fast = session.begin(FetchSlot::Positions);
        assert!(session.loading.is_loading(DataDomain::Positions));

        assert!(session.apply_positions(&fast, Ok(vec![position_at(2, 0.0, 0.0, now)])));
        assert!(!session.apply_positions(&slow, Ok(vec![position_at(1, 0.0, 0.0, now)])));

        assert_eq!(session.map_view.positions()[0].vessel.id, 2);
        assert!(!session.loading.is_loading(DataDomain::Positions));
    }

    #[test]
    fn test_failures_fall_back_to_empty() {
        let mut session = MapSession::default();
        session.vessels.set_vessels(vec![vessel(1, "A", "trawler", "FRA")]);
        let ticket = session.begin(FetchSlot::Vessels);
        let failed = Err(ApiError::Transport("connection reset".into()));
        assert!(session.apply_vessels(&ticket, failed));
        assert!(session.vessels.vessels().is_empty());
    }

    #[test]
    fn test_track_vessel_attaches_segments() {
        let api = fleet_api();
        let mut session = MapSession::default();

        let outcome = tokio_test::block_on(track_vessel(&mut session, &api, 1));
        assert_eq!(outcome, TrackOutcome::Loaded { excursions: 2 });
        assert!(session.track.is_tracked(1));
        assert_eq!(session.track.vessel_excursions(1)[0].segments.len(), 1);
        assert!(session.track.vessel_excursions(1)[1].segments.is_empty());
        assert!(!session.loading.any());
    }

    #[test]
    fn test_track_vessel_failure_keeps_vessel_tracked() {
        let api = FakeApi { fail: true, ..fleet_api() };
        let mut session = MapSession::default();

        let outcome = tokio_test::block_on(track_vessel(&mut session, &api, 1));
        assert_eq!(outcome, TrackOutcome::Failed);
        assert!(session.track.is_tracked(1));
        assert!(session.track.has_excursions(1));
        assert!(session.track.vessel_excursions(1).is_empty());
    }

    #[test]
    fn test_untracked_while_in_flight() {
        let mut session = MapSession::default();
        let ticket = session.begin_track(1);
        session.track.remove_tracked_vessel(1);

        let outcome = session.apply_excursions(&ticket, Ok(vec![excursion(10, 1, Vec::new())]));
        assert_eq!(outcome, TrackOutcome::Untracked);
        assert!(!session.track.has_excursions(1));
    }

    #[test]
    fn test_date_range_scopes_excursions() {
        let mut session = MapSession::default();
        let ticket = session.begin_track(1);
        session
            .track
            .set_start_date(Some(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));

        let mut ongoing = excursion(11, 1, Vec::new());
        ongoing.arrival_at = None;
        let outcome = session.apply_excursions(&ticket, Ok(vec![excursion(10, 1, Vec::new()), ongoing]));

        assert_eq!(outcome, TrackOutcome::Loaded { excursions: 1 });
        assert_eq!(session.track.vessel_excursions(1)[0].id, 11);
    }

    #[test]
    fn test_refresh_tracked_supersedes_pending() {
        let mut session = MapSession::default();
        let original = session.begin_track(1);
        let refreshed = session.begin_refresh_tracked();
        assert_eq!(refreshed.len(), 1);

        let outcome = session.apply_excursions(&refreshed[0], Ok(Vec::new()));
        assert_eq!(outcome, TrackOutcome::Loaded { excursions: 0 });
        assert_eq!(
            session.apply_excursions(&original, Ok(vec![excursion(10, 1, Vec::new())])),
            TrackOutcome::Stale
        );
        assert!(!session.loading.is_loading(DataDomain::Excursions));
    }

    #[test]
    fn test_load_reference_data() {
        let api = fleet_api();
        let mut session = MapSession::default();
        tokio_test::block_on(load_reference_data(&mut session, &api));

        assert_eq!(session.vessels.vessels().len(), 3);
        assert_eq!(session.map_view.positions().len(), 3);
        assert_eq!(
            session.vessels.available(FilterDimension::Type),
            vec!["seiner", "trawler"]
        );
        assert_eq!(session.vessels.available(FilterDimension::Country), vec!["ESP", "FRA"]);
        assert!(!session.loading.any());
    }

    #[test]
    fn test_load_metrics() {
        let api = fleet_api();
        let mut session = MapSession::default();
        let query = MetricsQuery::new(
            Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap(),
        );

        assert!(tokio_test::block_on(load_metrics(&mut session, &api, &query)));
        assert_eq!(session.metrics.vessels.len(), 3);
        assert_eq!(session.metrics.zones[0].visiting_seconds().unwrap(), 3 * 3600);
        assert_eq!(api.calls.get(), 2);
    }
}
