//! # Track-Mode Options
//!
//! Which vessels are tracked, their excursions, what is hidden, which
//! excursion the camera follows, and the display toggles for tracks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use trawlwatch_domain::{DomainError, ExcursionId, ExcursionMetrics, VesselExcursion, VesselId};

/// How track segments are coloured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentMode {
    /// Tracked vessel's palette colour
    #[default]
    Vessel,
    /// Red to yellow by average speed
    Speed,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackOptions {
    tracked_vessel_ids: Vec<VesselId>,
    excursions: HashMap<VesselId, Vec<VesselExcursion>>,
    vessels_hidden: HashSet<VesselId>,
    excursions_hidden: HashSet<ExcursionId>,
    focused_excursion_id: Option<ExcursionId>,
    show_positions: bool,
    segment_mode: SegmentMode,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl TrackOptions {
    // -------------------------------------------------------------------------
    // Tracked vessels
    // -------------------------------------------------------------------------

    pub fn tracked_vessel_ids(&self) -> &[VesselId] {
        &self.tracked_vessel_ids
    }

    pub fn is_tracked(&self, vessel_id: VesselId) -> bool {
        self.tracked_vessel_ids.contains(&vessel_id)
    }

    /// Position in the tracked list, which picks the palette colour
    pub fn tracked_index(&self, vessel_id: VesselId) -> Option<usize> {
        self.tracked_vessel_ids.iter().position(|id| *id == vessel_id)
    }

    /// Returns `false` if the vessel was already tracked
    pub fn add_tracked_vessel(&mut self, vessel_id: VesselId) -> bool {
        if self.is_tracked(vessel_id) {
            return false;
        }
        self.tracked_vessel_ids.push(vessel_id);
        true
    }

    /// Stop tracking a vessel and drop everything hanging off it: its
    /// excursions, its hidden flag, the hidden flags and focus of its
    /// excursions. Returns `false` if it was not tracked.
    pub fn remove_tracked_vessel(&mut self, vessel_id: VesselId) -> bool {
        let Some(index) = self.tracked_index(vessel_id) else {
            return false;
        };
        self.tracked_vessel_ids.remove(index);
        self.vessels_hidden.remove(&vessel_id);

        if let Some(excursions) = self.excursions.remove(&vessel_id) {
            self.forget_excursions(excursions.iter().map(|e| e.id));
        }
        true
    }

    /// Drop hidden flags and focus for excursions that are gone
    fn forget_excursions(&mut self, ids: impl IntoIterator<Item = ExcursionId>) {
        for id in ids {
            self.excursions_hidden.remove(&id);
            if self.focused_excursion_id == Some(id) {
                self.focused_excursion_id = None;
            }
        }
    }

    /// Untrack everything
    pub fn clear(&mut self) {
        self.tracked_vessel_ids.clear();
        self.excursions.clear();
        self.vessels_hidden.clear();
        self.excursions_hidden.clear();
        self.focused_excursion_id = None;
    }

    // -------------------------------------------------------------------------
    // Excursions
    // -------------------------------------------------------------------------

    /// Store a tracked vessel's excursions.
    ///
    /// Excursions missing from the new list lose their hidden flag and focus.
    /// Data for a vessel that is no longer tracked is discarded and `false`
    /// is returned.
    pub fn set_vessel_excursions(&mut self, vessel_id: VesselId, excursions: Vec<VesselExcursion>) -> bool {
        if !self.is_tracked(vessel_id) {
            return false;
        }
        let kept: HashSet<ExcursionId> = excursions.iter().map(|e| e.id).collect();
        if let Some(previous) = self.excursions.insert(vessel_id, excursions) {
            let dropped: Vec<ExcursionId> = previous
                .iter()
                .map(|e| e.id)
                .filter(|id| !kept.contains(id))
                .collect();
            self.forget_excursions(dropped);
        }
        true
    }

    /// Empty while the fetch is pending
    pub fn vessel_excursions(&self, vessel_id: VesselId) -> &[VesselExcursion] {
        self.excursions
            .get(&vessel_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has_excursions(&self, vessel_id: VesselId) -> bool {
        self.excursions.contains_key(&vessel_id)
    }

    /// Owning vessel and excursion for an id
    pub fn find_excursion(&self, excursion_id: ExcursionId) -> Option<(VesselId, &VesselExcursion)> {
        self.tracked_vessel_ids.iter().find_map(|vessel_id| {
            self.vessel_excursions(*vessel_id)
                .iter()
                .find(|e| e.id == excursion_id)
                .map(|e| (*vessel_id, e))
        })
    }

    /// Excursions to draw, with the owning vessel's tracked index
    pub fn visible_excursions(&self) -> Vec<(usize, &VesselExcursion)> {
        self.tracked_vessel_ids
            .iter()
            .enumerate()
            .filter(|(_, id)| !self.vessels_hidden.contains(*id))
            .flat_map(move |(index, id)| {
                self.vessel_excursions(*id)
                    .iter()
                    .filter(move |e| !self.excursions_hidden.contains(&e.id))
                    .map(move |e| (index, e))
            })
            .collect()
    }

    /// Summed durations over a vessel's loaded excursions
    ///
    /// # Errors
    ///
    /// Fails fast on the first malformed duration.
    pub fn vessel_totals(&self, vessel_id: VesselId) -> Result<ExcursionMetrics, DomainError> {
        self.vessel_excursions(vessel_id)
            .iter()
            .try_fold(ExcursionMetrics::default(), |total, excursion| {
                Ok(total + excursion.metrics()?)
            })
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    pub fn toggle_vessel_visibility(&mut self, vessel_id: VesselId) {
        if !self.vessels_hidden.remove(&vessel_id) {
            self.vessels_hidden.insert(vessel_id);
        }
    }

    pub fn toggle_excursion_visibility(&mut self, excursion_id: ExcursionId) {
        if !self.excursions_hidden.remove(&excursion_id) {
            self.excursions_hidden.insert(excursion_id);
        }
    }

    pub fn is_vessel_hidden(&self, vessel_id: VesselId) -> bool {
        self.vessels_hidden.contains(&vessel_id)
    }

    pub fn is_excursion_hidden(&self, excursion_id: ExcursionId) -> bool {
        self.excursions_hidden.contains(&excursion_id)
    }

    // -------------------------------------------------------------------------
    // Focus
    // -------------------------------------------------------------------------

    pub fn focused_excursion_id(&self) -> Option<ExcursionId> {
        self.focused_excursion_id
    }

    /// No validation: an id that resolves to nothing reads as "no focus"
    pub fn set_focused_excursion_id(&mut self, excursion_id: Option<ExcursionId>) {
        self.focused_excursion_id = excursion_id;
    }

    pub fn focused_excursion(&self) -> Option<&VesselExcursion> {
        self.focused_excursion_id
            .and_then(|id| self.find_excursion(id))
            .map(|(_, excursion)| excursion)
    }

    // -------------------------------------------------------------------------
    // Date range
    // -------------------------------------------------------------------------

    pub fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Moving the start past the end clears the end
    pub fn set_start_date(&mut self, start: Option<DateTime<Utc>>) {
        self.start_date = start;
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                self.end_date = None;
            }
        }
    }

    /// Rejects an end before the current start and returns `false`
    pub fn set_end_date(&mut self, end: Option<DateTime<Utc>>) -> bool {
        if let (Some(start), Some(end)) = (self.start_date, end) {
            if end < start {
                tracing::debug!(%start, %end, "rejected end date before start date");
                return false;
            }
        }
        self.end_date = end;
        true
    }

    // -------------------------------------------------------------------------
    // Display toggles
    // -------------------------------------------------------------------------

    pub fn segment_mode(&self) -> SegmentMode {
        self.segment_mode
    }

    pub fn set_segment_mode(&mut self, mode: SegmentMode) {
        self.segment_mode = mode;
    }

    pub fn show_positions(&self) -> bool {
        self.show_positions
    }

    pub fn set_show_positions(&mut self, show: bool) {
        self.show_positions = show;
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;
    use trawlwatch_domain::{GeoPoint, SegmentType, VesselExcursionSegment};

    pub(crate) fn segment(
        id: i64,
        excursion_id: ExcursionId,
        start: [f64; 2],
        end: [f64; 2],
        segment_type: SegmentType,
    ) -> VesselExcursionSegment {
        let t0 = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        VesselExcursionSegment {
            id,
            excursion_id,
            timestamp_start: t0 + chrono::Duration::minutes(id * 15),
            timestamp_end: t0 + chrono::Duration::minutes(id * 15 + 15),
            segment_duration: Some("PT15M".into()),
            start_position: GeoPoint::new(start[0], start[1]),
            end_position: GeoPoint::new(end[0], end[1]),
            heading_at_start: Some(45.0),
            heading_at_end: Some(50.0),
            speed_at_start: Some(4.0),
            speed_at_end: Some(6.0),
            average_speed: None,
            segment_type,
            in_amp_zone: false,
            in_territorial_waters: false,
            in_zone_with_no_fishing_rights: false,
        }
    }

    pub(crate) fn excursion(
        id: ExcursionId,
        vessel_id: VesselId,
        segments: Vec<VesselExcursionSegment>,
    ) -> VesselExcursion {
        VesselExcursion {
            id,
            vessel_id,
            departure_port_id: None,
            departure_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 6, 0, 0).unwrap()),
            departure_position: None,
            arrival_port_id: None,
            arrival_at: Some(Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap()),
            arrival_position: None,
            excursion_duration: Some("P1D".into()),
            total_time_at_sea: Some("PT20H".into()),
            total_time_in_amp: Some("PT2H".into()),
            total_time_in_territorial_waters: None,
            total_time_in_zones_with_no_fishing_rights: None,
            total_time_fishing: Some("PT6H".into()),
            total_time_default_ais: None,
            segments,
        }
    }

    #[test]
    fn test_add_twice_tracks_once() {
        let mut track = TrackOptions::default();
        assert!(track.add_tracked_vessel(42));
        assert!(!track.add_tracked_vessel(42));
        assert_eq!(track.tracked_vessel_ids(), &[42]);
    }

    #[test]
    fn test_remove_untracked_is_noop() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        let before = track.clone();
        assert!(!track.remove_tracked_vessel(99));
        assert_eq!(track, before);
    }

    #[test]
    fn test_remove_clears_dependent_state() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(42);
        track.add_tracked_vessel(7);
        track.set_vessel_excursions(42, vec![excursion(100, 42, vec![])]);
        track.set_vessel_excursions(7, vec![excursion(200, 7, vec![])]);
        track.toggle_vessel_visibility(42);
        track.toggle_excursion_visibility(100);
        track.set_focused_excursion_id(Some(100));

        assert!(track.remove_tracked_vessel(42));

        assert!(!track.is_tracked(42));
        assert!(!track.has_excursions(42));
        assert!(!track.is_vessel_hidden(42));
        assert!(!track.is_excursion_hidden(100));
        assert_eq!(track.focused_excursion_id(), None);
        assert_eq!(track.tracked_index(7), Some(0));
        assert_eq!(track.vessel_excursions(7).len(), 1);
    }

    #[test]
    fn test_replaced_excursions_do_not_leave_hidden_state() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![]), excursion(11, 1, vec![])]);
        track.toggle_excursion_visibility(10);
        track.toggle_excursion_visibility(11);
        track.set_focused_excursion_id(Some(10));

        // refetch narrowed by date range keeps 11, drops 10
        track.set_vessel_excursions(1, vec![excursion(11, 1, vec![])]);
        assert!(!track.is_excursion_hidden(10));
        assert!(track.is_excursion_hidden(11));
        assert_eq!(track.focused_excursion_id(), None);

        // failed refetch stores nothing, then the vessel is untracked
        track.set_vessel_excursions(1, vec![]);
        assert!(track.remove_tracked_vessel(1));
        assert!(!track.is_excursion_hidden(11));

        track.add_tracked_vessel(1);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![]), excursion(11, 1, vec![])]);
        assert_eq!(track.visible_excursions().len(), 2);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        let mut huge = excursion(10, 1, vec![]);
        huge.total_time_at_sea = Some(format!("PT{}S", u64::MAX));
        track.set_vessel_excursions(1, vec![huge, excursion(11, 1, vec![])]);

        let totals = track.vessel_totals(1).unwrap();
        assert_eq!(totals.time_at_sea, u64::MAX);
        assert_eq!(totals.time_fishing, 12 * 3600);
    }

    #[test]
    fn test_remove_keeps_unrelated_focus() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        track.add_tracked_vessel(2);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![])]);
        track.set_vessel_excursions(2, vec![excursion(20, 2, vec![])]);
        track.set_focused_excursion_id(Some(20));
        track.remove_tracked_vessel(1);
        assert_eq!(track.focused_excursion_id(), Some(20));
    }

    #[test]
    fn test_excursions_for_untracked_vessel_are_discarded() {
        let mut track = TrackOptions::default();
        assert!(!track.set_vessel_excursions(5, vec![excursion(1, 5, vec![])]));
        assert!(track.vessel_excursions(5).is_empty());
    }

    #[test]
    fn test_visibility_toggle_round_trip() {
        let mut track = TrackOptions::default();
        for id in [1, 2, 3] {
            let before = track.is_vessel_hidden(id);
            track.toggle_vessel_visibility(id);
            assert_ne!(track.is_vessel_hidden(id), before);
            track.toggle_vessel_visibility(id);
            assert_eq!(track.is_vessel_hidden(id), before);
        }
        track.toggle_excursion_visibility(9);
        track.toggle_excursion_visibility(9);
        assert!(!track.is_excursion_hidden(9));
    }

    #[test]
    fn test_visible_excursions_respect_hidden_sets() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        track.add_tracked_vessel(2);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![]), excursion(11, 1, vec![])]);
        track.set_vessel_excursions(2, vec![excursion(20, 2, vec![])]);

        track.toggle_excursion_visibility(11);
        let visible: Vec<_> = track.visible_excursions().iter().map(|(i, e)| (*i, e.id)).collect();
        assert_eq!(visible, vec![(0, 10), (1, 20)]);

        track.toggle_vessel_visibility(1);
        let visible: Vec<_> = track.visible_excursions().iter().map(|(i, e)| (*i, e.id)).collect();
        assert_eq!(visible, vec![(1, 20)]);
    }

    #[test]
    fn test_stale_focus_reads_as_none() {
        let mut track = TrackOptions::default();
        track.set_focused_excursion_id(Some(404));
        assert_eq!(track.focused_excursion_id(), Some(404));
        assert!(track.focused_excursion().is_none());
    }

    #[test]
    fn test_start_after_end_clears_end() {
        let mut track = TrackOptions::default();
        let day = |d| Utc.with_ymd_and_hms(2024, 5, d, 0, 0, 0).unwrap();
        track.set_start_date(Some(day(1)));
        assert!(track.set_end_date(Some(day(10))));

        track.set_start_date(Some(day(5)));
        assert_eq!(track.end_date(), Some(day(10)));

        track.set_start_date(Some(day(12)));
        assert_eq!(track.end_date(), None);

        assert!(!track.set_end_date(Some(day(11))));
        assert_eq!(track.end_date(), None);
    }

    #[test]
    fn test_vessel_totals() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![]), excursion(11, 1, vec![])]);
        let totals = track.vessel_totals(1).unwrap();
        assert_eq!(totals.time_at_sea, 40 * 3600);
        assert_eq!(totals.time_in_amp, 4 * 3600);
        assert_eq!(totals.time_fishing, 12 * 3600);
        assert_eq!(track.vessel_totals(99).unwrap(), ExcursionMetrics::default());
    }

    #[test]
    fn test_clear() {
        let mut track = TrackOptions::default();
        track.add_tracked_vessel(1);
        track.set_vessel_excursions(1, vec![excursion(10, 1, vec![])]);
        track.set_focused_excursion_id(Some(10));
        track.set_segment_mode(SegmentMode::Speed);
        track.clear();
        assert!(track.tracked_vessel_ids().is_empty());
        assert_eq!(track.focused_excursion_id(), None);
        assert_eq!(track.segment_mode(), SegmentMode::Speed);
    }
}
