//! Track segments and optional per-segment markers for tracked vessels.

use trawlwatch_domain::{SegmentType, VesselExcursion, VesselExcursionSegment};

use super::{IconEntry, IconKind, IconLayer, LineEntry, LineLayer, MapSnapshot, PickTarget};
use crate::palette::{self, Rgba};
use crate::stores::{ModeKind, SegmentMode};

const BASE_WIDTH: f32 = 2.0;
const FISHING_WIDTH: f32 = 4.0;
const FOCUS_EXTRA_WIDTH: f32 = 2.0;

/// Dash pattern for degraded AIS segments
pub const DEFAULT_AIS_DASH: [f32; 2] = [6.0, 4.0];

/// Zoom floor and marker size, highest first
const POINT_SIZES: [(f64, f32); 4] = [(14.0, 22.0), (12.0, 16.0), (10.0, 12.0), (8.0, 8.0)];
const MIN_POINT_SIZE: f32 = 5.0;

/// Stroke width in pixels
pub fn segment_width(segment_type: SegmentType, focused: bool) -> f32 {
    let base = match segment_type {
        SegmentType::Fishing => FISHING_WIDTH,
        SegmentType::DefaultAis | SegmentType::AtSea => BASE_WIDTH,
    };
    if focused { base + FOCUS_EXTRA_WIDTH } else { base }
}

pub fn segment_dash(segment_type: SegmentType) -> Option<[f32; 2]> {
    (segment_type == SegmentType::DefaultAis).then_some(DEFAULT_AIS_DASH)
}

/// Marker size for the current zoom, five buckets
pub fn point_size_for_zoom(zoom: f64) -> f32 {
    POINT_SIZES
        .iter()
        .find(|(floor, _)| zoom >= *floor)
        .map_or(MIN_POINT_SIZE, |(_, size)| *size)
}

pub fn segment_color(mode: SegmentMode, tracked_index: usize, segment: &VesselExcursionSegment) -> Rgba {
    match mode {
        SegmentMode::Vessel => palette::color_for_index(tracked_index),
        SegmentMode::Speed => palette::speed_color(segment.mean_speed()),
    }
}

fn segment_pick(excursion: &VesselExcursion, segment: &VesselExcursionSegment) -> PickTarget {
    PickTarget::Segment {
        vessel_id: excursion.vessel_id,
        excursion_id: excursion.id,
        segment_id: segment.id,
    }
}

pub fn derive_tracks_layer(snapshot: &MapSnapshot<'_>) -> LineLayer {
    let track = snapshot.track;
    let focused = track.focused_excursion_id();
    let mode = track.segment_mode();

    let lines = track
        .visible_excursions()
        .into_iter()
        .flat_map(|(index, excursion)| {
            let is_focused = focused == Some(excursion.id);
            excursion.segments.iter().map(move |segment| LineEntry {
                source: segment.start_position.coordinates,
                target: segment.end_position.coordinates,
                color: segment_color(mode, index, segment),
                width: segment_width(segment.segment_type, is_focused),
                dash: segment_dash(segment.segment_type),
                pick: segment_pick(excursion, segment),
            })
        })
        .collect();

    LineLayer {
        id: "tracks".to_string(),
        visible: snapshot.map_view.mode() == ModeKind::Track,
        pickable: true,
        lines,
    }
}

/// Segment start markers; `None` unless the toggle is on
#[allow(clippy::cast_possible_truncation)]
pub fn derive_track_points_layer(snapshot: &MapSnapshot<'_>) -> Option<IconLayer> {
    let track = snapshot.track;
    if !track.show_positions() {
        return None;
    }
    let size = point_size_for_zoom(snapshot.map_view.view_state().zoom);

    let icons = track
        .visible_excursions()
        .into_iter()
        .flat_map(|(index, excursion)| {
            excursion.segments.iter().map(move |segment| {
                let (icon, angle) = match segment.heading_at_start {
                    Some(heading) => (IconKind::Arrow, -(heading as f32)),
                    None => (IconKind::Ellipse, 0.0),
                };
                IconEntry {
                    position: segment.start_position.coordinates,
                    icon,
                    size,
                    angle,
                    color: palette::color_for_index(index),
                    pick: segment_pick(excursion, segment),
                }
            })
        })
        .collect();

    Some(IconLayer {
        id: "track-points".to_string(),
        visible: snapshot.map_view.mode() == ModeKind::Track,
        pickable: true,
        icons,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::tests::Fixture;
    use crate::stores::track::tests::{excursion, segment};
    use chrono::Utc;

    fn tracked_fixture() -> Fixture {
        let mut fixture = Fixture::default();
        fixture.map_view.set_mode(ModeKind::Track);
        fixture.track.add_tracked_vessel(1);
        fixture.track.add_tracked_vessel(2);
        fixture.track.set_vessel_excursions(
            1,
            vec![excursion(
                10,
                1,
                vec![
                    segment(1, 10, [0.0, 0.0], [0.1, 0.1], SegmentType::AtSea),
                    segment(2, 10, [0.1, 0.1], [0.2, 0.2], SegmentType::Fishing),
                    segment(3, 10, [0.2, 0.2], [0.3, 0.3], SegmentType::DefaultAis),
                ],
            )],
        );
        fixture.track.set_vessel_excursions(
            2,
            vec![excursion(20, 2, vec![segment(4, 20, [1.0, 1.0], [1.1, 1.1], SegmentType::AtSea)])],
        );
        fixture
    }

    #[test]
    fn test_widths_and_dashes() {
        assert_eq!(segment_width(SegmentType::AtSea, false), 2.0);
        assert_eq!(segment_width(SegmentType::Fishing, false), 4.0);
        assert!(segment_width(SegmentType::AtSea, true) > segment_width(SegmentType::AtSea, false));
        assert_eq!(segment_dash(SegmentType::DefaultAis), Some(DEFAULT_AIS_DASH));
        assert_eq!(segment_dash(SegmentType::Fishing), None);
    }

    #[test]
    fn test_point_size_buckets() {
        assert_eq!(point_size_for_zoom(15.0), 22.0);
        assert_eq!(point_size_for_zoom(12.0), 16.0);
        assert_eq!(point_size_for_zoom(11.0), 12.0);
        assert_eq!(point_size_for_zoom(9.0), 8.0);
        assert_eq!(point_size_for_zoom(3.0), MIN_POINT_SIZE);
    }

    #[test]
    fn test_vessel_colouring() {
        let fixture = tracked_fixture();
        let layer = derive_tracks_layer(&fixture.snapshot(Utc::now()));
        assert!(layer.visible);
        assert_eq!(layer.lines.len(), 4);
        assert_eq!(layer.lines[0].color, palette::color_for_index(0));
        assert_eq!(layer.lines[3].color, palette::color_for_index(1));
        assert_eq!(layer.lines[1].width, 4.0);
        assert_eq!(layer.lines[2].dash, Some(DEFAULT_AIS_DASH));
    }

    #[test]
    fn test_speed_colouring() {
        let mut fixture = tracked_fixture();
        fixture.track.set_segment_mode(SegmentMode::Speed);
        let layer = derive_tracks_layer(&fixture.snapshot(Utc::now()));
        assert_eq!(layer.lines[0].color, palette::speed_color(Some(5.0)));
    }

    #[test]
    fn test_focused_excursion_is_wider() {
        let mut fixture = tracked_fixture();
        fixture.track.set_focused_excursion_id(Some(20));
        let layer = derive_tracks_layer(&fixture.snapshot(Utc::now()));
        assert_eq!(layer.lines[3].width, segment_width(SegmentType::AtSea, true));
        assert_eq!(layer.lines[0].width, segment_width(SegmentType::AtSea, false));
    }

    #[test]
    fn test_hidden_sets_remove_segments() {
        let mut fixture = tracked_fixture();
        fixture.track.toggle_vessel_visibility(1);
        let layer = derive_tracks_layer(&fixture.snapshot(Utc::now()));
        assert_eq!(layer.lines.len(), 1);

        fixture.track.toggle_excursion_visibility(20);
        assert!(derive_tracks_layer(&fixture.snapshot(Utc::now())).lines.is_empty());
    }

    #[test]
    fn test_missing_excursions_draw_nothing() {
        let mut fixture = Fixture::default();
        fixture.map_view.set_mode(ModeKind::Track);
        fixture.track.add_tracked_vessel(5);
        assert!(derive_tracks_layer(&fixture.snapshot(Utc::now())).lines.is_empty());
    }

    #[test]
    fn test_track_points() {
        let mut fixture = tracked_fixture();
        assert!(derive_track_points_layer(&fixture.snapshot(Utc::now())).is_none());

        fixture.track.set_show_positions(true);
        fixture.map_view.set_zoom(12.5);
        let layer = derive_track_points_layer(&fixture.snapshot(Utc::now())).unwrap();
        assert_eq!(layer.icons.len(), 4);
        assert_eq!(layer.icons[0].size, 16.0);
        assert_eq!(layer.icons[0].angle, -45.0);
        assert_eq!(layer.icons[3].color, palette::color_for_index(1));
    }

    #[test]
    fn test_tracks_hidden_in_position_mode() {
        let mut fixture = tracked_fixture();
        fixture.map_view.set_mode(ModeKind::Position);
        assert!(!derive_tracks_layer(&fixture.snapshot(Utc::now())).visible);
    }
}
