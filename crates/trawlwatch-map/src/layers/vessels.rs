//! Vessel markers from the latest-positions snapshot.

use chrono::{DateTime, Duration, Utc};
use trawlwatch_domain::VesselPosition;

use super::{IconEntry, IconKind, IconLayer, MapSnapshot, PickTarget};
use crate::palette::{self, Rgba};
use crate::stores::{DataDomain, ModeKind};

/// Age limit in minutes and the opacity granted below it
const RECENCY_STEPS: [(i64, f32); 3] = [(45, 1.0), (3 * 60, 0.7), (5 * 60, 0.55)];

/// Opacity for anything older than the last step
pub const STALE_OPACITY: f32 = 0.4;

/// Marker size bucket by hull length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small,
    Medium,
    Large,
}

impl IconSize {
    pub fn for_length(length: Option<f64>) -> Self {
        match length {
            Some(l) if l > 80.0 => Self::Large,
            Some(l) if l > 40.0 => Self::Medium,
            _ => Self::Small,
        }
    }

    pub fn pixels(self) -> f32 {
        match self {
            Self::Small => 18.0,
            Self::Medium => 26.0,
            Self::Large => 34.0,
        }
    }
}

/// Step function of position age
pub fn recency_opacity(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> f32 {
    let age = now - timestamp;
    RECENCY_STEPS
        .iter()
        .find(|(minutes, _)| age <= Duration::minutes(*minutes))
        .map_or(STALE_OPACITY, |(_, opacity)| *opacity)
}

/// Positions to draw: tracked ones in track mode, filtered ones otherwise
pub fn select_positions<'a>(snapshot: &MapSnapshot<'a>) -> Vec<&'a VesselPosition> {
    let positions = snapshot.map_view.positions();
    match snapshot.map_view.mode() {
        ModeKind::Track => positions
            .iter()
            .filter(|p| snapshot.track.is_tracked(p.vessel.id))
            .collect(),
        ModeKind::Position => {
            let filters = snapshot.vessels.filters();
            positions.iter().filter(|p| filters.matches(&p.vessel)).collect()
        }
    }
}

fn marker_color(snapshot: &MapSnapshot<'_>, position: &VesselPosition) -> Rgba {
    match snapshot.map_view.mode() {
        ModeKind::Track => snapshot
            .track
            .tracked_index(position.vessel.id)
            .map_or(palette::NEUTRAL, palette::color_for_index),
        ModeKind::Position => {
            let base = match snapshot.map_view.active_position() {
                Some(active) if active.vessel.id == position.vessel.id => palette::HIGHLIGHT,
                _ => palette::NEUTRAL,
            };
            palette::with_opacity(base, recency_opacity(position.timestamp, snapshot.now))
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn marker(snapshot: &MapSnapshot<'_>, position: &VesselPosition) -> IconEntry {
    let (icon, angle) = match position.heading {
        Some(heading) => (IconKind::Arrow, -(heading as f32)),
        None => (IconKind::Ellipse, 0.0),
    };
    IconEntry {
        position: position.position.coordinates,
        icon,
        size: IconSize::for_length(position.vessel.length).pixels(),
        angle,
        color: marker_color(snapshot, position),
        pick: PickTarget::Position { vessel_id: position.vessel.id },
    }
}

pub fn derive_vessels_layer(snapshot: &MapSnapshot<'_>) -> IconLayer {
    let positions = select_positions(snapshot);
    let waiting = positions.is_empty() && snapshot.loading.is_loading(DataDomain::Positions);
    IconLayer {
        id: "vessels".to_string(),
        visible: !waiting,
        pickable: true,
        icons: positions.into_iter().map(|p| marker(snapshot, p)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::tests::Fixture;
    use crate::stores::map_view::tests::position_at;
    use crate::stores::FilterDimension;

    #[test]
    fn test_recency_steps() {
        let now = Utc::now();
        assert_eq!(recency_opacity(now - Duration::minutes(30), now), 1.0);
        assert_eq!(recency_opacity(now - Duration::minutes(45), now), 1.0);
        assert_eq!(recency_opacity(now - Duration::hours(2), now), 0.7);
        assert_eq!(recency_opacity(now - Duration::hours(4), now), 0.55);
        assert_eq!(recency_opacity(now - Duration::hours(10), now), STALE_OPACITY);
    }

    #[test]
    fn test_size_buckets() {
        assert_eq!(IconSize::for_length(Some(95.0)), IconSize::Large);
        assert_eq!(IconSize::for_length(Some(80.0)), IconSize::Medium);
        assert_eq!(IconSize::for_length(Some(41.0)), IconSize::Medium);
        assert_eq!(IconSize::for_length(Some(40.0)), IconSize::Small);
        assert_eq!(IconSize::for_length(None), IconSize::Small);
    }

    #[test]
    fn test_position_mode_filters() {
        let now = Utc::now();
        let mut fixture = Fixture::default();
        let mut spanish = position_at(2, 1.0, 1.0, now);
        spanish.vessel.country_iso3 = Some("ESP".into());
        let mut seiner = position_at(3, 2.0, 2.0, now);
        seiner.vessel.vessel_type = Some("seiner".into());
        fixture.map_view.set_positions(vec![position_at(1, 0.0, 0.0, now), spanish, seiner]);

        fixture.vessels.set_filter(FilterDimension::Type, ["trawler".to_string()]);
        fixture.vessels.set_filter(FilterDimension::Country, ["FRA".to_string()]);

        let layer = derive_vessels_layer(&fixture.snapshot(now));
        let ids: Vec<_> = layer.icons.iter().map(|i| i.pick).collect();
        assert_eq!(ids, vec![PickTarget::Position { vessel_id: 1 }]);
    }

    #[test]
    fn test_active_position_is_highlighted() {
        let now = Utc::now();
        let mut fixture = Fixture::default();
        let first = position_at(1, 0.0, 0.0, now);
        fixture.map_view.set_positions(vec![first.clone(), position_at(2, 1.0, 1.0, now)]);
        fixture.map_view.set_active_position(Some(first));

        let layer = derive_vessels_layer(&fixture.snapshot(now));
        assert_eq!(layer.icons[0].color, palette::HIGHLIGHT);
        assert_eq!(layer.icons[1].color, palette::NEUTRAL);
    }

    #[test]
    fn test_old_positions_fade() {
        let now = Utc::now();
        let mut fixture = Fixture::default();
        fixture.map_view.set_positions(vec![position_at(1, 0.0, 0.0, now - Duration::hours(4))]);

        let layer = derive_vessels_layer(&fixture.snapshot(now));
        assert_eq!(layer.icons[0].color[3], palette::with_opacity(palette::NEUTRAL, 0.55)[3]);
    }

    #[test]
    fn test_icon_variant_and_rotation() {
        let now = Utc::now();
        let mut fixture = Fixture::default();
        let mut drifting = position_at(2, 1.0, 1.0, now);
        drifting.heading = None;
        drifting.vessel.length = Some(90.0);
        fixture.map_view.set_positions(vec![position_at(1, 0.0, 0.0, now), drifting]);

        let layer = derive_vessels_layer(&fixture.snapshot(now));
        assert_eq!(layer.icons[0].icon, IconKind::Arrow);
        assert_eq!(layer.icons[0].angle, -90.0);
        assert_eq!(layer.icons[1].icon, IconKind::Ellipse);
        assert_eq!(layer.icons[1].size, IconSize::Large.pixels());
    }

    #[test]
    fn test_track_mode_uses_palette() {
        let now = Utc::now();
        let mut fixture = Fixture::default();
        fixture.map_view.set_positions(vec![
            position_at(1, 0.0, 0.0, now - Duration::hours(10)),
            position_at(2, 1.0, 1.0, now),
            position_at(3, 2.0, 2.0, now),
        ]);
        fixture.map_view.set_mode(ModeKind::Track);
        fixture.track.add_tracked_vessel(3);
        fixture.track.add_tracked_vessel(1);

        let layer = derive_vessels_layer(&fixture.snapshot(now));
        assert_eq!(layer.icons.len(), 2);
        assert_eq!(layer.icons[0].pick, PickTarget::Position { vessel_id: 1 });
        assert_eq!(layer.icons[0].color, palette::color_for_index(1));
        assert_eq!(layer.icons[1].color, palette::color_for_index(0));
    }

    #[test]
    fn test_hidden_while_first_load_pending() {
        let mut fixture = Fixture::default();
        fixture.loading.begin(DataDomain::Positions);
        assert!(!derive_vessels_layer(&fixture.snapshot(Utc::now())).visible);
    }
}
