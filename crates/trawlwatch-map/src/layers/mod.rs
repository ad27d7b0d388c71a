//! # Layer Derivation
//!
//! Pure functions from a [`MapSnapshot`] to renderer-agnostic layer
//! descriptors. Nothing here mutates state; interaction flows back as
//! [`PickTarget`]s carried by every drawn item.
//!
//! ```text
//! MapSnapshot ──► derive_layers ──► [zones.., ports, tracks, track points, vessels]
//!                                              │
//!                          renderer click ─────┴──► MapEvent::Click(PickTarget)
//! ```

pub mod excursions;
pub mod ports;
pub mod vessels;
pub mod zones;

use chrono::{DateTime, Utc};
use serde::Serialize;
use trawlwatch_domain::{ExcursionId, PortId, Ring, SegmentId, VesselId, ZoneCategory, ZoneId};

use crate::palette::Rgba;
use crate::stores::{LoadingFlags, MapView, PortsStore, TrackOptions, VesselsDirectory, ZonesStore};

pub use excursions::{derive_track_points_layer, derive_tracks_layer};
pub use ports::derive_ports_layer;
pub use vessels::derive_vessels_layer;
pub use zones::derive_zone_layers;

/// `[longitude, latitude]`
pub type LngLat = [f64; 2];

/// Borrowed view over every store a derivation reads
#[derive(Debug, Clone, Copy)]
pub struct MapSnapshot<'a> {
    pub map_view: &'a MapView,
    pub track: &'a TrackOptions,
    pub vessels: &'a VesselsDirectory,
    pub ports: &'a PortsStore,
    pub zones: &'a ZonesStore,
    pub loading: &'a LoadingFlags,
    /// Reference time for recency opacity
    pub now: DateTime<Utc>,
}

/// What a click or hover landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PickTarget {
    Position { vessel_id: VesselId },
    Segment { vessel_id: VesselId, excursion_id: ExcursionId, segment_id: SegmentId },
    Zone { zone_id: ZoneId },
    Port { port_id: PortId },
}

/// Marker shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IconKind {
    /// Heading known, rotated to it
    Arrow,
    /// Heading unknown
    Ellipse,
    Anchor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconEntry {
    pub position: LngLat,
    pub icon: IconKind,
    /// Pixels
    pub size: f32,
    /// Counter-clockwise degrees
    pub angle: f32,
    pub color: Rgba,
    pub pick: PickTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IconLayer {
    pub id: String,
    pub visible: bool,
    pub pickable: bool,
    pub icons: Vec<IconEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineEntry {
    pub source: LngLat,
    pub target: LngLat,
    pub color: Rgba,
    /// Pixels
    pub width: f32,
    /// Dash and gap lengths in pixels; `None` draws a solid stroke
    pub dash: Option<[f32; 2]>,
    pub pick: PickTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineLayer {
    pub id: String,
    pub visible: bool,
    pub pickable: bool,
    pub lines: Vec<LineEntry>,
}

/// Rendering primitive for a zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneShape {
    Polygon,
    MultiPolygon,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonEntry {
    pub zone_id: ZoneId,
    pub name: String,
    /// One entry per polygon, each a list of rings
    pub polygons: Vec<Vec<Ring>>,
    pub pick: PickTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLayer {
    pub id: String,
    pub visible: bool,
    pub pickable: bool,
    pub category: ZoneCategory,
    pub shape: ZoneShape,
    pub fill: Rgba,
    pub stroke: Rgba,
    pub stroke_width: f32,
    pub zones: Vec<PolygonEntry>,
}

/// One renderable layer
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Layer {
    Icon(IconLayer),
    Line(LineLayer),
    Polygon(PolygonLayer),
}

impl Layer {
    pub fn id(&self) -> &str {
        match self {
            Self::Icon(layer) => &layer.id,
            Self::Line(layer) => &layer.id,
            Self::Polygon(layer) => &layer.id,
        }
    }

    pub fn visible(&self) -> bool {
        match self {
            Self::Icon(layer) => layer.visible,
            Self::Line(layer) => layer.visible,
            Self::Polygon(layer) => layer.visible,
        }
    }
}

/// Every layer for the snapshot, bottom to top
pub fn derive_layers(snapshot: &MapSnapshot<'_>) -> Vec<Layer> {
    let mut layers: Vec<Layer> = derive_zone_layers(snapshot.zones, snapshot.loading, &snapshot.map_view.zone_visibility())
        .into_iter()
        .map(Layer::Polygon)
        .collect();

    layers.push(Layer::Icon(derive_ports_layer(snapshot)));
    layers.push(Layer::Line(derive_tracks_layer(snapshot)));
    if let Some(points) = derive_track_points_layer(snapshot) {
        layers.push(Layer::Icon(points));
    }
    layers.push(Layer::Icon(derive_vessels_layer(snapshot)));
    layers
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::stores::ModeKind;

    /// Owned stores that a test can mutate before taking a snapshot
    #[derive(Default)]
    pub(crate) struct Fixture {
        pub map_view: MapView,
        pub track: TrackOptions,
        pub vessels: VesselsDirectory,
        pub ports: PortsStore,
        pub zones: ZonesStore,
        pub loading: LoadingFlags,
    }

    impl Fixture {
        pub(crate) fn snapshot(&self, now: DateTime<Utc>) -> MapSnapshot<'_> {
            MapSnapshot {
                map_view: &self.map_view,
                track: &self.track,
                vessels: &self.vessels,
                ports: &self.ports,
                zones: &self.zones,
                loading: &self.loading,
                now,
            }
        }
    }

    #[test]
    fn test_layer_order() {
        let fixture = Fixture::default();
        let layers = derive_layers(&fixture.snapshot(Utc::now()));
        let ids: Vec<_> = layers.iter().map(Layer::id).collect();
        assert_eq!(ids.last(), Some(&"vessels"));
        assert!(ids.iter().position(|id| *id == "tracks") > ids.iter().position(|id| *id == "ports"));
        assert_eq!(ids.iter().filter(|id| id.starts_with("zones-")).count(), 6);
    }

    #[test]
    fn test_track_points_only_when_enabled() {
        let mut fixture = Fixture::default();
        fixture.map_view.set_mode(ModeKind::Track);
        let ids = |f: &Fixture| -> Vec<String> {
            derive_layers(&f.snapshot(Utc::now())).iter().map(|l| l.id().to_string()).collect()
        };
        assert!(!ids(&fixture).contains(&"track-points".to_string()));

        fixture.track.set_show_positions(true);
        assert!(ids(&fixture).contains(&"track-points".to_string()));
    }

    #[test]
    fn test_layers_serialize_for_renderer() {
        let fixture = Fixture::default();
        let json = serde_json::to_value(derive_layers(&fixture.snapshot(Utc::now()))).unwrap();
        assert_eq!(json[0]["type"], "polygon");
        assert_eq!(json[0]["shape"], "polygon");
    }
}
