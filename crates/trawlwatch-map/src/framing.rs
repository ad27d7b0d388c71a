//! # Camera Framing
//!
//! Fit the camera around an excursion: bounding box of the segment start
//! points, padded by half a degree, zoom derived from the larger span.

use geo::{BoundingRect, MultiPoint, Point};
use serde::Serialize;
use trawlwatch_domain::ExcursionId;

use crate::stores::{Easing, TrackOptions, Transition, ViewState};

/// Margin added on every side, in degrees
pub const FRAMING_PADDING_DEG: f64 = 0.5;

pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 20.0;

/// Fly-to used for focus transitions
pub const FOCUS_TRANSITION: Transition = Transition {
    duration_ms: 500,
    easing: Easing::EaseInOutCubic,
};

/// Axis-aligned box in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub min_lng: f64,
    pub min_lat: f64,
    pub max_lng: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Smallest box holding every point; `None` when there are none
    pub fn around(points: &[[f64; 2]]) -> Option<Self> {
        let cloud: MultiPoint<f64> = points.iter().map(|[lng, lat]| Point::new(*lng, *lat)).collect();
        let rect = cloud.bounding_rect()?;
        Some(Self {
            min_lng: rect.min().x,
            min_lat: rect.min().y,
            max_lng: rect.max().x,
            max_lat: rect.max().y,
        })
    }

    #[must_use]
    pub fn padded(&self, margin: f64) -> Self {
        Self {
            min_lng: self.min_lng - margin,
            min_lat: self.min_lat - margin,
            max_lng: self.max_lng + margin,
            max_lat: self.max_lat + margin,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        [
            (self.min_lng + self.max_lng) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        ]
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Computed camera target
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Framing {
    pub bounds: BoundingBox,
    pub padded: BoundingBox,
    pub center: [f64; 2],
    pub zoom: f64,
}

/// `floor(9 - log2(span))`, clamped to the renderer's zoom range
#[must_use]
pub fn zoom_for_span(span: f64) -> f64 {
    (9.0 - span.log2()).floor().clamp(MIN_ZOOM, MAX_ZOOM)
}

pub fn frame_points(points: &[[f64; 2]]) -> Option<Framing> {
    let bounds = BoundingBox::around(points)?;
    let padded = bounds.padded(FRAMING_PADDING_DEG);
    Some(Framing {
        bounds,
        padded,
        center: padded.center(),
        zoom: zoom_for_span(padded.lat_span().max(padded.lng_span())),
    })
}

/// Frame the start points of an excursion's segments.
///
/// `None` when the excursion cannot be resolved or has no segments.
pub fn frame_excursion(track: &TrackOptions, excursion_id: ExcursionId) -> Option<Framing> {
    let (_, excursion) = track.find_excursion(excursion_id)?;
    let points: Vec<[f64; 2]> = excursion
        .segments
        .iter()
        .map(|s| s.start_position.coordinates)
        .collect();
    frame_points(&points)
}

/// Camera update for `framing`, or `None` when already there
pub fn framed_view(current: &ViewState, framing: &Framing) -> Option<ViewState> {
    let [longitude, latitude] = framing.center;
    #[allow(clippy::float_cmp)]
    let already_there =
        current.longitude == longitude && current.latitude == latitude && current.zoom == framing.zoom;
    if already_there {
        return None;
    }
    Some(ViewState {
        longitude,
        latitude,
        zoom: framing.zoom,
        transition: Some(FOCUS_TRANSITION),
        ..*current
    })
}
