//! # Map Session
//!
//! One [`MapSession`] per mounted map. It owns every store, derives the
//! layers from them and reduces the renderer's pointer and camera events.
//! Dropping the session tears the whole map state down.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use trawlwatch_domain::{ExcursionId, ExcursionMetrics, VesselId};

use crate::commands::{MetricsReport, RequestTracker};
use crate::error::{MapError, Result};
use crate::framing::{frame_excursion, framed_view};
use crate::layers::{derive_layers, Layer, MapSnapshot, PickTarget};
use crate::stores::{
    LoadingFlags, MapView, ModeKind, PortsStore, TrackOptions, ViewState, VesselsDirectory,
    ZonesStore,
};

/// Something the renderer observed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MapEvent {
    Click(PickTarget),
    Hover(Option<PickTarget>),
    /// The camera moved. `user_initiated` is false for moves the session
    /// itself requested.
    ViewStateChanged { view_state: ViewState, user_initiated: bool },
}

#[derive(Debug, Default)]
pub struct MapSession {
    pub map_view: MapView,
    pub track: TrackOptions,
    pub vessels: VesselsDirectory,
    pub ports: PortsStore,
    pub zones: ZonesStore,
    pub loading: LoadingFlags,
    pub metrics: MetricsReport,
    pub(crate) requests: RequestTracker,
    hovered: Option<PickTarget>,
}

impl MapSession {
    pub fn new(initial_view: ViewState) -> Self {
        Self {
            map_view: MapView::new(initial_view),
            ..Self::default()
        }
    }

    pub fn snapshot(&self, now: DateTime<Utc>) -> MapSnapshot<'_> {
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

    pub fn layers(&self, now: DateTime<Utc>) -> Vec<Layer> {
        derive_layers(&self.snapshot(now))
    }

    pub fn set_mode(&mut self, mode: ModeKind) {
        self.map_view.set_mode(mode);
    }

    pub fn hovered(&self) -> Option<PickTarget> {
        self.hovered
    }

    /// Focus an excursion and frame the camera on it.
    ///
    /// Returns the camera the renderer should fly to, or `None` when the
    /// excursion does not resolve or the camera is already there.
    pub fn focus_excursion(&mut self, excursion_id: ExcursionId) -> Option<ViewState> {
        self.track.set_focused_excursion_id(Some(excursion_id));
        self.frame(excursion_id)
    }

    /// Re-run the framing for the focused excursion
    pub fn recenter_focused(&mut self) -> Option<ViewState> {
        let excursion_id = self.track.focused_excursion_id()?;
        self.frame(excursion_id)
    }

    pub fn clear_focus(&mut self) {
        self.track.set_focused_excursion_id(None);
    }

    fn frame(&mut self, excursion_id: ExcursionId) -> Option<ViewState> {
        let framing = frame_excursion(&self.track, excursion_id)?;
        let next = framed_view(self.map_view.view_state(), &framing)?;
        debug!(excursion_id, zoom = next.zoom, "framing excursion");
        self.map_view.set_view_state(next);
        Some(next)
    }

    /// Apply a renderer event; returns a camera move to animate, if any
    pub fn handle(&mut self, event: MapEvent) -> Option<ViewState> {
        match event {
            MapEvent::Click(target) => self.click(target),
            MapEvent::Hover(target) => {
                self.hovered = target;
                None
            }
            MapEvent::ViewStateChanged { view_state, user_initiated } => {
                if user_initiated && self.track.focused_excursion_id().is_some() {
                    debug!("manual camera move, dropping focus");
                    self.clear_focus();
                }
                self.map_view.set_view_state(ViewState { transition: None, ..view_state });
                None
            }
        }
    }

    fn click(&mut self, target: PickTarget) -> Option<ViewState> {
        match target {
            PickTarget::Position { vessel_id } => {
                let position = self.map_view.position_of(vessel_id).cloned();
                self.map_view.set_active_position(position);
                None
            }
            PickTarget::Segment { excursion_id, .. } => {
                let camera = if self.track.focused_excursion_id() == Some(excursion_id) {
                    self.recenter_focused()
                } else {
                    self.focus_excursion(excursion_id)
                };
                self.map_view.set_left_panel_open(true);
                camera
            }
            PickTarget::Zone { .. } | PickTarget::Port { .. } => None,
        }
    }

    /// Tooltip text for a pick target
    pub fn describe(&self, target: PickTarget) -> Option<String> {
        match target {
            PickTarget::Position { vessel_id } => {
                let position = self.map_view.position_of(vessel_id)?;
                let speed = position
                    .speed
                    .map_or_else(|| "speed unknown".to_string(), |s| format!("{s:.1} kn"));
                Some(format!("{} ({speed})", position.vessel.display_name()))
            }
            PickTarget::Segment { vessel_id, excursion_id, segment_id } => {
                let (_, excursion) = self.track.find_excursion(excursion_id)?;
                let segment = excursion.segments.iter().find(|s| s.id == segment_id)?;
                let name = self
                    .vessels
                    .get(vessel_id)
                    .map_or_else(|| format!("Vessel {vessel_id}"), |v| v.display_name());
                Some(format!(
                    "{name} {} {}",
                    segment.timestamp_start.format("%Y-%m-%d %H:%M"),
                    segment
                        .mean_speed()
                        .map_or_else(String::new, |s| format!("{s:.1} kn")),
                ))
            }
            PickTarget::Zone { zone_id } => self
                .zones
                .get(zone_id)
                .map(|z| format!("{} ({})", z.name, z.category.label())),
            PickTarget::Port { port_id } => self.ports.get(port_id).map(|p| p.name.clone()),
        }
    }

    pub fn tooltip(&self) -> Option<String> {
        self.hovered.and_then(|target| self.describe(target))
    }

    /// Summed excursion durations for the track panel
    ///
    /// # Errors
    ///
    /// [`MapError::NotTracked`] for an untracked vessel, or the domain
    /// error of the first malformed duration.
    pub fn vessel_totals(&self, vessel_id: VesselId) -> Result<ExcursionMetrics> {
        if !self.track.is_tracked(vessel_id) {
            return Err(MapError::NotTracked(vessel_id));
        }
        Ok(self.track.vessel_totals(vessel_id)?)
    }
}
