//! # Map View Store
//!
//! Camera, display mode, latest positions snapshot, side panel and zone
//! category toggles.
//!
//! The camera record is only ever replaced whole. Helpers that change a
//! single field read the current record and write back a full copy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use trawlwatch_domain::{VesselId, VesselPosition, ZoneCategory};

use super::zones::ZoneVisibility;

/// Camera interpolation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    EaseInOutCubic,
}

/// How the renderer should move to a new camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub duration_ms: u32,
    pub easing: Easing,
}

/// Camera parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub pitch: f64,
    pub bearing: f64,
    #[serde(default)]
    pub transition: Option<Transition>,
}

/// Bay of Biscay, where the fleet works
pub const INITIAL_VIEW_STATE: ViewState = ViewState {
    longitude: 3.788_086,
    latitude: 47.840_291,
    zoom: 5.0,
    pitch: 20.0,
    bearing: 0.0,
    transition: None,
};

impl Default for ViewState {
    fn default() -> Self {
        INITIAL_VIEW_STATE
    }
}

/// Top-level display mode.
///
/// Only position mode can carry a previewed position, so leaving it drops
/// the preview card.
#[derive(Debug, Clone, PartialEq)]
pub enum MapMode {
    Position { active: Option<VesselPosition> },
    Track,
}

impl Default for MapMode {
    fn default() -> Self {
        Self::Position { active: None }
    }
}

/// Mode tag without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Position,
    Track,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapView {
    view_state: ViewState,
    mode: MapMode,
    positions: Vec<VesselPosition>,
    left_panel_open: bool,
    displayed_zones: BTreeSet<ZoneCategory>,
}

impl MapView {
    pub fn new(view_state: ViewState) -> Self {
        Self {
            view_state,
            ..Self::default()
        }
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    /// Replace the camera record
    pub fn set_view_state(&mut self, view_state: ViewState) {
        self.view_state = view_state;
    }

    pub fn set_zoom(&mut self, zoom: f64) {
        let current = self.view_state;
        self.set_view_state(ViewState { zoom, ..current });
    }

    pub fn mode(&self) -> ModeKind {
        match self.mode {
            MapMode::Position { .. } => ModeKind::Position,
            MapMode::Track => ModeKind::Track,
        }
    }

    pub fn set_mode(&mut self, kind: ModeKind) {
        if self.mode() == kind {
            return;
        }
        self.mode = match kind {
            ModeKind::Position => MapMode::Position { active: None },
            ModeKind::Track => MapMode::Track,
        };
        tracing::debug!(mode = ?kind, "map mode changed");
    }

    pub fn active_position(&self) -> Option<&VesselPosition> {
        match &self.mode {
            MapMode::Position { active } => active.as_ref(),
            MapMode::Track => None,
        }
    }

    /// Open (or close, with `None`) the preview card.
    ///
    /// Returns `false` in track mode, where there is no preview card.
    pub fn set_active_position(&mut self, position: Option<VesselPosition>) -> bool {
        match &mut self.mode {
            MapMode::Position { active } => {
                *active = position;
                true
            }
            MapMode::Track => false,
        }
    }

    pub fn positions(&self) -> &[VesselPosition] {
        &self.positions
    }

    pub fn position_of(&self, vessel_id: VesselId) -> Option<&VesselPosition> {
        self.positions.iter().find(|p| p.vessel.id == vessel_id)
    }

    /// Replace the snapshot. Points outside WGS84 bounds are dropped.
    pub fn set_positions(&mut self, positions: Vec<VesselPosition>) {
        let before = positions.len();
        self.positions = positions
            .into_iter()
            .filter(|p| p.position.validate().is_ok())
            .collect();
        let dropped = before - self.positions.len();
        if dropped > 0 {
            tracing::warn!(dropped, "ignored positions with invalid coordinates");
        }
    }

    pub fn left_panel_open(&self) -> bool {
        self.left_panel_open
    }

    pub fn set_left_panel_open(&mut self, open: bool) {
        self.left_panel_open = open;
    }

    pub fn toggle_left_panel(&mut self) {
        self.left_panel_open = !self.left_panel_open;
    }

    pub fn displayed_zone_categories(&self) -> &BTreeSet<ZoneCategory> {
        &self.displayed_zones
    }

    pub fn toggle_zone_category(&mut self, category: ZoneCategory) {
        if !self.displayed_zones.remove(&category) {
            self.displayed_zones.insert(category);
        }
    }

    /// Empty selection shows every category
    pub fn is_zone_category_displayed(&self, category: ZoneCategory) -> bool {
        self.zone_visibility().shows(category)
    }

    pub fn zone_visibility(&self) -> ZoneVisibility {
        ZoneVisibility::Categories(self.displayed_zones.clone())
    }
}
