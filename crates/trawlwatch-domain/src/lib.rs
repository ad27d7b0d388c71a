//! # TrawlWatch - Domain Model
//!
//! Vessels, their latest positions, historical excursions and marine
//! zones as served by the TrawlWatch backend. These types are shared by
//! the map core, the browser dashboard and the operator CLI.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use duration::{convert_duration_in_seconds, format_duration, parse_duration_seconds};

pub type VesselId = i64;
pub type ExcursionId = i64;
pub type SegmentId = i64;
pub type ZoneId = i64;
pub type PortId = i64;

// =============================================================================
// VALUE OBJECTS
// =============================================================================

/// GeoJSON point marker
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointKind {
    #[default]
    Point,
}

/// Geographic point in GeoJSON order: `[longitude, latitude]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default)]
    pub kind: PointKind,
    pub coordinates: [f64; 2],
}

impl GeoPoint {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: PointKind::Point,
            coordinates: [longitude, latitude],
        }
    }

    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Reject points outside WGS84 bounds
    pub fn validate(&self) -> Result<(), DomainError> {
        let (lon, lat) = (self.longitude(), self.latitude());
        if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
            Ok(())
        } else {
            Err(DomainError::InvalidCoordinates { lat, lon })
        }
    }
}

/// Linear ring in GeoJSON order
pub type Ring = Vec<[f64; 2]>;

/// Zone outline, single or multi polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum ZoneGeometry {
    Polygon(Vec<Ring>),
    MultiPolygon(Vec<Vec<Ring>>),
}

impl ZoneGeometry {
    pub fn is_multi(&self) -> bool {
        matches!(self, Self::MultiPolygon(_))
    }
}

// =============================================================================
// ENUMS
// =============================================================================

/// Segment behaviour tag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentType {
    Fishing,
    DefaultAis,
    #[default]
    #[serde(other)]
    AtSea,
}

/// Marine zone category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ZoneCategory {
    Amp,
    TerritorialSeas,
    FishingCoastalWaters,
    #[serde(other)]
    Other,
}

impl ZoneCategory {
    /// Categories the map knows how to draw
    pub const DISPLAYABLE: [Self; 3] = [Self::Amp, Self::TerritorialSeas, Self::FishingCoastalWaters];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amp => "AMP",
            Self::TerritorialSeas => "TERRITORIAL_SEAS",
            Self::FishingCoastalWaters => "FISHING_COASTAL_WATERS",
            Self::Other => "OTHER",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Amp => "Marine protected areas",
            Self::TerritorialSeas => "Territorial seas",
            Self::FishingCoastalWaters => "Fishing coastal waters",
            Self::Other => "Other zones",
        }
    }
}

/// Sort direction for ranked metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Order {
    Asc,
    #[default]
    Desc,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

// =============================================================================
// ENTITY TYPES
// =============================================================================

/// Vessel reference data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub id: VesselId,
    #[serde(default)]
    pub mmsi: Option<i64>,
    #[serde(default)]
    pub imo: Option<i64>,
    #[serde(default)]
    pub ship_name: Option<String>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(rename = "type", default)]
    pub vessel_type: Option<String>,
    #[serde(default)]
    pub length_class: Option<String>,
    #[serde(default)]
    pub country_iso3: Option<String>,
}

impl Vessel {
    /// Display name, falling back to the MMSI then the id
    pub fn display_name(&self) -> String {
        match (&self.ship_name, self.mmsi) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(mmsi)) => format!("MMSI {mmsi}"),
            _ => format!("Vessel #{}", self.id),
        }
    }
}

/// Latest known position of a vessel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselPosition {
    pub id: i64,
    pub vessel: Vessel,
    pub position: GeoPoint,
    #[serde(default)]
    pub heading: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

/// One leg of an excursion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselExcursionSegment {
    pub id: SegmentId,
    pub excursion_id: ExcursionId,
    pub timestamp_start: DateTime<Utc>,
    pub timestamp_end: DateTime<Utc>,
    #[serde(default)]
    pub segment_duration: Option<String>,
    pub start_position: GeoPoint,
    pub end_position: GeoPoint,
    #[serde(default)]
    pub heading_at_start: Option<f64>,
    #[serde(default)]
    pub heading_at_end: Option<f64>,
    #[serde(default)]
    pub speed_at_start: Option<f64>,
    #[serde(default)]
    pub speed_at_end: Option<f64>,
    #[serde(default)]
    pub average_speed: Option<f64>,
    #[serde(rename = "type", default)]
    pub segment_type: SegmentType,
    #[serde(default)]
    pub in_amp_zone: bool,
    #[serde(default)]
    pub in_territorial_waters: bool,
    #[serde(default)]
    pub in_zone_with_no_fishing_rights: bool,
}

impl VesselExcursionSegment {
    /// Backend average, else the mean of whichever endpoint speeds are known
    #[must_use]
    pub fn mean_speed(&self) -> Option<f64> {
        self.average_speed.or(match (self.speed_at_start, self.speed_at_end) {
            (Some(a), Some(b)) => Some((a + b) / 2.0),
            (Some(s), None) | (None, Some(s)) => Some(s),
            (None, None) => None,
        })
    }
}

/// One voyage of a vessel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselExcursion {
    pub id: ExcursionId,
    pub vessel_id: VesselId,
    #[serde(default)]
    pub departure_port_id: Option<PortId>,
    #[serde(default)]
    pub departure_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub departure_position: Option<GeoPoint>,
    #[serde(default)]
    pub arrival_port_id: Option<PortId>,
    #[serde(default)]
    pub arrival_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub arrival_position: Option<GeoPoint>,
    #[serde(default)]
    pub excursion_duration: Option<String>,
    #[serde(default)]
    pub total_time_at_sea: Option<String>,
    #[serde(default)]
    pub total_time_in_amp: Option<String>,
    #[serde(default)]
    pub total_time_in_territorial_waters: Option<String>,
    #[serde(default)]
    pub total_time_in_zones_with_no_fishing_rights: Option<String>,
    #[serde(default)]
    pub total_time_fishing: Option<String>,
    #[serde(default)]
    pub total_time_default_ais: Option<String>,
    #[serde(default)]
    pub segments: Vec<VesselExcursionSegment>,
}

impl VesselExcursion {
    /// True while the vessel has not come back to port
    pub fn is_ongoing(&self) -> bool {
        self.arrival_at.is_none()
    }

    /// Does the excursion span intersect `[start, end]`? Unset bounds are open.
    pub fn overlaps(&self, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> bool {
        let begins_before_end = match (self.departure_at, end) {
            (Some(departure), Some(end)) => departure <= end,
            _ => true,
        };
        let ends_after_start = match (self.arrival_at, start) {
            (Some(arrival), Some(start)) => arrival >= start,
            _ => true,
        };
        begins_before_end && ends_after_start
    }

    /// Parse the cumulative duration fields
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MalformedDuration`] if any field is malformed.
    pub fn metrics(&self) -> Result<ExcursionMetrics, DomainError> {
        let seconds = |v: &Option<String>| convert_duration_in_seconds(v.as_deref());
        Ok(ExcursionMetrics {
            time_at_sea: seconds(&self.total_time_at_sea)?,
            time_in_amp: seconds(&self.total_time_in_amp)?,
            time_in_territorial_waters: seconds(&self.total_time_in_territorial_waters)?,
            time_in_zones_with_no_fishing_rights: seconds(
                &self.total_time_in_zones_with_no_fishing_rights,
            )?,
            time_fishing: seconds(&self.total_time_fishing)?,
            time_default_ais: seconds(&self.total_time_default_ais)?,
        })
    }
}

/// Excursion durations in seconds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcursionMetrics {
    pub time_at_sea: u64,
    pub time_in_amp: u64,
    pub time_in_territorial_waters: u64,
    pub time_in_zones_with_no_fishing_rights: u64,
    pub time_fishing: u64,
    pub time_default_ais: u64,
}

/// Field-wise sum, saturating at `u64::MAX`
impl std::ops::Add for ExcursionMetrics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            time_at_sea: self.time_at_sea.saturating_add(rhs.time_at_sea),
            time_in_amp: self.time_in_amp.saturating_add(rhs.time_in_amp),
            time_in_territorial_waters: self
                .time_in_territorial_waters
                .saturating_add(rhs.time_in_territorial_waters),
            time_in_zones_with_no_fishing_rights: self
                .time_in_zones_with_no_fishing_rights
                .saturating_add(rhs.time_in_zones_with_no_fishing_rights),
            time_fishing: self.time_fishing.saturating_add(rhs.time_fishing),
            time_default_ais: self.time_default_ais.saturating_add(rhs.time_default_ais),
        }
    }
}

/// Named marine zone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: ZoneId,
    pub category: ZoneCategory,
    #[serde(default)]
    pub sub_category: Option<String>,
    pub name: String,
    pub geometry: ZoneGeometry,
}

/// Port of call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub id: PortId,
    pub name: String,
    #[serde(default)]
    pub locode: Option<String>,
    #[serde(default)]
    pub country_iso3: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

// =============================================================================
// METRICS TYPES
// =============================================================================

/// Vessel ranked by time at sea
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselActivity {
    pub vessel: Vessel,
    #[serde(default)]
    pub total_time_at_sea: Option<String>,
}

impl VesselActivity {
    pub fn time_at_sea_seconds(&self) -> Result<u64, DomainError> {
        convert_duration_in_seconds(self.total_time_at_sea.as_deref())
    }
}

/// Zone summary embedded in visit metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: ZoneId,
    pub name: String,
    pub category: ZoneCategory,
    #[serde(default)]
    pub sub_category: Option<String>,
}

/// Zone ranked by visiting time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneVisit {
    pub zone: ZoneSummary,
    #[serde(default)]
    pub visiting_duration: Option<String>,
}

impl ZoneVisit {
    pub fn visiting_seconds(&self) -> Result<u64, DomainError> {
        convert_duration_in_seconds(self.visiting_duration.as_deref())
    }
}

// =============================================================================
// QUERY/FILTER TYPES
// =============================================================================

/// Window and ranking for the metrics endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsQuery {
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub limit: u32,
    pub order: Order,
}

impl MetricsQuery {
    pub fn new(start_at: DateTime<Utc>, end_at: DateTime<Utc>) -> Self {
        Self {
            start_at,
            end_at,
            limit: 10,
            order: Order::Desc,
        }
    }

    /// Query-string pairs in backend spelling
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("start_at", self.start_at.to_rfc3339()),
            ("end_at", self.end_at.to_rfc3339()),
            ("limit", self.limit.to_string()),
            ("order", self.order.as_str().to_string()),
        ]
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Domain-level errors
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Malformed duration: {0:?}")]
    MalformedDuration(String),

    #[error("Invalid coordinates: lat={lat}, lon={lon}")]
    InvalidCoordinates { lat: f64, lon: f64 },
}
