//! # Backend Data Source
//!
//! Read-only view of the TrawlWatch REST service. The browser dashboard
//! implements it with `gloo-net`, the CLI with `reqwest`, tests with an
//! in-memory fake.

use async_trait::async_trait;
use trawlwatch_domain::{
    ExcursionId, MetricsQuery, Port, Vessel, VesselActivity, VesselExcursion,
    VesselExcursionSegment, VesselId, VesselPosition, Zone, ZoneVisit,
};

use crate::error::ApiResult;

/// Header carrying the static API key
pub const DEFAULT_API_KEY_HEADER: &str = "x-key";

/// Endpoint paths relative to the API base URL
pub mod endpoints {
    use trawlwatch_domain::{ExcursionId, VesselId};

    pub const VESSELS: &str = "/vessels";
    pub const LATEST_POSITIONS: &str = "/vessels/all/positions/last";
    pub const VESSEL_TYPES: &str = "/vessels/types";
    pub const VESSEL_CLASSES: &str = "/vessels/classes";
    pub const VESSEL_COUNTRIES: &str = "/vessels/countries";
    pub const ZONES: &str = "/zones";
    pub const PORTS: &str = "/ports";
    pub const VESSELS_IN_ACTIVITY: &str = "/metrics/vessels-in-activity";
    pub const ZONE_VISITED: &str = "/metrics/zone-visited";

    pub fn excursions(vessel_id: VesselId) -> String {
        format!("/vessels/{vessel_id}/excursions")
    }

    pub fn segments(vessel_id: VesselId, excursion_id: ExcursionId) -> String {
        format!("/vessels/{vessel_id}/excursions/{excursion_id}/segments")
    }

    /// Join a base URL and a path without doubling slashes
    pub fn join(base: &str, path: &str) -> String {
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

/// TrawlWatch REST API
///
/// `?Send` because the browser client runs on a single-threaded executor.
#[async_trait(?Send)]
pub trait TrawlwatchApi {
    /// `GET /vessels`
    async fn vessels(&self) -> ApiResult<Vec<Vessel>>;

    /// `GET /vessels/all/positions/last`, never cached
    async fn latest_positions(&self) -> ApiResult<Vec<VesselPosition>>;

    /// `GET /vessels/{id}/excursions`
    async fn vessel_excursions(&self, vessel_id: VesselId) -> ApiResult<Vec<VesselExcursion>>;

    /// `GET /vessels/{id}/excursions/{excursion_id}/segments`
    async fn excursion_segments(
        &self,
        vessel_id: VesselId,
        excursion_id: ExcursionId,
    ) -> ApiResult<Vec<VesselExcursionSegment>>;

    /// `GET /zones`
    async fn zones(&self) -> ApiResult<Vec<Zone>>;

    /// `GET /ports`
    async fn ports(&self) -> ApiResult<Vec<Port>>;

    /// `GET /metrics/vessels-in-activity`
    async fn vessels_in_activity(&self, query: &MetricsQuery) -> ApiResult<Vec<VesselActivity>>;

    /// `GET /metrics/zone-visited`
    async fn zones_visited(&self, query: &MetricsQuery) -> ApiResult<Vec<ZoneVisit>>;

    /// `GET /vessels/types`
    async fn vessel_types(&self) -> ApiResult<Vec<String>>;

    /// `GET /vessels/classes`
    async fn vessel_classes(&self) -> ApiResult<Vec<String>>;

    /// `GET /vessels/countries`
    async fn vessel_countries(&self) -> ApiResult<Vec<String>>;
}
