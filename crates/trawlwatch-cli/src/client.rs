//! REST client for the TrawlWatch backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;
use trawlwatch_domain::{
    ExcursionId, MetricsQuery, Port, Vessel, VesselActivity, VesselExcursion,
    VesselExcursionSegment, VesselId, VesselPosition, Zone, ZoneVisit,
};
use trawlwatch_map::api::endpoints;
use trawlwatch_map::{ApiError, ApiResult, TrawlwatchApi};

use crate::config::Config;

#[derive(Debug, Clone)]
pub struct RestClient {
    http: Client,
    base_url: String,
    api_key: String,
    api_key_header: String,
}

impl RestClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: Client::new(),
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        endpoints::join(&self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> ApiResult<T> {
        let url = self.url(path);
        debug!(%url, "GET");

        let response = self
            .http
            .get(&url)
            .header(self.api_key_header.as_str(), self.api_key.as_str())
            .query(query)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), path: path.to_string() });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait(?Send)]
impl TrawlwatchApi for RestClient {
    async fn vessels(&self) -> ApiResult<Vec<Vessel>> {
        self.get(endpoints::VESSELS, &[]).await
    }

    async fn latest_positions(&self) -> ApiResult<Vec<VesselPosition>> {
        self.get(endpoints::LATEST_POSITIONS, &[]).await
    }

    async fn vessel_excursions(&self, vessel_id: VesselId) -> ApiResult<Vec<VesselExcursion>> {
        self.get(&endpoints::excursions(vessel_id), &[]).await
    }

    async fn excursion_segments(
        &self,
        vessel_id: VesselId,
        excursion_id: ExcursionId,
    ) -> ApiResult<Vec<VesselExcursionSegment>> {
        self.get(&endpoints::segments(vessel_id, excursion_id), &[]).await
    }

    async fn zones(&self) -> ApiResult<Vec<Zone>> {
        self.get(endpoints::ZONES, &[]).await
    }

    async fn ports(&self) -> ApiResult<Vec<Port>> {
        self.get(endpoints::PORTS, &[]).await
    }

    async fn vessels_in_activity(&self, query: &MetricsQuery) -> ApiResult<Vec<VesselActivity>> {
        self.get(endpoints::VESSELS_IN_ACTIVITY, &query.params()).await
    }

    async fn zones_visited(&self, query: &MetricsQuery) -> ApiResult<Vec<ZoneVisit>> {
        self.get(endpoints::ZONE_VISITED, &query.params()).await
    }

    async fn vessel_types(&self) -> ApiResult<Vec<String>> {
        self.get(endpoints::VESSEL_TYPES, &[]).await
    }

    async fn vessel_classes(&self) -> ApiResult<Vec<String>> {
        self.get(endpoints::VESSEL_CLASSES, &[]).await
    }

    async fn vessel_countries(&self) -> ApiResult<Vec<String>> {
        self.get(endpoints::VESSEL_COUNTRIES, &[]).await
    }
}
