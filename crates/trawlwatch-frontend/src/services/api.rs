//! # API Client
//!
//! Browser REST client for the TrawlWatch backend.

use async_trait::async_trait;
use gloo_net::http::Request;
use serde::de::DeserializeOwned;
use trawlwatch_domain::{
    ExcursionId, MetricsQuery, Port, Vessel, VesselActivity, VesselExcursion,
    VesselExcursionSegment, VesselId, VesselPosition, Zone, ZoneVisit,
};
use trawlwatch_map::api::endpoints;
use trawlwatch_map::{ApiError, ApiResult, TrawlwatchApi};
use web_sys::RequestCache;

use crate::config::FrontendConfig;

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    api_key: String,
    api_key_header: String,
}

impl ApiClient {
    pub fn new(config: &FrontendConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            api_key: config.api_key.clone(),
            api_key_header: config.api_key_header.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        cache: RequestCache,
    ) -> ApiResult<T> {
        let url = endpoints::join(&self.base_url, path);

        let response = Request::get(&url)
            .header(&self.api_key_header, &self.api_key)
            .query(query.iter().map(|(key, value)| (*key, value.as_str())))
            .cache(cache)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !response.ok() {
            return Err(ApiError::Status { status: response.status(), path: path.to_string() });
        }

        response.json::<T>().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.get(path, &[], RequestCache::Default).await
    }
}

#[async_trait(?Send)]
impl TrawlwatchApi for ApiClient {
    async fn vessels(&self) -> ApiResult<Vec<Vessel>> {
        self.fetch(endpoints::VESSELS).await
    }

    async fn latest_positions(&self) -> ApiResult<Vec<VesselPosition>> {
        self.get(endpoints::LATEST_POSITIONS, &[], RequestCache::NoStore).await
    }

    async fn vessel_excursions(&self, vessel_id: VesselId) -> ApiResult<Vec<VesselExcursion>> {
        self.fetch(&endpoints::excursions(vessel_id)).await
    }

    async fn excursion_segments(
        &self,
        vessel_id: VesselId,
        excursion_id: ExcursionId,
    ) -> ApiResult<Vec<VesselExcursionSegment>> {
        self.fetch(&endpoints::segments(vessel_id, excursion_id)).await
    }

    async fn zones(&self) -> ApiResult<Vec<Zone>> {
        self.fetch(endpoints::ZONES).await
    }

    async fn ports(&self) -> ApiResult<Vec<Port>> {
        self.fetch(endpoints::PORTS).await
    }

    async fn vessels_in_activity(&self, query: &MetricsQuery) -> ApiResult<Vec<VesselActivity>> {
        self.get(endpoints::VESSELS_IN_ACTIVITY, &query.params(), RequestCache::Default).await
    }

    async fn zones_visited(&self, query: &MetricsQuery) -> ApiResult<Vec<ZoneVisit>> {
        self.get(endpoints::ZONE_VISITED, &query.params(), RequestCache::Default).await
    }

    async fn vessel_types(&self) -> ApiResult<Vec<String>> {
        self.fetch(endpoints::VESSEL_TYPES).await
    }

    async fn vessel_classes(&self) -> ApiResult<Vec<String>> {
        self.fetch(endpoints::VESSEL_CLASSES).await
    }

    async fn vessel_countries(&self) -> ApiResult<Vec<String>> {
        self.fetch(endpoints::VESSEL_COUNTRIES).await
    }
}
