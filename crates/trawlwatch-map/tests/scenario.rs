//! Fetch a small fleet, track two vessels and check what the map draws.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use fake::faker::company::en::CompanyName;
use fake::Fake;
use trawlwatch_domain::{
    ExcursionId, GeoPoint, MetricsQuery, Port, Vessel, VesselActivity, VesselExcursion,
    VesselExcursionSegment, VesselId, VesselPosition, Zone, ZoneVisit,
};
use trawlwatch_map::palette::color_for_index;
use trawlwatch_map::stores::ModeKind;
use trawlwatch_map::{
    load_reference_data, track_vessel, ApiResult, Layer, MapSession, PickTarget, TrackOutcome,
    TrawlwatchApi,
};

struct Fleet {
    vessels: Vec<Vessel>,
    positions: Vec<VesselPosition>,
}

impl Fleet {
    fn new() -> Self {
        let vessels: Vec<Vessel> = (1..=3)
            .map(|id| Vessel {
                id,
                mmsi: Some(227_100_000 + id),
                imo: None,
                ship_name: Some(CompanyName().fake()),
                length: Some(24.0),
                width: Some(7.0),
                vessel_type: Some("trawler".into()),
                length_class: Some("12-24m".into()),
                country_iso3: Some("FRA".into()),
            })
            .collect();
        let now = Utc::now();
        let positions = vessels
            .iter()
            .map(|vessel| VesselPosition {
                id: vessel.id * 10,
                vessel: vessel.clone(),
                position: GeoPoint::new(-4.0 - vessel.id as f64 * 0.1, 47.5),
                heading: Some(180.0),
                speed: Some(9.5),
                timestamp: now - Duration::minutes(10),
            })
            .collect();
        Self { vessels, positions }
    }
}

#[async_trait(?Send)]
impl TrawlwatchApi for Fleet {
    async fn vessels(&self) -> ApiResult<Vec<Vessel>> {
        Ok(self.vessels.clone())
    }

    async fn latest_positions(&self) -> ApiResult<Vec<VesselPosition>> {
        Ok(self.positions.clone())
    }

    async fn vessel_excursions(&self, _vessel_id: VesselId) -> ApiResult<Vec<VesselExcursion>> {
        Ok(Vec::new())
    }

    async fn excursion_segments(
        &self,
        _vessel_id: VesselId,
        _excursion_id: ExcursionId,
    ) -> ApiResult<Vec<VesselExcursionSegment>> {
        Ok(Vec::new())
    }

    async fn zones(&self) -> ApiResult<Vec<Zone>> {
        Ok(Vec::new())
    }

    async fn ports(&self) -> ApiResult<Vec<Port>> {
        Ok(Vec::new())
    }

    async fn vessels_in_activity(&self, _query: &MetricsQuery) -> ApiResult<Vec<VesselActivity>> {
        Ok(Vec::new())
    }

    async fn zones_visited(&self, _query: &MetricsQuery) -> ApiResult<Vec<ZoneVisit>> {
        Ok(Vec::new())
    }

    async fn vessel_types(&self) -> ApiResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn vessel_classes(&self) -> ApiResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn vessel_countries(&self) -> ApiResult<Vec<String>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_two_tracked_vessels_get_palette_colours() {
    let api = Fleet::new();
    let mut session = MapSession::default();

    tokio_test::block_on(async {
        load_reference_data(&mut session, &api).await;
        assert_eq!(track_vessel(&mut session, &api, 3).await, TrackOutcome::Loaded { excursions: 0 });
        assert_eq!(track_vessel(&mut session, &api, 1).await, TrackOutcome::Loaded { excursions: 0 });
    });
    session.set_mode(ModeKind::Track);

    let layers = session.layers(Utc::now());
    let Some(Layer::Icon(vessels)) = layers.iter().find(|l| l.id() == "vessels") else {
        panic!("vessels layer missing");
    };

    assert_eq!(vessels.icons.len(), 2);
    for icon in &vessels.icons {
        let PickTarget::Position { vessel_id } = icon.pick else {
            panic!("vessel icon picks a position");
        };
        let index = session.track.tracked_vessel_ids().iter().position(|id| *id == vessel_id).unwrap();
        assert_eq!(icon.color, color_for_index(index));
    }
    let by_vessel = |id| vessels.icons.iter().find(|i| i.pick == PickTarget::Position { vessel_id: id });
    assert_eq!(by_vessel(3).map(|i| i.color), Some(color_for_index(0)));
    assert_eq!(by_vessel(1).map(|i| i.color), Some(color_for_index(1)));
}

#[test]
fn test_position_mode_shows_whole_fleet() {
    let api = Fleet::new();
    let mut session = MapSession::default();
    tokio_test::block_on(load_reference_data(&mut session, &api));

    let layers = session.layers(Utc::now());
    let Some(Layer::Icon(vessels)) = layers.iter().find(|l| l.id() == "vessels") else {
        panic!("vessels layer missing");
    };
    assert_eq!(vessels.icons.len(), 3);
    assert!(layers.iter().any(|l| l.id() == "tracks" && !l.visible()));
}
