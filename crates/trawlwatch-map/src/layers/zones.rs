//! Zone polygons, one layer per displayable category and geometry kind.
//!
//! The layer set is fixed so the renderer can diff by id; category toggles
//! only flip `visible`.

use trawlwatch_domain::{Zone, ZoneCategory, ZoneGeometry};

use super::{PickTarget, PolygonEntry, PolygonLayer, ZoneShape};
use crate::palette::Rgba;
use crate::stores::{DataDomain, LoadingFlags, ZoneVisibility, ZonesStore};

const ZONE_STROKE_WIDTH: f32 = 1.0;

/// Fill and stroke for a category
pub fn zone_colors(category: ZoneCategory) -> (Rgba, Rgba) {
    match category {
        ZoneCategory::Amp => ([34, 139, 34, 60], [34, 139, 34, 200]),
        ZoneCategory::TerritorialSeas => ([30, 144, 255, 40], [30, 144, 255, 180]),
        ZoneCategory::FishingCoastalWaters => ([255, 140, 0, 40], [255, 140, 0, 180]),
        ZoneCategory::Other => ([128, 128, 128, 30], [128, 128, 128, 150]),
    }
}

pub fn zone_layer_id(category: ZoneCategory, shape: ZoneShape) -> String {
    let suffix = match shape {
        ZoneShape::Polygon => "polygon",
        ZoneShape::MultiPolygon => "multipolygon",
    };
    format!("zones-{}-{suffix}", category.as_str().to_lowercase().replace('_', "-"))
}

fn entry(zone: &Zone) -> PolygonEntry {
    let polygons = match &zone.geometry {
        ZoneGeometry::Polygon(rings) => vec![rings.clone()],
        ZoneGeometry::MultiPolygon(polygons) => polygons.clone(),
    };
    PolygonEntry {
        zone_id: zone.id,
        name: zone.name.clone(),
        polygons,
        pick: PickTarget::Zone { zone_id: zone.id },
    }
}

pub fn derive_zone_layers(
    zones: &ZonesStore,
    loading: &LoadingFlags,
    visibility: &ZoneVisibility,
) -> Vec<PolygonLayer> {
    let waiting = zones.is_empty() && loading.is_loading(DataDomain::Zones);

    ZoneCategory::DISPLAYABLE
        .into_iter()
        .flat_map(|category| {
            [ZoneShape::Polygon, ZoneShape::MultiPolygon]
                .into_iter()
                .map(move |shape| (category, shape))
        })
        .map(|(category, shape)| {
            let (fill, stroke) = zone_colors(category);
            let entries = zones
                .zones()
                .iter()
                .filter(|z| z.category == category)
                .filter(|z| z.geometry.is_multi() == (shape == ZoneShape::MultiPolygon))
                .map(entry)
                .collect();
            PolygonLayer {
                id: zone_layer_id(category, shape),
                visible: !waiting && visibility.shows(category),
                pickable: true,
                category,
                shape,
                fill,
                stroke,
                stroke_width: ZONE_STROKE_WIDTH,
                zones: entries,
            }
        })
        .collect()
}
