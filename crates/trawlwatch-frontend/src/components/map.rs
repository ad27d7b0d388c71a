//! # Map Component
//!
//! Leaflet map drawing the session's derived layers.
//!
//! All drawn items live in one feature group that is cleared and refilled
//! whenever the session changes. Each item carries the index of its
//! [`PickTarget`] in the last render, so the group's pointer events map
//! straight back to [`MapEvent`]s.

use chrono::Utc;
use js_sys::{Array, Function, Object, Reflect};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use trawlwatch_map::layers::{IconEntry, IconKind, LineEntry, PolygonLayer};
use trawlwatch_map::palette::{opacity, to_hex};
use trawlwatch_map::stores::ViewState;
use trawlwatch_map::{Layer, MapEvent, PickTarget};

use crate::state::{use_app_state, AppState};

const MAP_ID: &str = "trawlwatch-map";
const PICK_KEY: &str = "pickIndex";

/// Leaflet bindings
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = L)]
    #[derive(Clone)]
    type Map;

    #[wasm_bindgen(js_namespace = L, js_name = map)]
    fn create_map(id: &str, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = setView)]
    fn set_view(this: &Map, lat_lng: &JsValue, zoom: f64) -> Map;

    #[wasm_bindgen(method, js_name = flyTo)]
    fn fly_to(this: &Map, lat_lng: &JsValue, zoom: f64, options: &JsValue) -> Map;

    #[wasm_bindgen(method, js_name = getCenter)]
    fn get_center(this: &Map) -> LatLng;

    #[wasm_bindgen(method, js_name = getZoom)]
    fn get_zoom(this: &Map) -> f64;

    #[wasm_bindgen(method, js_name = on)]
    fn map_on(this: &Map, event: &str, handler: &Function);

    #[wasm_bindgen(js_namespace = L)]
    type LatLng;

    #[wasm_bindgen(method, getter)]
    fn lat(this: &LatLng) -> f64;

    #[wasm_bindgen(method, getter)]
    fn lng(this: &LatLng) -> f64;

    #[wasm_bindgen(js_namespace = L, js_name = tileLayer)]
    fn tile_layer(url: &str, options: &JsValue) -> TileLayer;

    #[wasm_bindgen]
    type TileLayer;

    #[wasm_bindgen(method, js_name = addTo)]
    fn add_to(this: &TileLayer, map: &Map);

    #[wasm_bindgen(js_namespace = L)]
    type FeatureGroup;

    #[wasm_bindgen(js_namespace = L, js_name = featureGroup)]
    fn feature_group() -> FeatureGroup;

    #[wasm_bindgen(method, js_name = addTo)]
    fn group_add_to(this: &FeatureGroup, map: &Map);

    #[wasm_bindgen(method, js_name = addLayer)]
    fn add_layer(this: &FeatureGroup, layer: &JsValue);

    #[wasm_bindgen(method, js_name = clearLayers)]
    fn clear_layers(this: &FeatureGroup);

    #[wasm_bindgen(method, js_name = on)]
    fn group_on(this: &FeatureGroup, event: &str, handler: &Function);

    #[wasm_bindgen(js_namespace = L, js_name = circleMarker)]
    fn circle_marker(lat_lng: &JsValue, options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = marker)]
    fn marker(lat_lng: &JsValue, options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = divIcon)]
    fn div_icon(options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = polyline)]
    fn polyline(lat_lngs: &JsValue, options: &JsValue) -> JsValue;

    #[wasm_bindgen(js_namespace = L, js_name = polygon)]
    fn polygon(lat_lngs: &JsValue, options: &JsValue) -> JsValue;
}

/// Plain JS object from key/value pairs
fn js_object(entries: &[(&str, JsValue)]) -> JsValue {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object.into()
}

/// Leaflet wants `[lat, lng]`; layers carry `[lng, lat]`
fn lat_lng(point: [f64; 2]) -> JsValue {
    Array::of2(&point[1].into(), &point[0].into()).into()
}

fn ring(points: &[[f64; 2]]) -> Array {
    points.iter().map(|p| lat_lng(*p)).collect()
}

/// Arrow glyph pointing north, rotated clockwise by CSS
fn arrow_html(color: &str, size: f32, angle: f32) -> String {
    format!(
        r#"<svg width="{size}" height="{size}" viewBox="0 0 24 24" style="transform: rotate({rot}deg)"><path d="M12 2 L20 21 L12 16 L4 21 Z" fill="{color}"/></svg>"#,
        rot = -angle,
    )
}

fn icon_layer(icon: &IconEntry, pick: usize) -> JsValue {
    let color = to_hex(icon.color);
    let alpha = f64::from(opacity(icon.color));
    let at = lat_lng(icon.position);

    match icon.icon {
        IconKind::Ellipse => circle_marker(
            &at,
            &js_object(&[
                ("radius", f64::from(icon.size / 2.0).into()),
                ("color", color.as_str().into()),
                ("fillColor", color.as_str().into()),
                ("fillOpacity", alpha.into()),
                ("opacity", alpha.into()),
                ("weight", 1.into()),
                (PICK_KEY, pick.into()),
            ]),
        ),
        IconKind::Arrow | IconKind::Anchor => {
            let html = match icon.icon {
                IconKind::Anchor => format!(
                    r#"<span class="port-icon" style="color: {color}; font-size: {}px">⚓</span>"#,
                    icon.size
                ),
                _ => arrow_html(&color, icon.size, icon.angle),
            };
            let half = f64::from(icon.size / 2.0);
            let glyph = div_icon(&js_object(&[
                ("html", html.into()),
                ("className", "map-glyph".into()),
                ("iconSize", Array::of2(&icon.size.into(), &icon.size.into()).into()),
                ("iconAnchor", Array::of2(&half.into(), &half.into()).into()),
            ]));
            marker(
                &at,
                &js_object(&[("icon", glyph), ("opacity", alpha.into()), (PICK_KEY, pick.into())]),
            )
        }
    }
}

fn line_layer(line: &LineEntry, pick: usize) -> JsValue {
    let points: Array = [line.source, line.target].into_iter().map(lat_lng).collect();
    let dash = line
        .dash
        .map_or(JsValue::NULL, |[dash, gap]| format!("{dash} {gap}").into());
    polyline(
        &points.into(),
        &js_object(&[
            ("color", to_hex(line.color).into()),
            ("opacity", f64::from(opacity(line.color)).into()),
            ("weight", f64::from(line.width).into()),
            ("dashArray", dash),
            (PICK_KEY, pick.into()),
        ]),
    )
}

fn zone_layers(layer: &PolygonLayer, picks: &mut Vec<PickTarget>, group: &FeatureGroup) {
    for zone in &layer.zones {
        let polygons: Array = zone
            .polygons
            .iter()
            .map(|rings| rings.iter().map(|r| ring(r)).collect::<Array>())
            .collect();
        let options = js_object(&[
            ("color", to_hex(layer.stroke).into()),
            ("opacity", f64::from(opacity(layer.stroke)).into()),
            ("weight", f64::from(layer.stroke_width).into()),
            ("fillColor", to_hex(layer.fill).into()),
            ("fillOpacity", f64::from(opacity(layer.fill)).into()),
            ("interactive", layer.pickable.into()),
            (PICK_KEY, picks.len().into()),
        ]);
        picks.push(zone.pick);
        group.add_layer(&polygon(&polygons.into(), &options));
    }
}

/// Redraw every visible layer; returns the pick table for this render
fn draw(group: &FeatureGroup, layers: &[Layer]) -> Vec<PickTarget> {
    group.clear_layers();
    let mut picks = Vec::new();

    for layer in layers.iter().filter(|l| l.visible()) {
        match layer {
            Layer::Polygon(zones) => zone_layers(zones, &mut picks, group),
            Layer::Line(lines) => {
                for line in &lines.lines {
                    group.add_layer(&line_layer(line, picks.len()));
                    picks.push(line.pick);
                }
            }
            Layer::Icon(icons) => {
                for icon in &icons.icons {
                    group.add_layer(&icon_layer(icon, picks.len()));
                    picks.push(icon.pick);
                }
            }
        }
    }
    picks
}

/// Pick target of the layer a Leaflet event came from
fn event_pick(event: &JsValue, picks: StoredValue<Vec<PickTarget>>) -> Option<PickTarget> {
    let source = Reflect::get(event, &"propagatedFrom".into())
        .ok()
        .filter(|v| !v.is_undefined())
        .or_else(|| Reflect::get(event, &"layer".into()).ok())?;
    let options = Reflect::get(&source, &"options".into()).ok()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = Reflect::get(&options, &PICK_KEY.into()).ok()?.as_f64()? as usize;
    picks.with_value(|p| p.get(index).copied())
}

fn view_of(map: &Map, current: &ViewState) -> ViewState {
    let center = map.get_center();
    ViewState {
        longitude: center.lng(),
        latitude: center.lat(),
        zoom: map.get_zoom(),
        transition: None,
        ..*current
    }
}

struct Leaflet {
    map: Map,
    group: FeatureGroup,
}

/// Create the map and wire its pointer and camera events into the session
fn mount(state: AppState, picks: StoredValue<Vec<PickTarget>>, flying: StoredValue<bool>) -> Option<Leaflet> {
    let window = web_sys::window()?;
    if Reflect::get(&window, &"L".into()).map_or(true, |l| l.is_undefined()) {
        log::warn!("Leaflet not loaded, map will not render");
        return None;
    }

    let initial = state.session.with_untracked(|s| *s.map_view.view_state());
    let map = create_map(MAP_ID, &js_object(&[("zoomControl", false.into())]));
    map.set_view(&lat_lng([initial.longitude, initial.latitude]), initial.zoom);

    let tiles = tile_layer(
        "https://{s}.basemaps.cartocdn.com/dark_all/{z}/{x}/{y}{r}.png",
        &js_object(&[
            ("maxZoom", 19.into()),
            ("attribution", "© OpenStreetMap © CARTO".into()),
        ]),
    );
    tiles.add_to(&map);

    let group = feature_group();
    group.group_add_to(&map);

    let on_click = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        if let Some(target) = event_pick(&event, picks) {
            state.dispatch(MapEvent::Click(target));
        }
    });
    group.group_on("click", on_click.as_ref().unchecked_ref());
    on_click.forget();

    let on_over = Closure::<dyn Fn(JsValue)>::new(move |event: JsValue| {
        state.hover(MapEvent::Hover(event_pick(&event, picks)));
    });
    group.group_on("mouseover", on_over.as_ref().unchecked_ref());
    on_over.forget();

    let on_out = Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| {
        state.hover(MapEvent::Hover(None));
    });
    group.group_on("mouseout", on_out.as_ref().unchecked_ref());
    on_out.forget();

    let moved = map.clone();
    let on_move = Closure::<dyn Fn(JsValue)>::new(move |_: JsValue| {
        let user_initiated = !flying.get_value();
        flying.set_value(false);
        let current = state.session.with_untracked(|s| *s.map_view.view_state());
        let view_state = view_of(&moved, &current);
        if view_state != current {
            state.dispatch(MapEvent::ViewStateChanged { view_state, user_initiated });
        }
    });
    map.map_on("moveend", on_move.as_ref().unchecked_ref());
    on_move.forget();

    log::info!("map mounted at zoom {}", initial.zoom);
    Some(Leaflet { map, group })
}

/// Vessel map panel
#[component]
pub fn MapPanel() -> impl IntoView {
    let state = use_app_state();
    let leaflet = StoredValue::new_local(None::<Leaflet>);
    let picks = StoredValue::new(Vec::<PickTarget>::new());
    let flying = StoredValue::new(false);

    // Redraw on every session change, mounting the map first if needed
    Effect::new(move |_| {
        let layers = state.session.with(|s| s.layers(Utc::now()));
        if leaflet.with_value(Option::is_none) {
            leaflet.set_value(mount(state, picks, flying));
        }
        leaflet.with_value(|l| {
            if let Some(l) = l {
                picks.set_value(draw(&l.group, &layers));
            }
        });
    });

    // Animate queued camera moves
    Effect::new(move |_| {
        let Some(view) = state.camera.get() else {
            return;
        };
        leaflet.with_value(|l| {
            if let Some(l) = l {
                let seconds = view.transition.map_or(0.0, |t| f64::from(t.duration_ms) / 1000.0);
                flying.set_value(true);
                l.map.fly_to(
                    &lat_lng([view.longitude, view.latitude]),
                    view.zoom,
                    &js_object(&[("duration", seconds.into())]),
                );
            }
        });
    });

    let tooltip = move || state.tooltip.get();
    let readout = move || {
        state.session.with(|s| {
            let v = s.map_view.view_state();
            format!("{:.4}°N {:.4}°E  z{:.1}", v.latitude, v.longitude, v.zoom)
        })
    };
    let focused = move || state.session.with(|s| s.track.focused_excursion_id());

    view! {
        <div class="map-container">
            <div id=MAP_ID style="width: 100%; height: 100%; min-height: 400px;"></div>

            <div class="map-overlay">
                {move || tooltip().map(|text| view! {
                    <div class="map-control map-tooltip">{text}</div>
                })}
            </div>

            <div style="position: absolute; bottom: 16px; right: 16px; z-index: 1000;">
                <div class="map-control" style="font-size: 0.7rem;">
                    {readout}
                    {move || focused().map(|_| view! {
                        " "
                        <button class="btn btn-sm" on:click=move |_| {
                            let view = state.session.try_update(|s| s.recenter_focused()).flatten();
                            state.fly_to(view);
                        }>"RECENTER"</button>
                    })}
                </div>
            </div>
        </div>
    }
}
