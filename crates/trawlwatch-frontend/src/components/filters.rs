//! # Filters Panel
//!
//! Vessel attribute filters and zone category toggles.

use leptos::prelude::*;
use trawlwatch_domain::ZoneCategory;
use trawlwatch_map::layers::zones::zone_colors;
use trawlwatch_map::palette::to_hex;
use trawlwatch_map::stores::FilterDimension;

use crate::state::use_app_state;

#[component]
fn FilterGroup(dimension: FilterDimension) -> impl IntoView {
    let state = use_app_state();

    let options = move || {
        state.session.with(|s| {
            let selected = s.vessels.filters().values(dimension);
            s.vessels
                .available(dimension)
                .into_iter()
                .map(|value| {
                    let on = selected.contains(&value);
                    (value, on)
                })
                .collect::<Vec<_>>()
        })
    };

    view! {
        <div class="filter-group">
            <div class="text-xs text-muted uppercase tracking-wide">{dimension.label()}</div>
            <div class="chips">
                {move || options().into_iter().map(|(value, on)| {
                    let toggled = value.clone();
                    view! {
                        <button
                            class="chip"
                            class:active=on
                            on:click=move |_| state.session.update(|s| s.vessels.toggle_filter(dimension, &toggled))
                        >{value}</button>
                    }
                }).collect_view()}
            </div>
        </div>
    }
}

#[component]
fn ZoneToggle(category: ZoneCategory) -> impl IntoView {
    let state = use_app_state();
    let (fill, _) = zone_colors(category);
    let shown = move || state.session.with(|s| s.map_view.is_zone_category_displayed(category));

    view! {
        <label class="zone-toggle">
            <input
                type="checkbox"
                prop:checked=shown
                on:change=move |_| state.session.update(|s| s.map_view.toggle_zone_category(category))
            />
            <span class="swatch" style=format!("background: {};", to_hex(fill))></span>
            {category.label()}
        </label>
    }
}

#[component]
pub fn FiltersPanel() -> impl IntoView {
    let state = use_app_state();
    let active = move || state.session.with(|s| !s.vessels.filters().is_empty());

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"FILTERS"</span>
                <Show when=active>
                    <button class="btn btn-sm" on:click=move |_| state.session.update(|s| s.vessels.clear_filters())>
                        "RESET"
                    </button>
                </Show>
            </div>
            <div class="panel-body" style="display: flex; flex-direction: column; gap: 12px;">
                {FilterDimension::ALL.into_iter().map(|dimension| view! { <FilterGroup dimension=dimension /> }).collect_view()}
                <div class="filter-group">
                    <div class="text-xs text-muted uppercase tracking-wide">"ZONES"</div>
                    {ZoneCategory::DISPLAYABLE.into_iter().map(|category| view! { <ZoneToggle category=category /> }).collect_view()}
                    <div class="text-xs text-muted">"No category checked draws every zone"</div>
                </div>
            </div>
        </div>
    }
}
