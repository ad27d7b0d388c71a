//! # Metrics Charts
//!
//! Ranked bar charts using Charming (ECharts wrapper), plus the fleet
//! summary panel.

use charming::{
    component::{Axis, Grid, Title},
    element::{AxisLabel, AxisType, ItemStyle, TextStyle, Tooltip, Trigger},
    series::Bar,
    Chart, WasmRenderer,
};
use chrono::{Duration, Utc};
use leptos::prelude::*;
use trawlwatch_domain::DomainError;
use trawlwatch_map::stores::DataDomain;
use trawlwatch_map::MetricsReport;

use crate::services::load_metrics;
use crate::state::use_app_state;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Selectable metrics windows, in days
pub const WINDOWS: [i64; 3] = [7, 30, 90];

/// Labels and hours for one ranked chart, top entry first
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub hours: Vec<f64>,
}

impl BarSeries {
    fn push(&mut self, label: String, seconds: u64) {
        self.labels.push(label);
        #[allow(clippy::cast_precision_loss)]
        self.hours.push((seconds as f64 / SECONDS_PER_HOUR * 10.0).round() / 10.0);
    }
}

/// Time-at-sea and zone-visit bars
///
/// # Errors
///
/// Fails on the first malformed duration in the report.
pub fn metric_bars(report: &MetricsReport) -> Result<(BarSeries, BarSeries), DomainError> {
    let mut vessels = BarSeries::default();
    for activity in &report.vessels {
        vessels.push(activity.vessel.display_name(), activity.time_at_sea_seconds()?);
    }
    let mut zones = BarSeries::default();
    for visit in &report.zones {
        zones.push(visit.zone.name.clone(), visit.visiting_seconds()?);
    }
    Ok((vessels, zones))
}

fn bar_chart(title: &str, series: &BarSeries, color: &str) -> Chart {
    // ECharts draws category axes bottom-up; reverse so rank 1 is on top
    let labels: Vec<String> = series.labels.iter().rev().cloned().collect();
    let hours: Vec<f64> = series.hours.iter().rev().copied().collect();

    Chart::new()
        .title(
            Title::new()
                .text(title)
                .text_style(TextStyle::new().color("#e2e8f0").font_size(12))
                .left("center"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(Grid::new().left("30%").right("8%").top("14%").bottom("8%"))
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("h")
                .axis_label(AxisLabel::new().color("#94a3b8")),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(labels)
                .axis_label(AxisLabel::new().color("#94a3b8")),
        )
        .series(
            Bar::new()
                .name(title)
                .data(hours)
                .item_style(ItemStyle::new().color(color)),
        )
}

/// Ranked metrics for the selected window
#[component]
pub fn MetricsPanel() -> impl IntoView {
    let state = use_app_state();
    let vessels_chart = "vessels-at-sea-chart";
    let zones_chart = "zones-visited-chart";

    // Refetch whenever the window changes
    Effect::new(move |_| {
        load_metrics(state, state.metrics_window_days.get());
    });

    let bars = move || state.session.with(|s| metric_bars(&s.metrics));

    Effect::new(move |_| match bars() {
        Ok((vessels, zones)) => {
            let renderer = WasmRenderer::new(480, 320);
            for (id, chart) in [
                (vessels_chart, bar_chart("TIME AT SEA", &vessels, "#1ee0ab")),
                (zones_chart, bar_chart("ZONE VISITS", &zones, "#75acff")),
            ] {
                if let Err(e) = renderer.render(id, &chart) {
                    log::error!("Chart render error: {e:?}");
                }
            }
        }
        Err(e) => log::error!("metrics rejected: {e}"),
    });

    let error = move || bars().err().map(|e| e.to_string());
    let loading = move || state.session.with(|s| s.loading.is_loading(DataDomain::Metrics));

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"ACTIVITY"</span>
                <div class="flex gap-xs">
                    {WINDOWS.into_iter().map(|days| view! {
                        <button
                            class="btn btn-sm"
                            class:active=move || state.metrics_window_days.get() == days
                            on:click=move |_| state.metrics_window_days.set(days)
                        >{format!("{days}D")}</button>
                    }).collect_view()}
                </div>
                <Show when=loading>
                    <span class="panel-badge">"LOADING"</span>
                </Show>
            </div>
            <div class="panel-body no-padding">
                {move || error().map(|e| view! { <div class="text-warning" style="padding: 16px;">{e}</div> })}
                <div id=vessels_chart class="chart-container"></div>
                <div id=zones_chart class="chart-container"></div>
            </div>
        </div>
    }
}

/// Fleet summary panel
#[component]
pub fn FleetStatsPanel() -> impl IntoView {
    let state = use_app_state();

    let stats = move || {
        state.session.with(|s| {
            let recent = Utc::now() - Duration::hours(1);
            let positions = s.map_view.positions();
            let fresh = positions.iter().filter(|p| p.timestamp >= recent).count();
            let moving = positions.iter().filter(|p| p.speed.is_some_and(|v| v > 1.0)).count();
            (s.vessels.vessels().len(), positions.len(), fresh, moving)
        })
    };

    view! {
        <div class="panel">
            <div class="panel-header">
                <span class="panel-title">"FLEET"</span>
            </div>
            <div class="panel-body">
                <div style="display: grid; grid-template-columns: 1fr 1fr; gap: 16px;">
                    <div>
                        <div class="text-xs text-muted uppercase tracking-wide">"VESSELS"</div>
                        <div class="text-xl font-bold text-accent">{move || stats().0}</div>
                        <div class="text-xs text-muted">"in directory"</div>
                    </div>
                    <div>
                        <div class="text-xs text-muted uppercase tracking-wide">"POSITIONS"</div>
                        <div class="text-xl font-bold">{move || stats().1}</div>
                        <div class="text-xs text-muted">"latest fixes"</div>
                    </div>
                    <div>
                        <div class="text-xs text-muted uppercase tracking-wide">"FRESH"</div>
                        <div class="text-xl font-bold text-accent">{move || stats().2}</div>
                        <div class="text-xs text-muted">"under 1h old"</div>
                    </div>
                    <div>
                        <div class="text-xs text-muted uppercase tracking-wide">"UNDERWAY"</div>
                        <div class="text-xl font-bold">{move || stats().3}</div>
                        <div class="text-xs text-muted">"above 1 kn"</div>
                    </div>
                </div>
            </div>
        </div>
    }
}
