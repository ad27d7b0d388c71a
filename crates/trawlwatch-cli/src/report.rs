//! Plain-text and JSON summaries printed by the CLI.

use serde::Serialize;
use trawlwatch_domain::{format_duration, DomainError, ExcursionMetrics};
use trawlwatch_map::{Layer, MetricsReport};

/// One line per derived layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayerSummary {
    pub id: String,
    pub kind: &'static str,
    pub visible: bool,
    pub items: usize,
}

pub fn summarize_layers(layers: &[Layer]) -> Vec<LayerSummary> {
    layers
        .iter()
        .map(|layer| {
            let (kind, items) = match layer {
                Layer::Icon(l) => ("icon", l.icons.len()),
                Layer::Line(l) => ("line", l.lines.len()),
                Layer::Polygon(l) => ("polygon", l.zones.len()),
            };
            LayerSummary { id: layer.id().to_string(), kind, visible: layer.visible(), items }
        })
        .collect()
}

pub fn totals_lines(metrics: &ExcursionMetrics) -> Vec<(&'static str, String)> {
    vec![
        ("at sea", format_duration(metrics.time_at_sea)),
        ("fishing", format_duration(metrics.time_fishing)),
        ("in AMP", format_duration(metrics.time_in_amp)),
        ("territorial waters", format_duration(metrics.time_in_territorial_waters)),
        ("no fishing rights", format_duration(metrics.time_in_zones_with_no_fishing_rights)),
        ("default AIS", format_duration(metrics.time_default_ais)),
    ]
}

/// Ranked rows `(label, duration)` for both metrics tables
///
/// # Errors
///
/// Fails on the first malformed duration from the backend.
pub fn metrics_rows(
    report: &MetricsReport,
) -> Result<(Vec<(String, String)>, Vec<(String, String)>), DomainError> {
    let vessels = report
        .vessels
        .iter()
        .map(|a| Ok((a.vessel.display_name(), format_duration(a.time_at_sea_seconds()?))))
        .collect::<Result<Vec<_>, DomainError>>()?;
    let zones = report
        .zones
        .iter()
        .map(|v| Ok((v.zone.name.clone(), format_duration(v.visiting_seconds()?))))
        .collect::<Result<Vec<_>, DomainError>>()?;
    Ok((vessels, zones))
}

#[cfg(test)]
mod tests {
    use super::*;
    use trawlwatch_domain::{ZoneCategory, ZoneSummary, ZoneVisit};

    #[test]
    fn test_summarize_empty_session() {
        let session = trawlwatch_map::MapSession::default();
        let summary = summarize_layers(&session.layers(chrono::Utc::now()));
        let vessels = summary.last().unwrap();
        assert_eq!(vessels.id, "vessels");
        assert_eq!(vessels.kind, "icon");
        assert_eq!(vessels.items, 0);
        assert!(summary.iter().any(|s| s.kind == "polygon"));
    }

    #[test]
    fn test_metrics_rows_fail_fast() {
        let mut report = MetricsReport::default();
        report.zones.push(ZoneVisit {
            zone: ZoneSummary {
                id: 1,
                name: "Iroise".into(),
                category: ZoneCategory::Amp,
                sub_category: None,
            },
            visiting_duration: Some("PT2H".into()),
        });
        let (_, zones) = metrics_rows(&report).unwrap();
        assert_eq!(zones, vec![("Iroise".to_string(), "2h 00m".to_string())]);

        report.zones[0].visiting_duration = Some("2 hours".into());
        assert!(metrics_rows(&report).is_err());
    }
}
