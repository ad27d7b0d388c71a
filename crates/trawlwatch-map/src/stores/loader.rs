//! In-flight request flags per data domain.

use serde::Serialize;
use std::collections::BTreeMap;

/// Backend data families the map waits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataDomain {
    Vessels,
    Positions,
    Excursions,
    Zones,
    Ports,
    Metrics,
}

/// Counts outstanding fetches so overlapping requests keep the flag raised
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadingFlags {
    in_flight: BTreeMap<DataDomain, u32>,
}

impl LoadingFlags {
    pub fn begin(&mut self, domain: DataDomain) {
        *self.in_flight.entry(domain).or_default() += 1;
    }

    pub fn finish(&mut self, domain: DataDomain) {
        if let Some(count) = self.in_flight.get_mut(&domain) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&domain);
            }
        }
    }

    pub fn is_loading(&self, domain: DataDomain) -> bool {
        self.in_flight.contains_key(&domain)
    }

    pub fn any(&self) -> bool {
        !self.in_flight.is_empty()
    }

    /// Domains with at least one outstanding fetch
    pub fn loading(&self) -> Vec<DataDomain> {
        self.in_flight.keys().copied().collect()
    }
}
