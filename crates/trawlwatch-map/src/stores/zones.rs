//! Marine zones, fetched once per map session.

use std::collections::BTreeSet;
use trawlwatch_domain::{Zone, ZoneCategory, ZoneId};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZonesStore {
    zones: Vec<Zone>,
}

impl ZonesStore {
    pub fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn get(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.iter().find(|z| z.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Which zone categories a zones layer should draw
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneVisibility {
    /// Unfiltered contexts draw everything
    All,
    /// Categories in the set are drawn; an empty set draws everything
    Categories(BTreeSet<ZoneCategory>),
}

impl ZoneVisibility {
    pub fn shows(&self, category: ZoneCategory) -> bool {
        match self {
            Self::All => true,
            Self::Categories(set) => set.is_empty() || set.contains(&category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_set_shows_everything() {
        let visibility = ZoneVisibility::Categories(BTreeSet::new());
        for category in ZoneCategory::DISPLAYABLE {
            assert!(visibility.shows(category));
        }
    }

    #[test]
    fn test_set_membership() {
        let visibility = ZoneVisibility::Categories(BTreeSet::from([ZoneCategory::Amp]));
        assert!(visibility.shows(ZoneCategory::Amp));
        assert!(!visibility.shows(ZoneCategory::TerritorialSeas));
        assert!(ZoneVisibility::All.shows(ZoneCategory::FishingCoastalWaters));
    }
}
