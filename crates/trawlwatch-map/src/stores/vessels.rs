//! Vessel directory and attribute filters.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use trawlwatch_domain::{Vessel, VesselId};

/// Vessel attribute a filter applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Type,
    LengthClass,
    Country,
}

impl FilterDimension {
    pub const ALL: [Self; 3] = [Self::Type, Self::LengthClass, Self::Country];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::LengthClass => "Length class",
            Self::Country => "Country",
        }
    }

    fn value_of<'a>(&self, vessel: &'a Vessel) -> Option<&'a str> {
        match self {
            Self::Type => vessel.vessel_type.as_deref(),
            Self::LengthClass => vessel.length_class.as_deref(),
            Self::Country => vessel.country_iso3.as_deref(),
        }
    }
}

/// Type / class / country selections.
///
/// Values within a dimension are OR'd, dimensions are AND'd, and an empty
/// dimension imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilters {
    pub types: BTreeSet<String>,
    pub classes: BTreeSet<String>,
    pub countries: BTreeSet<String>,
}

impl AttributeFilters {
    pub fn values(&self, dimension: FilterDimension) -> &BTreeSet<String> {
        match dimension {
            FilterDimension::Type => &self.types,
            FilterDimension::LengthClass => &self.classes,
            FilterDimension::Country => &self.countries,
        }
    }

    fn values_mut(&mut self, dimension: FilterDimension) -> &mut BTreeSet<String> {
        match dimension {
            FilterDimension::Type => &mut self.types,
            FilterDimension::LengthClass => &mut self.classes,
            FilterDimension::Country => &mut self.countries,
        }
    }

    pub fn is_empty(&self) -> bool {
        FilterDimension::ALL.iter().all(|d| self.values(*d).is_empty())
    }

    pub fn matches(&self, vessel: &Vessel) -> bool {
        FilterDimension::ALL.iter().all(|dimension| {
            let selected = self.values(*dimension);
            selected.is_empty()
                || dimension
                    .value_of(vessel)
                    .is_some_and(|value| selected.contains(value))
        })
    }
}

/// Every vessel known to the backend plus the active filters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VesselsDirectory {
    vessels: Vec<Vessel>,
    filters: AttributeFilters,
    /// Enumerations served by the backend, keyed by dimension
    options: HashMap<FilterDimension, Vec<String>>,
}

impl VesselsDirectory {
    /// Replace the whole list; filters are kept
    pub fn set_vessels(&mut self, vessels: Vec<Vessel>) {
        self.vessels = vessels;
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    pub fn get(&self, id: VesselId) -> Option<&Vessel> {
        self.vessels.iter().find(|v| v.id == id)
    }

    pub fn filters(&self) -> &AttributeFilters {
        &self.filters
    }

    /// Replace the selection for one dimension
    pub fn set_filter(&mut self, dimension: FilterDimension, values: impl IntoIterator<Item = String>) {
        *self.filters.values_mut(dimension) = values.into_iter().collect();
    }

    /// Add or remove one value from a dimension's selection
    pub fn toggle_filter(&mut self, dimension: FilterDimension, value: &str) {
        let selected = self.filters.values_mut(dimension);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
    }

    pub fn clear_filters(&mut self) {
        self.filters = AttributeFilters::default();
    }

    /// Record the backend's enumeration for a dimension
    pub fn set_options(&mut self, dimension: FilterDimension, values: Vec<String>) {
        self.options.insert(dimension, values);
    }

    /// Choices for a filter dimension.
    ///
    /// The backend enumeration when one was loaded, otherwise the sorted
    /// distinct values present in the directory.
    pub fn available(&self, dimension: FilterDimension) -> Vec<String> {
        if let Some(values) = self.options.get(&dimension).filter(|v| !v.is_empty()) {
            return values.clone();
        }
        self.vessels
            .iter()
            .filter_map(|v| dimension.value_of(v))
            .map(str::to_string)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Case-insensitive match on name, MMSI or IMO
    pub fn search(&self, query: &str) -> Vec<&Vessel> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.vessels
            .iter()
            .filter(|v| {
                v.ship_name
                    .as_deref()
                    .is_some_and(|name| name.to_lowercase().contains(&needle))
                    || v.mmsi.is_some_and(|mmsi| mmsi.to_string().contains(&needle))
                    || v.imo.is_some_and(|imo| imo.to_string().contains(&needle))
            })
            .collect()
    }
}
