//! Unit styles and property categories.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::validate::{CATALOG_VERSION, validate_catalog};
use crate::CatalogResult;

const BUNDLED_CATALOG: &str = include_str!("../data/units_info.yaml");

static BUNDLED: OnceLock<CatalogResult<UnitsCatalog>> = OnceLock::new();

/// Category name -> unit string for one unit style.
pub type UnitMap = BTreeMap<String, String>;

/// Read-only mapping from unit styles and thermo properties to unit strings.
///
/// `unit_styles` maps a unit style (`metal`, `si`, ...) to the unit of each
/// property category it defines. `prop_types` maps a lower-cased thermo
/// keyword (`press`, `pxy`, `temp`, ...) to its category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnitsCatalog {
    version: u32,
    #[serde(rename = "unit_styles")]
    unit_systems: BTreeMap<String, UnitMap>,
    #[serde(rename = "prop_types")]
    property_categories: BTreeMap<String, String>,
}

impl UnitsCatalog {
    /// Catalog with no unit styles; every label lookup misses.
    pub fn empty() -> Self {
        Self {
            version: CATALOG_VERSION,
            unit_systems: BTreeMap::new(),
            property_categories: BTreeMap::new(),
        }
    }

    /// Parse and validate a catalog document.
    pub fn from_yaml_str(content: &str) -> CatalogResult<Self> {
        let catalog: UnitsCatalog = serde_yaml::from_str(content)?;
        validate_catalog(&catalog)?;
        tracing::debug!(
            version = catalog.version,
            unit_styles = catalog.unit_systems.len(),
            properties = catalog.property_categories.len(),
            "loaded units catalog"
        );
        Ok(catalog)
    }

    /// The catalog bundled with this crate, parsed on first use.
    pub fn bundled() -> CatalogResult<&'static UnitsCatalog> {
        BUNDLED
            .get_or_init(|| Self::from_yaml_str(BUNDLED_CATALOG))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    /// Unit style names in sorted order.
    pub fn unit_systems(&self) -> impl Iterator<Item = &str> {
        self.unit_systems.keys().map(String::as_str)
    }

    pub fn has_unit_system(&self, unit_system: &str) -> bool {
        self.unit_systems.contains_key(unit_system)
    }

    pub fn unit_map(&self, unit_system: &str) -> Option<&UnitMap> {
        self.unit_systems.get(unit_system)
    }

    /// Property category for a thermo keyword, ignoring case.
    pub fn category_of(&self, property: &str) -> Option<&str> {
        self.property_categories
            .get(&property.to_lowercase())
            .map(String::as_str)
    }

    /// Unit of `category` in `unit_system`. The unit style name is case-sensitive.
    pub fn unit_for(&self, unit_system: &str, category: &str) -> Option<&str> {
        self.unit_systems
            .get(unit_system)?
            .get(category)
            .map(String::as_str)
    }

    /// Unit of a thermo keyword in `unit_system`, if both lookups succeed.
    pub fn unit_for_property(&self, unit_system: &str, property: &str) -> Option<&str> {
        let category = self.category_of(property)?;
        self.unit_for(unit_system, category)
    }

    pub(crate) fn unit_system_entries(&self) -> &BTreeMap<String, UnitMap> {
        &self.unit_systems
    }

    pub(crate) fn property_entries(&self) -> &BTreeMap<String, String> {
        &self.property_categories
    }
}

#[cfg(test)]
pub(crate) fn catalog_from_parts(
    version: u32,
    unit_systems: &[(&str, &[(&str, &str)])],
    properties: &[(&str, &str)],
) -> UnitsCatalog {
    UnitsCatalog {
        version,
        unit_systems: unit_systems
            .iter()
            .map(|(name, units)| {
                let units = units
                    .iter()
                    .map(|(c, u)| (c.to_string(), u.to_string()))
                    .collect();
                (name.to_string(), units)
            })
            .collect(),
        property_categories: properties
            .iter()
            .map(|(p, c)| (p.to_string(), c.to_string()))
            .collect(),
    }
}
