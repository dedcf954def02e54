//! Catalog validation logic.

use std::collections::HashSet;

use crate::catalog::UnitsCatalog;

/// Schema version understood by this crate.
pub const CATALOG_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_catalog(catalog: &UnitsCatalog) -> Result<(), ValidationError> {
    if catalog.version() == 0 || catalog.version() > CATALOG_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: catalog.version(),
        });
    }

    let mut known_categories = HashSet::new();
    for (style, units) in catalog.unit_system_entries() {
        if style.trim().is_empty() || style.trim() != style {
            return Err(ValidationError::InvalidValue {
                field: "unit_styles".to_string(),
                value: format!("'{}'", style),
                reason: "unit style names must be non-empty without surrounding whitespace"
                    .to_string(),
            });
        }
        for (category, unit) in units {
            if unit.trim().is_empty() {
                return Err(ValidationError::InvalidValue {
                    field: format!("unit_styles.{}.{}", style, category),
                    value: format!("'{}'", unit),
                    reason: "unit strings must not be empty".to_string(),
                });
            }
            known_categories.insert(category.as_str());
        }
    }

    for (property, category) in catalog.property_entries() {
        if property.is_empty() || *property != property.to_lowercase() {
            return Err(ValidationError::InvalidValue {
                field: "prop_types".to_string(),
                value: property.clone(),
                reason: "property names must be non-empty and lower case".to_string(),
            });
        }
        if !known_categories.contains(category.as_str()) {
            return Err(ValidationError::MissingReference {
                id: category.clone(),
                context: format!("prop_types.{}", property),
            });
        }
    }

    Ok(())
}
