//! tl-catalog: units catalog for LAMMPS thermo output.
//!
//! Contains:
//! - catalog (unit styles, property categories, lookups)
//! - validate (schema version and consistency checks run at load time)
//!
//! The catalog ships with the crate (`data/units_info.yaml`) and is parsed once
//! per process by [`UnitsCatalog::bundled`]. Callers that keep their own copy
//! load it with [`load_yaml`] or [`UnitsCatalog::from_yaml_str`].

pub mod catalog;
pub mod validate;

use std::path::{Path, PathBuf};

pub use catalog::UnitsCatalog;
pub use validate::{CATALOG_VERSION, ValidationError, validate_catalog};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Errors raised while loading the units catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Catalog validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to read units catalog {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Malformed units catalog: {message}")]
    Yaml { message: String },
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::Yaml {
            message: err.to_string(),
        }
    }
}

/// Read, parse and validate a units catalog file.
pub fn load_yaml(path: &Path) -> CatalogResult<UnitsCatalog> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    UnitsCatalog::from_yaml_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("tl_catalog_does_not_exist.yaml");
        let err = load_yaml(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
        assert!(err.to_string().contains("tl_catalog_does_not_exist"));
    }

    #[test]
    fn yaml_error_display() {
        let err = UnitsCatalog::from_yaml_str("version: [").unwrap_err();
        assert!(matches!(err, CatalogError::Yaml { .. }));
        assert!(err.to_string().starts_with("Malformed units catalog"));
    }
}
