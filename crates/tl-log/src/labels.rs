//! Axis labels with units.

use tl_catalog::UnitsCatalog;

use crate::error::LogResult;
use crate::table::RunTable;

/// Resolves display labels for thermo columns against a units catalog.
#[derive(Debug, Clone, Copy)]
pub struct LabelResolver<'c> {
    catalog: &'c UnitsCatalog,
}

impl<'c> LabelResolver<'c> {
    pub fn new(catalog: &'c UnitsCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &'c UnitsCatalog {
        self.catalog
    }

    /// `"{column} ({unit})"` when the run's unit style defines a unit for the
    /// column's property category, otherwise `column` unchanged.
    ///
    /// The column name is matched case-insensitively; the unit style is not.
    pub fn resolve(&self, run: &RunTable, column: &str) -> String {
        match self.unit(run, column) {
            Some(unit) => format!("{} ({})", column, unit),
            None => column.to_string(),
        }
    }

    /// The unit string alone, if one resolves.
    pub fn unit(&self, run: &RunTable, column: &str) -> Option<&'c str> {
        let unit_system = run.unit_system()?;
        self.catalog.unit_for_property(unit_system, column)
    }
}

impl LabelResolver<'static> {
    /// Resolver over the bundled units catalog.
    pub fn bundled() -> LogResult<Self> {
        Ok(Self::new(UnitsCatalog::bundled()?))
    }
}
