//! Typed thermo tables built from scanned blocks.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{LogError, LogResult};
use crate::notice::ParseNotice;
use crate::scanner::RawBlockMatch;

pub const STEP_COLUMN: &str = "Step";
pub const TIME_COLUMN: &str = "Time";

/// Kind of LAMMPS run a thermo table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunKind {
    /// A timestep was declared (`run` command).
    Dynamics,
    /// No timestep attached (`minimize` command, or a log file).
    Minimization,
    Unknown,
}

impl fmt::Display for RunKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamics => write!(f, "Dynamics"),
            Self::Minimization => write!(f, "Minimization"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// One run's thermo data: named columns over numeric rows plus run metadata.
///
/// Column lookup by name goes through an index built once at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunTable {
    columns: Vec<String>,
    #[serde(skip)]
    column_index: HashMap<String, usize>,
    rows: Vec<Vec<f64>>,
    run_kind: RunKind,
    unit_system: Option<String>,
    timestep: Option<f64>,
}

impl RunTable {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn run_kind(&self) -> RunKind {
        self.run_kind
    }

    /// Unit style declared for this run (`metal`, `real`, ...), if any.
    pub fn unit_system(&self) -> Option<&str> {
        self.unit_system.as_deref()
    }

    /// Timestep size; present exactly for dynamics runs.
    pub fn timestep(&self) -> Option<f64> {
        self.timestep
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index.contains_key(name)
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_index.get(name).copied()
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> LogResult<Vec<f64>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| row[idx]).collect())
    }

    /// `(x, y)` pairs for two columns, in row order.
    pub fn series(&self, x: &str, y: &str) -> LogResult<Vec<(f64, f64)>> {
        let xi = self.require_column(x)?;
        let yi = self.require_column(y)?;
        Ok(self.rows.iter().map(|row| (row[xi], row[yi])).collect())
    }

    fn require_column(&self, name: &str) -> LogResult<usize> {
        self.column_index(name)
            .ok_or_else(|| LogError::UnknownColumn {
                column: name.to_string(),
            })
    }
}

/// A built table and the recoverable problem found while building it, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRun {
    pub table: RunTable,
    pub notice: Option<ParseNotice>,
}

#[derive(Deserialize)]
struct ThermoYaml {
    keywords: Vec<String>,
    #[serde(default)]
    data: Option<Vec<Vec<serde_yaml::Value>>>,
}

/// Convert one scanned block into the table for run number `run` (1-based).
///
/// An unparsable timestep is recovered (the run becomes a minimization run
/// and a notice is returned); every other problem is a `MalformedTable`.
pub fn build_run_table(block: &RawBlockMatch<'_>, run: usize) -> LogResult<BuiltRun> {
    let malformed = |details: String| LogError::malformed(run, block.line, block.offset, details);

    let parsed: ThermoYaml =
        serde_yaml::from_str(yaml_body(block.table_text)).map_err(|e| malformed(e.to_string()))?;

    let mut columns = parsed.keywords;
    let mut column_index = HashMap::with_capacity(columns.len() + 1);
    for (i, name) in columns.iter().enumerate() {
        if column_index.insert(name.clone(), i).is_some() {
            return Err(malformed(format!("duplicate keyword '{}'", name)));
        }
    }

    let raw_rows = parsed.data.unwrap_or_default();
    let mut rows = Vec::with_capacity(raw_rows.len());
    for (r, raw_row) in raw_rows.iter().enumerate() {
        if raw_row.len() != columns.len() {
            return Err(malformed(format!(
                "row {} has {} values, expected {}",
                r + 1,
                raw_row.len(),
                columns.len()
            )));
        }
        let row = raw_row
            .iter()
            .zip(&columns)
            .map(|(value, name)| {
                scalar_to_f64(value).ok_or_else(|| {
                    malformed(format!(
                        "row {} column '{}': non-numeric value {:?}",
                        r + 1,
                        name,
                        value
                    ))
                })
            })
            .collect::<LogResult<Vec<f64>>>()?;
        rows.push(row);
    }

    let mut notice = None;
    let timestep = match block.timestep_text {
        Some(text) => match parse_timestep(text) {
            Some(dt) => Some(dt),
            None => {
                warn!(run, line = block.line, text, "ignoring unparsable time step");
                notice = Some(ParseNotice::InvalidTimestep {
                    run,
                    line: block.line,
                    text: text.trim().to_string(),
                });
                None
            }
        },
        None => None,
    };
    let run_kind = if timestep.is_some() {
        RunKind::Dynamics
    } else {
        RunKind::Minimization
    };

    if let Some(dt) = timestep
        && !column_index.contains_key(TIME_COLUMN)
        && let Some(&step) = column_index.get(STEP_COLUMN)
    {
        for row in &mut rows {
            let time = row[step] * dt;
            row.push(time);
        }
        column_index.insert(TIME_COLUMN.to_string(), columns.len());
        columns.push(TIME_COLUMN.to_string());
    }

    let unit_system = block
        .unit_system_text
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    debug!(
        run,
        kind = %run_kind,
        columns = columns.len(),
        rows = rows.len(),
        "built thermo table"
    );

    Ok(BuiltRun {
        table: RunTable {
            columns,
            column_index,
            rows,
            run_kind,
            unit_system,
            timestep,
        },
        notice,
    })
}

/// Text between the `---` and `...` marker lines.
fn yaml_body(table_text: &str) -> &str {
    let after_start = table_text.split_once('\n').map_or("", |(_, rest)| rest);
    after_start
        .rsplit_once('\n')
        .map_or("", |(body, _)| body)
}

fn scalar_to_f64(value: &serde_yaml::Value) -> Option<f64> {
    match value {
        serde_yaml::Value::Number(n) => n.as_f64(),
        serde_yaml::Value::String(s) => non_finite_token(s),
        _ => None,
    }
}

/// LAMMPS prints blown-up thermo values as bare `nan`, `-nan` or `inf`,
/// which YAML reads as strings. Any other string stays non-numeric.
fn non_finite_token(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, body) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = match body.to_ascii_lowercase().as_str() {
        "nan" => f64::NAN,
        "inf" | "infinity" => f64::INFINITY,
        _ => return None,
    };
    Some(if negative { -value } else { value })
}

fn parse_timestep(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|dt| dt.is_finite())
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn derived_time_is_step_times_dt(
            steps in prop::collection::vec(0_u32..1_000_000, 0..20),
            dt in 1e-6_f64..10.0,
        ) {
            let mut text = String::from("---\nkeywords: ['Step', 'Temp']\ndata:\n");
            for step in &steps {
                text.push_str(&format!("  - [{}, 1.0]\n", step));
            }
            text.push_str("...");
            let dt_text = format!("{:?}", dt);
            let b = RawBlockMatch {
                unit_system_text: None,
                timestep_text: Some(&dt_text),
                table_text: &text,
                offset: 0,
                line: 1,
            };
            let table = build_run_table(&b, 1).unwrap().table;
            let time = table.column(TIME_COLUMN).unwrap();
            prop_assert_eq!(time.len(), steps.len());
            for (t, step) in time.iter().zip(&steps) {
                prop_assert_eq!(*t, f64::from(*step) * dt);
            }
        }
    }
}
