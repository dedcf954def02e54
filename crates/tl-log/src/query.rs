//! Query helpers for parsed runs.

use serde::Serialize;

use crate::collection::RunCollection;
use crate::table::{RunKind, RunTable, STEP_COLUMN};

/// Summary of one run's metadata and extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub index: usize,
    pub kind: RunKind,
    pub unit_system: Option<String>,
    pub timestep: Option<f64>,
    pub row_count: usize,
    pub columns: Vec<String>,
    /// First and last Step values, when the run has a Step column and rows.
    pub step_range: Option<(f64, f64)>,
}

pub fn summarize_run(index: usize, run: &RunTable) -> RunSummary {
    let step_range = run.column_index(STEP_COLUMN).and_then(|i| {
        let first = run.rows().first()?[i];
        let last = run.rows().last()?[i];
        Some((first, last))
    });

    RunSummary {
        index,
        kind: run.run_kind(),
        unit_system: run.unit_system().map(str::to_string),
        timestep: run.timestep(),
        row_count: run.row_count(),
        columns: run.columns().to_vec(),
        step_range,
    }
}

/// Summaries for every run, in index order.
pub fn summarize(runs: &RunCollection) -> Vec<RunSummary> {
    runs.iter()
        .map(|(index, run)| summarize_run(index, run))
        .collect()
}
