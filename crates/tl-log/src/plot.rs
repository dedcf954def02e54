//! Renderer-agnostic plot requests.
//!
//! Builds everything a plotting front end needs for one thermo plot (axes,
//! labels with units, title, points) without drawing anything.

use serde::Serialize;

use crate::collection::RunCollection;
use crate::error::LogResult;
use crate::labels::LabelResolver;
use crate::table::{RunKind, RunTable, STEP_COLUMN, TIME_COLUMN};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotSpec {
    pub title: String,
    pub x: String,
    pub y: String,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<(f64, f64)>,
}

/// Time for dynamics runs, Step for everything else.
pub fn default_x_column(run: &RunTable) -> &'static str {
    match run.run_kind() {
        RunKind::Dynamics => TIME_COLUMN,
        RunKind::Minimization | RunKind::Unknown => STEP_COLUMN,
    }
}

/// `"Dynamics Run 2/5"`; runs of unknown kind get no prefix.
pub fn plot_title(index: usize, count: usize, kind: RunKind) -> String {
    match kind {
        RunKind::Unknown => format!("Run {}/{}", index, count),
        kind => format!("{} Run {}/{}", kind, index, count),
    }
}

/// Plot request for column `y` of run `index`, against `x` or the run's
/// default abscissa.
pub fn plot_spec(
    runs: &RunCollection,
    index: usize,
    y: &str,
    x: Option<&str>,
    labels: &LabelResolver<'_>,
) -> LogResult<PlotSpec> {
    let run = runs.run(index)?;
    let x = x.unwrap_or_else(|| default_x_column(run));
    let points = run.series(x, y)?;

    Ok(PlotSpec {
        title: plot_title(index, runs.len(), run.run_kind()),
        x: x.to_string(),
        y: y.to_string(),
        x_label: labels.resolve(run, x),
        y_label: labels.resolve(run, y),
        points,
    })
}

/// Columns worth offering as a y axis: all but the first (the step
/// counter), skipping columns whose values are all zero.
pub fn plottable_columns(run: &RunTable) -> Vec<&str> {
    run.columns()
        .iter()
        .enumerate()
        .skip(1)
        .filter(|&(i, _)| run.rows().iter().any(|row| row[i] != 0.0))
        .map(|(_, name)| name.as_str())
        .collect()
}
