//! tl-log: thermo data extraction from LAMMPS logs.
//!
//! Provides:
//! - Block scanning for `thermo_style yaml` tables in free-form log text
//! - Typed run tables with derived Time columns and per-run metadata
//! - Numbered run collections with recoverable-condition notices
//! - Axis labels annotated with units from a [`tl_catalog::UnitsCatalog`]
//! - Plot requests and run summaries for front ends
//!
//! # Example
//!
//! ```
//! use tl_log::{LabelResolver, RunKind, parse_document};
//!
//! let log = "\
//!   Unit style    : metal
//!   Time step     : 0.005
//! ---
//! keywords: ['Step', 'Temp', 'Press']
//! data:
//!   - [0, 300.0, 1.2]
//!   - [100, 301.5, -0.4]
//! ...
//! ";
//!
//! let doc = parse_document(log).unwrap();
//! let run = doc.runs.get(1).unwrap();
//! assert_eq!(run.run_kind(), RunKind::Dynamics);
//! assert_eq!(run.columns(), ["Step", "Temp", "Press", "Time"]);
//!
//! let labels = LabelResolver::bundled().unwrap();
//! assert_eq!(labels.resolve(run, "Press"), "Press (bars)");
//! ```

pub mod collection;
pub mod error;
pub mod labels;
pub mod notice;
pub mod plot;
pub mod query;
pub mod scanner;
pub mod table;

// Re-exports for ergonomics
pub use collection::{ParsedDocument, RunCollection, parse_document, parse_log_file};
pub use error::{LogError, LogResult};
pub use labels::LabelResolver;
pub use notice::ParseNotice;
pub use plot::{PlotSpec, default_x_column, plot_spec, plottable_columns};
pub use query::{RunSummary, summarize};
pub use scanner::{BlockScanner, RawBlockMatch, scan_blocks};
pub use table::{BuiltRun, RunKind, RunTable, build_run_table};
