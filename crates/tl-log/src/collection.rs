//! Run collection assembly.

use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{LogError, LogResult};
use crate::notice::ParseNotice;
use crate::scanner::scan_blocks;
use crate::table::{RunTable, build_run_table};

/// Runs of one document, numbered from 1 in scan order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct RunCollection {
    runs: Vec<RunTable>,
}

impl RunCollection {
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Run by 1-based index.
    pub fn get(&self, index: usize) -> Option<&RunTable> {
        index.checked_sub(1).and_then(|i| self.runs.get(i))
    }

    /// Like [`get`](Self::get), with a typed error for out-of-range indices.
    pub fn run(&self, index: usize) -> LogResult<&RunTable> {
        self.get(index).ok_or(LogError::RunNotFound {
            index,
            count: self.runs.len(),
        })
    }

    /// `(index, run)` pairs in scan order, starting at 1.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &RunTable)> {
        self.runs.iter().enumerate().map(|(i, run)| (i + 1, run))
    }

    pub fn indices(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.runs.len()
    }

    fn push(&mut self, run: RunTable) -> usize {
        self.runs.push(run);
        self.runs.len()
    }
}

/// Parsed runs plus the recoverable conditions met while parsing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParsedDocument {
    pub runs: RunCollection,
    pub notices: Vec<ParseNotice>,
}

impl ParsedDocument {
    pub fn units_available(&self) -> bool {
        !self.notices.contains(&ParseNotice::UnitsUnavailable)
    }
}

/// Parse every thermo block in `text` into a numbered run collection.
///
/// Stops at the first malformed table so run numbers stay faithful to the
/// document. Missing unit styles and bad timesteps are reported in
/// [`ParsedDocument::notices`], the former at most once.
pub fn parse_document(text: &str) -> LogResult<ParsedDocument> {
    let mut doc = ParsedDocument::default();
    let mut units_warned = false;

    for (i, block) in scan_blocks(text).enumerate() {
        let built = build_run_table(&block, i + 1)?;

        if built.table.unit_system().is_none() && !units_warned {
            warn!("cannot auto-detect unit style, try the stdout file for units detection");
            doc.notices.push(ParseNotice::UnitsUnavailable);
            units_warned = true;
        }
        if let Some(notice) = built.notice {
            doc.notices.push(notice);
        }

        doc.runs.push(built.table);
    }

    debug!(
        runs = doc.runs.len(),
        notices = doc.notices.len(),
        "parsed thermo log"
    );
    Ok(doc)
}

/// Read a log file fully and parse it.
pub fn parse_log_file(path: &Path) -> LogResult<ParsedDocument> {
    let text = std::fs::read_to_string(path).map_err(|e| LogError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_document(&text)
}
