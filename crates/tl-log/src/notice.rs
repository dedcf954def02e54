//! Recoverable conditions reported alongside a parsed document.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ParseNotice {
    /// At least one run carries no `Unit style` declaration, so its labels
    /// cannot be annotated with units. Emitted at most once per document.
    UnitsUnavailable,

    /// A `Time step` declaration was not a finite number and was ignored.
    InvalidTimestep {
        run: usize,
        line: usize,
        text: String,
    },
}

impl fmt::Display for ParseNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnitsUnavailable => write!(
                f,
                "Cannot auto-detect unit style; use the LAMMPS stdout file for units detection"
            ),
            Self::InvalidTimestep { run, line, text } => write!(
                f,
                "Run {} (line {}): ignoring unparsable time step '{}'",
                run, line, text
            ),
        }
    }
}
