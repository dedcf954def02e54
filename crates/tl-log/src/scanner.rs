//! Thermo block scanner.
//!
//! Finds YAML thermo tables (`thermo_style yaml` output) in free-form log
//! text. A block is recognized with a line-oriented grammar:
//!
//! ```text
//! ---
//! keywords: [...]
//! data:
//!   - [...]
//!   - [...]
//! ...
//! ```
//!
//! `Unit style : <name>` and `Time step : <dt>` lines seen since the previous
//! block attach to the next block; the latest occurrence of each wins. The
//! scan is a single forward pass with bounded lookahead, so it runs in time
//! linear in the document length.

use tracing::debug;

const UNIT_STYLE_KEY: &str = "Unit style";
const TIMESTEP_KEY: &str = "Time step";
const START_MARKER: &str = "---";
const END_MARKER: &str = "...";

/// One thermo block and the metadata declarations that precede it.
///
/// All text is borrowed verbatim from the scanned document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlockMatch<'a> {
    pub unit_system_text: Option<&'a str>,
    pub timestep_text: Option<&'a str>,
    /// From the `---` start marker through the `...` end marker.
    pub table_text: &'a str,
    /// Byte offset of the start marker line.
    pub offset: usize,
    /// 1-based line number of the start marker.
    pub line: usize,
}

/// Lazy iterator over the thermo blocks of a document.
///
/// A clone continues from the same position; call [`scan_blocks`] again to
/// restart from the beginning.
#[derive(Debug, Clone)]
pub struct BlockScanner<'a> {
    text: &'a str,
    lines: LineCursor<'a>,
    pending_unit_style: Option<&'a str>,
    pending_timestep: Option<&'a str>,
}

/// Scan `text` for thermo blocks, left to right.
pub fn scan_blocks(text: &str) -> BlockScanner<'_> {
    BlockScanner::new(text)
}

impl<'a> BlockScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            lines: LineCursor::new(text),
            pending_unit_style: None,
            pending_timestep: None,
        }
    }
}

impl<'a> Iterator for BlockScanner<'a> {
    type Item = RawBlockMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;

            if let Some(value) = declaration_value(line.content, UNIT_STYLE_KEY) {
                self.pending_unit_style = Some(value);
                continue;
            }
            if let Some(value) = declaration_value(line.content, TIMESTEP_KEY) {
                self.pending_timestep = Some(value);
                continue;
            }
            if line.content.trim() != START_MARKER {
                continue;
            }

            // On failure the main loop resumes right after this start marker.
            let mut lookahead = self.lines.clone();
            let Some(end) = match_block_body(&mut lookahead) else {
                debug!(line = line.number, "start marker without a complete thermo block");
                continue;
            };
            self.lines = lookahead;

            let block = RawBlockMatch {
                unit_system_text: self.pending_unit_style.take(),
                timestep_text: self.pending_timestep.take(),
                table_text: &self.text[line.start..end],
                offset: line.start,
                line: line.number,
            };
            debug!(
                line = block.line,
                unit_style = block.unit_system_text,
                timestep = block.timestep_text,
                "matched thermo block"
            );
            return Some(block);
        }
    }
}

/// Match `keywords:`, `data:`, list items and the end marker.
/// Returns the byte offset just past the end marker line's content.
fn match_block_body(lines: &mut LineCursor<'_>) -> Option<usize> {
    let keywords = next_non_blank(lines)?;
    let rest = keywords.content.trim_start().strip_prefix("keywords:")?;
    if rest.is_empty() {
        return None;
    }

    let data = next_non_blank(lines)?;
    if !data.content.trim_start().starts_with("data:") {
        return None;
    }

    loop {
        let line = next_non_blank(lines)?;
        let content = line.content.trim_start();
        if content.starts_with(END_MARKER) {
            return Some(line.start + line.content.len());
        }
        if !is_list_item(content) {
            return None;
        }
    }
}

fn next_non_blank<'a>(lines: &mut LineCursor<'a>) -> Option<Line<'a>> {
    lines.find(|line| !line.content.trim().is_empty())
}

fn is_list_item(content: &str) -> bool {
    content
        .strip_prefix('-')
        .is_some_and(|rest| rest.trim_start().starts_with('['))
}

/// Value of a `<key> : <value>` line, with leading whitespace removed from
/// the value and trailing text kept verbatim.
fn declaration_value<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    let rest = content.trim_start().strip_prefix(key)?;
    let value = rest.trim_start().strip_prefix(':')?;
    Some(value.trim_start())
}

#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// Line text without the terminator (`\n` or `\r\n`).
    content: &'a str,
    start: usize,
    number: usize,
}

#[derive(Debug, Clone)]
struct LineCursor<'a> {
    text: &'a str,
    pos: usize,
    number: usize,
}

impl<'a> LineCursor<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            number: 0,
        }
    }
}

impl<'a> Iterator for LineCursor<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.text.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.text[start..];
        let (raw, advance) = match rest.find('\n') {
            Some(i) => (&rest[..i], i + 1),
            None => (rest, rest.len()),
        };
        self.pos += advance;
        self.number += 1;
        Some(Line {
            content: raw.strip_suffix('\r').unwrap_or(raw),
            start,
            number: self.number,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "---\nkeywords: ['Step', 'Temp']\ndata:\n  - [0, 1.0]\n  - [10, 1.5]\n...\n";

    #[test]
    fn empty_document_has_no_blocks() {
        assert_eq!(scan_blocks("").count(), 0);
        assert_eq!(scan_blocks("LAMMPS (2 Aug 2023)\nLoop time of 1.0\n").count(), 0);
    }

    #[test]
    fn single_block_without_metadata() {
        let text = format!("preamble\n{}trailer\n", BLOCK);
        let blocks: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(blocks.len(), 1);
        let block = blocks[0];
        assert_eq!(block.unit_system_text, None);
        assert_eq!(block.timestep_text, None);
        assert_eq!(block.line, 2);
        assert_eq!(block.offset, "preamble\n".len());
        assert!(block.table_text.starts_with("---\nkeywords:"));
        assert!(block.table_text.ends_with("..."));
    }

    #[test]
    fn blocks_are_matched_non_greedily() {
        let text = format!("{}between\n{}", BLOCK, BLOCK);
        let blocks: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].table_text, BLOCK.trim_end());
        assert_eq!(blocks[1].table_text, BLOCK.trim_end());
        assert_eq!(blocks[1].line, 8);
    }

    #[test]
    fn captures_stdout_metadata() {
        let text = format!(
            "Setting up Verlet run ...\n  Unit style    : metal\n  Current step  : 0\n  Time step     : 0.005\n{}",
            BLOCK
        );
        let block = scan_blocks(&text).next().unwrap();
        assert_eq!(block.unit_system_text, Some("metal"));
        assert_eq!(block.timestep_text, Some("0.005"));
    }

    #[test]
    fn value_keeps_trailing_text_verbatim() {
        let text = format!("Unit style : real  \n{}", BLOCK);
        let block = scan_blocks(&text).next().unwrap();
        assert_eq!(block.unit_system_text, Some("real  "));
    }

    #[test]
    fn declarations_attach_in_either_order() {
        let text = format!("Time step : 1.0\nUnit style : si\n{}", BLOCK);
        let block = scan_blocks(&text).next().unwrap();
        assert_eq!(block.unit_system_text, Some("si"));
        assert_eq!(block.timestep_text, Some("1.0"));
    }

    #[test]
    fn nearest_preceding_declaration_wins() {
        let text = format!(
            "Unit style : lj\nTime step : 0.1\nUnit style : metal\nTime step : 0.002\n{}",
            BLOCK
        );
        let block = scan_blocks(&text).next().unwrap();
        assert_eq!(block.unit_system_text, Some("metal"));
        assert_eq!(block.timestep_text, Some("0.002"));
    }

    #[test]
    fn declarations_do_not_carry_past_a_block() {
        let text = format!("Unit style : metal\nTime step : 0.001\n{}{}", BLOCK, BLOCK);
        let blocks: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].unit_system_text, Some("metal"));
        assert_eq!(blocks[1].unit_system_text, None);
        assert_eq!(blocks[1].timestep_text, None);
    }

    #[test]
    fn minimization_block_has_no_timestep() {
        let text = format!(
            "Setting up cg style minimization ...\n  Unit style    : metal\n  Current step  : 0\n{}",
            BLOCK
        );
        let block = scan_blocks(&text).next().unwrap();
        assert_eq!(block.unit_system_text, Some("metal"));
        assert_eq!(block.timestep_text, None);
    }

    #[test]
    fn unterminated_block_is_skipped() {
        let text = "---\nkeywords: ['Step']\ndata:\n  - [0]\n";
        assert_eq!(scan_blocks(text).count(), 0);
    }

    #[test]
    fn block_missing_data_is_skipped() {
        let text = format!("---\nkeywords: ['Step']\n  - [0]\n...\n{}", BLOCK);
        let blocks: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].line, 5);
    }

    #[test]
    fn block_missing_keywords_is_skipped() {
        let text = "---\ndata:\n  - [0]\n...\n";
        assert_eq!(scan_blocks(text).count(), 0);
    }

    #[test]
    fn stray_line_breaks_a_block() {
        let text = "---\nkeywords: ['Step']\ndata:\n  - [0]\nWARNING: lost atoms\n  - [1]\n...\n";
        assert_eq!(scan_blocks(text).count(), 0);
    }

    #[test]
    fn declarations_inside_failed_candidate_still_count() {
        let text = format!("---\nUnit style : metal\n{}", BLOCK);
        let blocks: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].unit_system_text, Some("metal"));
    }

    #[test]
    fn empty_data_list_is_a_block() {
        let text = "---\nkeywords: ['Step', 'Temp']\ndata:\n...\n";
        assert_eq!(scan_blocks(text).count(), 1);
    }

    #[test]
    fn crlf_line_endings() {
        let text = "Time step : 0.5\r\n---\r\nkeywords: ['Step']\r\ndata:\r\n  - [0]\r\n...\r\n";
        let block = scan_blocks(text).next().unwrap();
        assert_eq!(block.timestep_text, Some("0.5"));
        assert!(block.table_text.ends_with("..."));
    }

    #[test]
    fn scanning_is_restartable() {
        let text = format!("{}{}", BLOCK, BLOCK);
        let first: Vec<_> = scan_blocks(&text).collect();
        let second: Vec<_> = scan_blocks(&text).collect();
        assert_eq!(first, second);

        let mut scanner = scan_blocks(&text);
        scanner.next();
        let fork = scanner.clone();
        assert_eq!(scanner.count(), fork.count());
    }
}
