//! Line Format Module
//!
//! Human-editable text representation of a store.
//!
//! ## Grammar
//! ```text
//! line    := ws* ( entry )? ws* ( '#' comment )? '\n'
//! entry   := key ws* '=' ws* value
//! key     := [^ws=]+            (folded to lowercase)
//! value   := everything up to the comment or end of line
//! ```
//!
//! ## Limitations
//! No quoting or escaping. A value containing `#` is cut at the `#`, and
//! surrounding whitespace is lost, so such values do not survive a
//! write/load cycle.

mod parser;
mod scanner;

pub use parser::{is_space, parse_line, ParsedLine};
pub use scanner::{LineScanner, ScannedLine, DEFAULT_LINE_BUFFER};

use std::io::{Read, Write};

use crate::error::{HcfgError, ParseErrorKind, Result};
use crate::store::Hcfg;

/// Non-fatal anomaly noticed while loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadWarning {
    /// A key was defined again; the later value replaced the earlier one
    Redefinition { line: usize, key: String },

    /// A line did not fit in the scanner buffer and was ignored
    LineOverflow { line: usize },
}

/// Summary of a successful load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Lines read, including blank, comment and skipped lines
    pub lines: usize,

    /// `key=value` lines applied to the store
    pub entries: usize,

    /// Anomalies that did not stop the load
    pub warnings: Vec<LoadWarning>,
}

/// Parse `key=value` lines from `reader` into `store`
///
/// Stops at the first structural error. Entries applied before the error
/// stay in the store. The reader is never closed here.
pub fn load<R: Read>(store: &mut Hcfg, reader: R) -> Result<LoadReport> {
    let buffer_size = store.config().line_buffer_size;
    let mut report = LoadReport::default();

    for scanned in LineScanner::with_capacity(reader, buffer_size) {
        match scanned? {
            ScannedLine::Overflow { number } => {
                report.lines = number;
                tracing::warn!(
                    "Ignoring configuration file line {}: Line buffer overflow",
                    number
                );
                report.warnings.push(LoadWarning::LineOverflow { line: number });
            }
            ScannedLine::Line { number, text } => {
                report.lines = number;
                let text = std::str::from_utf8(&text).map_err(|_| HcfgError::Parse {
                    line: number,
                    kind: ParseErrorKind::InvalidUtf8,
                })?;

                let parsed = match parse_line(text) {
                    Ok(Some(parsed)) => parsed,
                    Ok(None) => continue,
                    Err(kind) => return Err(HcfgError::Parse { line: number, kind }),
                };

                tracing::trace!("Line {}: {}={}", number, parsed.key, parsed.value);

                if store.contains_key(&parsed.key) {
                    tracing::warn!(
                        "Line {}: Redefinition of configuration key {}",
                        number,
                        parsed.key
                    );
                    report.warnings.push(LoadWarning::Redefinition {
                        line: number,
                        key: parsed.key.clone(),
                    });
                }

                store.set(&parsed.key, Some(parsed.value))?;
                report.entries += 1;
            }
        }
    }

    tracing::debug!(
        "Loaded {} entries from {} lines ({} warnings)",
        report.entries,
        report.lines,
        report.warnings.len()
    );
    Ok(report)
}

/// Emit every entry of `store` as `key=value\n`, in slot order
pub fn write<W: Write>(store: &Hcfg, mut writer: W) -> Result<()> {
    for (key, value) in store.iter() {
        writeln!(writer, "{}={}", key, value)?;
    }
    writer.flush()?;
    Ok(())
}
