//! Corruption-tolerant loader for the backing file
//!
//! - Missing file: created empty, not an error
//! - Blank lines: skipped silently
//! - Malformed lines: skipped, reported as a `LineDiagnostic` and logged
//! - Duplicate identifiers: last line wins
//! - Open/read failures (permission denied, invalid UTF-8, disk errors):
//!   fatal to the load

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use super::table::Table;
use crate::observability::{log_event_with_fields, Event};
use crate::record::{self, RecordError};

/// A line skipped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    /// 1-based line number
    pub line: usize,
    pub reason: RecordError,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// What a load found on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Backing file, `None` when persistence is disabled
    pub path: Option<PathBuf>,
    /// The backing file did not exist and was created empty
    pub created: bool,
    /// Records in the table after load
    pub records: usize,
    pub diagnostics: Vec<LineDiagnostic>,
}

impl LoadReport {
    pub fn skipped(&self) -> usize {
        self.diagnostics.len()
    }

    /// One-line human summary for the CLI.
    pub fn summary(&self) -> String {
        let Some(path) = &self.path else {
            return "in-memory inventory (persistence disabled)".to_string();
        };
        if self.created {
            return format!("file '{}' did not exist; created empty", path.display());
        }
        let mut summary = format!(
            "loaded {} record{} from '{}'",
            self.records,
            if self.records == 1 { "" } else { "s" },
            path.display()
        );
        if self.skipped() > 0 {
            summary.push_str(&format!(" ({} malformed line(s) skipped)", self.skipped()));
        }
        summary
    }
}

/// Table plus report produced by a load.
#[derive(Debug, Clone, Default)]
pub struct LoadOutcome {
    pub table: Table,
    pub report: LoadReport,
}

/// Load the backing file at `path`, creating it if absent.
pub fn load_file(path: &Path) -> StoreResult<LoadOutcome> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return create_empty(path),
        Err(e) => {
            return Err(StoreError::io(
                format!("failed to open '{}'", path.display()),
                e,
            ))
        }
    };

    let (table, diagnostics) = read_lines(BufReader::new(file), path)?;

    let report = LoadReport {
        path: Some(path.to_path_buf()),
        created: false,
        records: table.len(),
        diagnostics,
    };

    log_event_with_fields(
        Event::StoreLoaded,
        &[
            ("path", &path.display().to_string()),
            ("records", &report.records.to_string()),
            ("skipped", &report.skipped().to_string()),
        ],
    );

    Ok(LoadOutcome { table, report })
}

fn create_empty(path: &Path) -> StoreResult<LoadOutcome> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::io(format!("failed to create '{}'", path.display()), e))?;

    log_event_with_fields(
        Event::StoreFileCreated,
        &[("path", &path.display().to_string())],
    );

    Ok(LoadOutcome {
        table: Table::new(),
        report: LoadReport {
            path: Some(path.to_path_buf()),
            created: true,
            records: 0,
            diagnostics: Vec::new(),
        },
    })
}

/// Decode every line of `reader` into a table, skipping malformed lines.
pub(crate) fn read_lines<R: BufRead>(
    reader: R,
    path: &Path,
) -> StoreResult<(Table, Vec<LineDiagnostic>)> {
    let mut table = Table::new();
    let mut diagnostics = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.map_err(|e| {
            StoreError::io(
                format!("failed to read '{}' at line {}", path.display(), line_no),
                e,
            )
        })?;

        if line.trim().is_empty() {
            continue;
        }

        match record::decode(&line) {
            Ok(record) => {
                table.upsert(record);
            }
            Err(reason) => {
                log_event_with_fields(
                    Event::RecordSkipped,
                    &[
                        ("path", &path.display().to_string()),
                        ("line", &line_no.to_string()),
                        ("code", reason.code()),
                        ("reason", reason.reason()),
                        ("detail", &reason.to_string()),
                    ],
                );
                diagnostics.push(LineDiagnostic {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    Ok((table, diagnostics))
}
