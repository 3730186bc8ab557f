//! Atomic snapshot writer
//!
//! Every save rewrites the whole table:
//! 1. Write all lines to `<file>.tmp` next to the backing file
//! 2. fsync the temp file (when enabled)
//! 3. Rename the temp file onto the backing file (atomic on POSIX)
//! 4. fsync the parent directory, best-effort
//!
//! Any failure before step 3 removes the temp file (best-effort) and leaves
//! the backing file exactly as it was.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::errors::{StoreError, StoreResult};
use crate::crash_point::{maybe_crash, points};
use crate::observability::{log_event_with_fields, Event};
use crate::record::{self, Record};

pub struct SnapshotWriter {
    path: PathBuf,
    temp_path: PathBuf,
    fsync: bool,
}

impl SnapshotWriter {
    pub fn new(path: &Path, fsync: bool) -> Self {
        Self {
            path: path.to_path_buf(),
            temp_path: temp_path_for(path),
            fsync,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Atomically replace the backing file with `records`.
    ///
    /// Returns the number of bytes written.
    pub fn write<'a, I>(&self, records: I) -> StoreResult<usize>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        maybe_crash(points::SAVE_BEGIN);

        let mut contents = String::new();
        let mut count = 0usize;
        for record in records {
            contents.push_str(&record::encode(record));
            contents.push('\n');
            count += 1;
        }

        log_event_with_fields(
            Event::SaveBegin,
            &[
                ("path", &self.path.display().to_string()),
                ("records", &count.to_string()),
            ],
        );

        if let Err(e) = self.stage_and_publish(contents.as_bytes()) {
            let _ = fs::remove_file(&self.temp_path);
            log_event_with_fields(
                Event::SaveFailed,
                &[
                    ("path", &self.path.display().to_string()),
                    ("error", &e.to_string()),
                ],
            );
            return Err(e);
        }

        maybe_crash(points::SAVE_AFTER_RENAME);
        self.sync_parent_dir();

        log_event_with_fields(
            Event::SaveComplete,
            &[
                ("path", &self.path.display().to_string()),
                ("records", &count.to_string()),
            ],
        );

        Ok(contents.len())
    }

    fn stage_and_publish(&self, bytes: &[u8]) -> StoreResult<()> {
        {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&self.temp_path)
                .map_err(|e| {
                    StoreError::io(
                        format!("failed to create temp file '{}'", self.temp_path.display()),
                        e,
                    )
                })?;

            file.write_all(bytes).map_err(|e| {
                StoreError::io(
                    format!("failed to write temp file '{}'", self.temp_path.display()),
                    e,
                )
            })?;

            maybe_crash(points::SAVE_AFTER_TEMP_WRITE);

            if self.fsync {
                file.sync_all().map_err(|e| {
                    StoreError::io(
                        format!("failed to fsync temp file '{}'", self.temp_path.display()),
                        e,
                    )
                })?;
            }
        }

        maybe_crash(points::SAVE_BEFORE_RENAME);

        fs::rename(&self.temp_path, &self.path).map_err(|e| {
            StoreError::io(
                format!(
                    "failed to replace '{}' with '{}'",
                    self.path.display(),
                    self.temp_path.display()
                ),
                e,
            )
        })
    }

    fn sync_parent_dir(&self) {
        if !self.fsync {
            return;
        }
        if let Some(parent) = self.path.parent() {
            let parent = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if let Ok(dir) = File::open(parent) {
                let _ = dir.sync_all();
            }
        }
    }
}

/// `<path>.tmp`, always a sibling of `path`.
pub fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}
