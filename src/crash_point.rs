//! Crash point injection for testing save atomicity
//!
//! A crash point is enabled through the `INVTRACK_CRASH_POINT` environment
//! variable. When the running code reaches the named point the process
//! terminates via `std::process::abort()`: no cleanup, no unwinding, no
//! temp-file removal. Tests use this to prove that an interrupted save never
//! leaves a half-written backing file.
//!
//! # Usage
//!
//! ```ignore
//! use invtrack::crash_point::{maybe_crash, points};
//!
//! maybe_crash(points::SAVE_BEFORE_RENAME);
//! ```
//!
//! ```bash
//! INVTRACK_CRASH_POINT=save_before_rename invtrack add P001 "Lapiz HB" 100 0.25
//! ```

use std::sync::OnceLock;

/// Environment variable naming the active crash point
pub const CRASH_POINT_ENV: &str = "INVTRACK_CRASH_POINT";

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn get_crash_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var(CRASH_POINT_ENV).ok())
        .as_deref()
}

/// Returns true if `INVTRACK_CRASH_POINT` equals the given name.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    get_crash_point().map(|p| p == name).unwrap_or(false)
}

/// Abort the process if the named crash point is enabled.
///
/// No-op when `INVTRACK_CRASH_POINT` is unset or names another point.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names, in save-pipeline order
pub mod points {
    /// Before the temporary file is created
    pub const SAVE_BEGIN: &str = "save_begin";
    /// Temporary file fully written, not yet synced
    pub const SAVE_AFTER_TEMP_WRITE: &str = "save_after_temp_write";
    /// Temporary file synced, rename not yet performed
    pub const SAVE_BEFORE_RENAME: &str = "save_before_rename";
    /// Rename performed, directory not yet synced
    pub const SAVE_AFTER_RENAME: &str = "save_after_rename";

    pub fn all() -> &'static [&'static str] {
        &[
            SAVE_BEGIN,
            SAVE_AFTER_TEMP_WRITE,
            SAVE_BEFORE_RENAME,
            SAVE_AFTER_RENAME,
        ]
    }
}
