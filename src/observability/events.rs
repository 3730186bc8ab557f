//! Observable events
//!
//! Every event the store and CLI emit is a variant here; call sites never
//! log free-form event names.

use std::fmt;

use super::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration file loaded
    ConfigLoaded,

    // Load path
    /// Store construction begins
    StoreOpen,
    /// Backing file was absent and has been created empty
    StoreFileCreated,
    /// Backing file loaded
    StoreLoaded,
    /// A malformed line was skipped during load
    RecordSkipped,
    /// Loading the backing file failed
    StoreLoadFailed,

    // Save path
    /// Atomic rewrite begins
    SaveBegin,
    /// Atomic rewrite published
    SaveComplete,
    /// Atomic rewrite failed; backing file untouched
    SaveFailed,

    // Mutations
    RecordAdded,
    RecordUpdated,
    RecordRemoved,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreOpen => "STORE_OPEN",
            Event::StoreFileCreated => "STORE_FILE_CREATED",
            Event::StoreLoaded => "STORE_LOADED",
            Event::RecordSkipped => "RECORD_SKIPPED",
            Event::StoreLoadFailed => "STORE_LOAD_FAILED",
            Event::SaveBegin => "SAVE_BEGIN",
            Event::SaveComplete => "SAVE_COMPLETE",
            Event::SaveFailed => "SAVE_FAILED",
            Event::RecordAdded => "RECORD_ADDED",
            Event::RecordUpdated => "RECORD_UPDATED",
            Event::RecordRemoved => "RECORD_REMOVED",
        }
    }

    /// Severity this event is logged at.
    pub fn severity(&self) -> Severity {
        match self {
            Event::SaveBegin => Severity::Trace,
            Event::StoreFileCreated | Event::RecordSkipped => Severity::Warn,
            Event::StoreLoadFailed | Event::SaveFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names_are_screaming_snake_case() {
        let events = [
            Event::ConfigLoaded,
            Event::StoreOpen,
            Event::StoreFileCreated,
            Event::StoreLoaded,
            Event::RecordSkipped,
            Event::StoreLoadFailed,
            Event::SaveBegin,
            Event::SaveComplete,
            Event::SaveFailed,
            Event::RecordAdded,
            Event::RecordUpdated,
            Event::RecordRemoved,
        ];
        for event in events {
            assert!(event
                .as_str()
                .chars()
                .all(|c| c.is_ascii_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_event_severities() {
        assert_eq!(Event::SaveFailed.severity(), Severity::Error);
        assert_eq!(Event::StoreLoadFailed.severity(), Severity::Error);
        assert_eq!(Event::RecordSkipped.severity(), Severity::Warn);
        assert_eq!(Event::SaveBegin.severity(), Severity::Trace);
    }
}
