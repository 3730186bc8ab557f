//! invtrack - A small inventory tracker backed by a flat text file
//!
//! The persistence layer is the core: a line codec for records and an
//! inventory store that loads corrupted files tolerantly and rewrites the
//! whole file via atomic replace on every mutation.

pub mod cli;
pub mod config;
pub mod crash_point;
pub mod observability;
pub mod record;
pub mod store;
