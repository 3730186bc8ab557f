//! CLI module for invtrack
//!
//! Thin front end over the inventory store:
//! - list / search: print records
//! - add / update / remove: mutate and save
//! - seed-corrupt: write a demonstration file with malformed lines

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{execute, resolve_store_config, run, DEMO_CORRUPT_LINES};
pub use errors::{CliError, CliResult};
pub use io::render_table;
