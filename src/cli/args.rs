//! CLI argument definitions using clap
//!
//! Commands:
//! - invtrack list
//! - invtrack search <text>
//! - invtrack add <id> <name> <quantity> <price>
//! - invtrack update <id> [--name] [--quantity] [--price]
//! - invtrack remove <id>
//! - invtrack seed-corrupt [--force]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// invtrack - inventory tracker backed by a flat text file
#[derive(Parser, Debug)]
#[command(name = "invtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backing file (overrides the configuration file)
    #[arg(long, global = true)]
    pub file: Option<PathBuf>,

    /// Keep the inventory in memory only; nothing is read or written
    #[arg(long, global = true, conflicts_with = "file")]
    pub memory: bool,

    /// Skip fsync on save
    #[arg(long, global = true)]
    pub no_fsync: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List every record
    List,

    /// Find records whose id or name contains TEXT (case-insensitive)
    Search {
        #[arg(default_value = "")]
        text: String,
    },

    /// Add a new record
    Add {
        id: String,
        name: String,
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        /// Decimal point or decimal comma
        #[arg(allow_hyphen_values = true)]
        price: String,
    },

    /// Change fields of an existing record; empty values keep the current one
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        quantity: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        price: Option<String>,
    },

    /// Remove a record
    Remove { id: String },

    /// Write a demonstration file containing malformed lines
    SeedCorrupt {
        /// Overwrite a non-empty backing file
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_with_negative_quantity() {
        let cli = Cli::try_parse_from(["invtrack", "add", "P1", "Lapiz", "-3", "0,5"]).unwrap();
        match cli.command {
            Command::Add {
                quantity, price, ..
            } => {
                assert_eq!(quantity, "-3");
                assert_eq!(price, "0,5");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["invtrack", "list", "--file", "x.txt", "--json"]).unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("x.txt")));
        assert!(cli.json);
    }

    #[test]
    fn test_memory_conflicts_with_file() {
        assert!(Cli::try_parse_from(["invtrack", "--memory", "--file", "x", "list"]).is_err());
    }

    #[test]
    fn test_search_text_defaults_to_empty() {
        let cli = Cli::try_parse_from(["invtrack", "search"]).unwrap();
        assert!(matches!(cli.command, Command::Search { ref text } if text.is_empty()));
    }
}
