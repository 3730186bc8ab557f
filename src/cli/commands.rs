//! CLI command implementations
//!
//! Each invocation resolves the store configuration (config file, then
//! flags), opens the inventory, runs one command and exits. The store does
//! the work; this module only parses user text and prints results.

use std::fs;
use std::io::{self, Write};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_notice, write_record, write_records, write_response};
use crate::config::Config;
use crate::record::Record;
use crate::store::{
    parse_price, parse_quantity, Inventory, PersistenceMode, RecordPatch, StoreConfig,
    StoreError,
};

/// Demonstration file for `seed-corrupt`: lines 2, 3 and 4 are malformed.
pub const DEMO_CORRUPT_LINES: &[&str] = &[
    "P001|Lapiz HB|100|0.25",
    "MAL_FORMATO",
    "P002|Cuaderno|cincuenta|1.5",
    "P003|Borrador|25|x.y",
    "P004|Regla 30cm|15|0.8",
];

/// Main CLI entry point; the only function `main.rs` calls.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    execute(cli, &mut out)
}

/// Run one parsed command, writing results to `out`.
pub fn execute<W: Write>(cli: Cli, out: &mut W) -> CliResult<()> {
    let store_config = resolve_store_config(&cli)?;

    if let Command::SeedCorrupt { force } = cli.command {
        seed_corrupt(&store_config, force)?;
    }

    let (mut inventory, report) = Inventory::open(&store_config)?;
    write_notice(&report.summary());
    for diagnostic in &report.diagnostics {
        write_notice(&format!("warning: skipped {}", diagnostic));
    }

    match cli.command {
        Command::List => {
            let records: Vec<&Record> = inventory.list().iter().collect();
            write_records(out, &records, cli.json)
        }
        Command::Search { text } => {
            let records: Vec<&Record> = inventory.search(&text).collect();
            write_records(out, &records, cli.json)
        }
        Command::Add {
            id,
            name,
            quantity,
            price,
        } => {
            let record = Record::try_new(
                id.trim(),
                name.trim(),
                parse_quantity(&quantity)?,
                parse_price(&price)?,
            )
            .map_err(StoreError::from)?;
            inventory.add(record.clone())?;
            let message = format!("Record '{}' added and saved.", record.id);
            write_record(out, &record, &message, cli.json)
        }
        Command::Update {
            id,
            name,
            quantity,
            price,
        } => {
            let patch = build_patch(name, quantity, price)?;
            let id = id.trim();
            let record = inventory.update(id, patch)?;
            let message = format!("Record '{}' updated and saved.", id);
            write_record(out, &record, &message, cli.json)
        }
        Command::Remove { id } => {
            let record = inventory.remove(id.trim())?;
            let message = format!("Record '{}' removed and saved.", record.id);
            write_record(out, &record, &message, cli.json)
        }
        Command::SeedCorrupt { .. } => {
            if cli.json {
                write_response(
                    out,
                    serde_json::json!({
                        "records": inventory.len(),
                        "skipped": report.diagnostics.len(),
                    }),
                )
            } else {
                writeln!(
                    out,
                    "Demonstration file written: {} valid record(s), {} malformed line(s) skipped.",
                    inventory.len(),
                    report.diagnostics.len()
                )?;
                Ok(())
            }
        }
    }
}

/// Config file first, then command-line overrides.
pub fn resolve_store_config(cli: &Cli) -> CliResult<StoreConfig> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut store = config.to_store_config();

    if let Some(file) = &cli.file {
        store.path = file.clone();
        store.mode = PersistenceMode::File;
    }
    if cli.memory {
        store.mode = PersistenceMode::Memory;
    }
    if cli.no_fsync {
        store.fsync = false;
    }
    Ok(store)
}

/// Empty text for any field means "keep the current value".
fn build_patch(
    name: Option<String>,
    quantity: Option<String>,
    price: Option<String>,
) -> CliResult<RecordPatch> {
    let mut patch = RecordPatch::new();
    if let Some(name) = name {
        patch = patch.name(name.trim());
    }
    if let Some(text) = quantity.filter(|t| !t.trim().is_empty()) {
        patch = patch.quantity(parse_quantity(&text)?);
    }
    if let Some(text) = price.filter(|t| !t.trim().is_empty()) {
        patch = patch.price(parse_price(&text)?);
    }
    Ok(patch)
}

fn seed_corrupt(config: &StoreConfig, force: bool) -> CliResult<()> {
    if config.mode == PersistenceMode::Memory {
        return Err(CliError::refused(
            "seed-corrupt needs file persistence, not --memory",
        ));
    }
    let path = &config.path;
    let occupied = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    if occupied && !force {
        return Err(CliError::refused(format!(
            "'{}' is not empty; pass --force to overwrite it",
            path.display()
        )));
    }

    let mut contents = DEMO_CORRUPT_LINES.join("\n");
    contents.push('\n');
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::Path;
    use tempfile::TempDir;

    fn run_args(file: &Path, args: &[&str]) -> CliResult<String> {
        let mut argv = vec!["invtrack", "--no-fsync", "--file", file.to_str().unwrap()];
        argv.extend_from_slice(args);
        let cli = Cli::try_parse_from(argv).unwrap();
        let mut out = Vec::new();
        execute(cli, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_add_update_remove_through_cli() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("inventory.txt");

        run_args(&file, &["add", "P001", "Lapiz HB", "100", "0,25"]).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "P001|Lapiz HB|100|0.25\n");

        run_args(&file, &["update", "P001", "--name", "", "--quantity", "90", "--price", ""])
            .unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "P001|Lapiz HB|90|0.25\n");

        let out = run_args(&file, &["remove", "P001"]).unwrap();
        assert!(out.contains("removed"));
        assert_eq!(fs::read_to_string(&file).unwrap(), "");
    }

    #[test]
    fn test_bad_quantity_is_malformed_input() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("inventory.txt");

        let err = run_args(&file, &["add", "P001", "Lapiz", "cien", "0.25"]).unwrap_err();
        assert_eq!(err.code(), "INVTRACK_MALFORMED_INPUT");
        assert_eq!(fs::read_to_string(&file).unwrap(), "");
    }

    #[test]
    fn test_duplicate_add_reports_code() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("inventory.txt");

        run_args(&file, &["add", "P001", "Lapiz", "1", "1"]).unwrap();
        let err = run_args(&file, &["add", "P001", "Otro", "2", "2"]).unwrap_err();
        assert_eq!(err.code(), "INVTRACK_DUPLICATE_IDENTIFIER");
    }

    #[test]
    fn test_search_json_output() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("inventory.txt");
        fs::write(&file, "P001|Lapiz HB|100|0.25\nP002|Cuaderno|50|1.5\n").unwrap();

        let out = run_args(&file, &["--json", "search", "LAPIZ"]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["data"].as_array().unwrap().len(), 1);
        assert_eq!(parsed["data"][0]["name"], "Lapiz HB");
    }

    #[test]
    fn test_seed_corrupt_then_list() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("inventory.txt");

        let out = run_args(&file, &["seed-corrupt"]).unwrap();
        assert!(out.contains("2 valid record(s), 3 malformed line(s)"));

        let out = run_args(&file, &["list"]).unwrap();
        assert!(out.contains("P001"));
        assert!(out.contains("P004"));
        assert!(!out.contains("P002"));

        let err = run_args(&file, &["seed-corrupt"]).unwrap_err();
        assert_eq!(err.code(), "INVTRACK_CLI_REFUSED");
        run_args(&file, &["seed-corrupt", "--force"]).unwrap();
    }

    #[test]
    fn test_memory_flag_overrides_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("invtrack.json");
        fs::write(
            &config_path,
            format!(
                r#"{{"data_file": "{}"}}"#,
                temp_dir.path().join("inv.txt").display()
            ),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "invtrack",
            "--config",
            config_path.to_str().unwrap(),
            "--memory",
            "list",
        ])
        .unwrap();
        let store = resolve_store_config(&cli).unwrap();
        assert_eq!(store.mode, PersistenceMode::Memory);

        let mut out = Vec::new();
        execute(cli, &mut out).unwrap();
        assert!(!temp_dir.path().join("inv.txt").exists());
    }
}
