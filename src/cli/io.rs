//! Console output for the CLI
//!
//! Text mode prints a fixed-width table; JSON mode prints one
//! `{"status": "ok", "data": ...}` object per command. Load summaries and
//! notices go to stderr so stdout carries only results.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;
use crate::record::Record;

const RULE_WIDTH: usize = 57;

/// Render records as the console table.
pub fn render_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = format!(
        "{:<10}{:<25}{:>10}{:>12}\n{}\n",
        "ID",
        "Name",
        "Quantity",
        "Price",
        "-".repeat(RULE_WIDTH)
    );
    let mut rows = 0;
    for r in records {
        out.push_str(&format!(
            "{:<10}{:<25}{:>10}{:>12.2}\n",
            r.id, r.name, r.quantity, r.price
        ));
        rows += 1;
    }
    if rows == 0 {
        return "(empty inventory)\n".to_string();
    }
    out
}

/// Write a list of records in the selected format.
pub fn write_records<W: Write>(out: &mut W, records: &[&Record], json: bool) -> CliResult<()> {
    if json {
        write_response(out, serde_json::to_value(records)?)
    } else {
        out.write_all(render_table(records.iter().copied()).as_bytes())?;
        out.flush()?;
        Ok(())
    }
}

/// Write a single-record result with a human message for text mode.
pub fn write_record<W: Write>(
    out: &mut W,
    record: &Record,
    message: &str,
    json: bool,
) -> CliResult<()> {
    if json {
        write_response(out, serde_json::to_value(record)?)
    } else {
        writeln!(out, "{}", message)?;
        out.flush()?;
        Ok(())
    }
}

/// Write a success envelope.
pub fn write_response<W: Write>(out: &mut W, data: Value) -> CliResult<()> {
    let response = serde_json::json!({
        "status": "ok",
        "data": data
    });
    serde_json::to_writer(&mut *out, &response)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

/// Informational line on stderr.
pub fn write_notice(message: &str) {
    let mut stderr = io::stderr();
    let _ = writeln!(stderr, "{}", message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table_formats_price_with_two_decimals() {
        let records = [Record::new("P001", "Lapiz HB", 100, 0.25)];
        let table = render_table(&records);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert_eq!(lines[1], "-".repeat(57));
        assert!(lines[2].starts_with("P001      Lapiz HB"));
        assert!(lines[2].ends_with("0.25"));
        assert_eq!(lines[2].len(), 57);
    }

    #[test]
    fn test_render_empty_table() {
        let records: [Record; 0] = [];
        assert_eq!(render_table(&records), "(empty inventory)\n");
    }

    #[test]
    fn test_write_records_json() {
        let record = Record::new("P001", "Lapiz HB", 100, 0.25);
        let mut out = Vec::new();
        write_records(&mut out, &[&record], true).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed["status"], "ok");
        assert_eq!(parsed["data"][0]["id"], "P001");
        assert_eq!(parsed["data"][0]["quantity"], 100);
        assert_eq!(parsed["data"][0]["price"], 0.25);
    }
}
