//! Inventory record and its line codec
//!
//! Line format:
//!
//! ```text
//! id|name|quantity|price
//! P001|Lapiz HB|100|0.25
//! ```
//!
//! There is no escaping. A `|` inside a field shifts the field count and
//! the line fails to decode.

use serde::Serialize;

use super::errors::{RecordError, RecordResult};

/// Field delimiter
pub const DELIMITER: char = '|';

/// Number of fields in a well-formed line
pub const FIELD_COUNT: usize = 4;

/// One inventory line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    /// Unique, non-empty identifier
    pub id: String,
    pub name: String,
    /// Units in stock; the codec accepts any sign
    pub quantity: i64,
    /// Unit price; the codec accepts any sign
    pub price: f64,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: i64, price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            quantity,
            price,
        }
    }

    /// Like `new`, but rejects values `validate` refuses.
    pub fn try_new(
        id: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        price: f64,
    ) -> RecordResult<Self> {
        let record = Self::new(id, name, quantity, price);
        record.validate()?;
        Ok(record)
    }

    /// Check that the record survives `encode` then `decode` unchanged.
    ///
    /// The identifier must be non-empty with no surrounding whitespace, and
    /// neither identifier nor name may contain a line break. A `|` is not
    /// checked here; it is the documented limit of the format.
    pub fn validate(&self) -> RecordResult<()> {
        if self.id.is_empty() {
            return Err(RecordError::EmptyIdentifier);
        }
        if self.id.trim() != self.id {
            return Err(RecordError::PaddedIdentifier {
                id: self.id.clone(),
            });
        }
        if has_line_break(&self.id) {
            return Err(RecordError::LineBreak { field: "id" });
        }
        if has_line_break(&self.name) {
            return Err(RecordError::LineBreak { field: "name" });
        }
        Ok(())
    }

    /// Case-insensitive substring match against id or name.
    ///
    /// `needle` must already be lowercased.
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        self.id.to_lowercase().contains(needle) || self.name.to_lowercase().contains(needle)
    }
}

fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Decode one line into a record.
///
/// Surrounding whitespace on the line and on the identifier is ignored.
pub fn decode(line: &str) -> RecordResult<Record> {
    let fields: Vec<&str> = line.trim().split(DELIMITER).collect();
    if fields.len() != FIELD_COUNT {
        return Err(RecordError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let (id, name, quantity_text, price_text) =
        (fields[0].trim(), fields[1], fields[2], fields[3]);

    if id.is_empty() {
        return Err(RecordError::EmptyIdentifier);
    }

    let quantity = quantity_text
        .trim()
        .parse::<i64>()
        .map_err(|_| RecordError::InvalidQuantity {
            text: quantity_text.to_string(),
        })?;

    let price = price_text
        .trim()
        .parse::<f64>()
        .map_err(|_| RecordError::InvalidPrice {
            text: price_text.to_string(),
        })?;

    Ok(Record::new(id, name, quantity, price))
}

/// Encode a record as one line, without a terminator.
///
/// The price uses `f64`'s `Display`, the shortest text that parses back to
/// the same value.
pub fn encode(record: &Record) -> String {
    format!(
        "{}{d}{}{d}{}{d}{}",
        record.id,
        record.name,
        record.quantity,
        record.price,
        d = DELIMITER
    )
}
