//! Record codec
//!
//! Pure conversion between a `Record` and its `id|name|quantity|price`
//! text line. Decoding validates field count and numeric fields; encoding
//! never fails.

mod codec;
mod errors;

pub use codec::{decode, encode, Record, DELIMITER, FIELD_COUNT};
pub use errors::{RecordError, RecordResult, MALFORMED_RECORD_CODE};
