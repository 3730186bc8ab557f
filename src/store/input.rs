//! Parsing of user-supplied numeric text
//!
//! Failures map to `StoreError::MalformedInput`. Prices accept a decimal
//! comma (`1,5`) as well as a decimal point.

use super::errors::{StoreError, StoreResult};

pub fn parse_quantity(text: &str) -> StoreResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|e| StoreError::malformed_input("quantity", text, e.to_string()))
}

pub fn parse_price(text: &str) -> StoreResult<f64> {
    let normalized = text.trim().replace(',', ".");
    let price = normalized
        .parse::<f64>()
        .map_err(|e| StoreError::malformed_input("price", text, e.to_string()))?;
    if !price.is_finite() {
        return Err(StoreError::malformed_input("price", text, "must be finite"));
    }
    Ok(price)
}
