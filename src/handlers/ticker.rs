// src/handlers/ticker.rs
use percent_encoding::percent_decode_str;

use crate::models::is_valid_ticker;

use super::error::ApiError;

/// Decodes and uppercases a path ticker. warp hands path params over still
/// percent-encoded.
pub fn normalize_ticker(raw: &str) -> Result<String, ApiError> {
    let decoded = percent_decode_str(raw)
        .decode_utf8()
        .map_err(|_| ApiError::bad_request(format!("invalid ticker: {:?}", raw)))?;

    let ticker = decoded.trim().to_ascii_uppercase();
    if is_valid_ticker(&ticker) {
        Ok(ticker)
    } else {
        Err(ApiError::bad_request(format!("invalid ticker: {:?}", raw)))
    }
}
