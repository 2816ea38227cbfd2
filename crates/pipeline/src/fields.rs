//! Parsing of the numeric form fields accompanying the images.
//!
//! Height and actual weight arrive as decimal strings in the multipart
//! form. Both are required to be parseable, finite, and positive; the
//! positivity check is enforced here for every ingestion path rather than
//! left to individual clients.

use records::{Result, ServiceError};

/// Parse the `height` form field (centimeters).
pub fn parse_height(raw: Option<&str>) -> Result<f64> {
    parse_positive(raw, "height")
}

/// Parse the `actual_weight` form field (kilograms).
pub fn parse_weight(raw: Option<&str>) -> Result<f64> {
    parse_positive(raw, "actual_weight")
}

fn parse_positive(raw: Option<&str>, field: &str) -> Result<f64> {
    let raw = raw
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ServiceError::validation(format!("{field} is required")))?;

    let value: f64 = raw
        .parse()
        .map_err(|_| ServiceError::validation(format!("invalid {field} value: {raw}")))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(ServiceError::validation(format!(
            "{field} must be a positive number, got {raw}"
        )));
    }

    Ok(value)
}
