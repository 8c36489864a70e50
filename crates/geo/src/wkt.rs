//! Well-known-text for 2D points, as written to the `Geometry` column.

use crate::error::GeoError;

/// Format a projected position as `POINT (<easting> <northing>)`.
pub fn point(easting: f64, northing: f64) -> String {
    format!("POINT ({easting} {northing})")
}

/// Parse `POINT (<x> <y>)`. Case-insensitive keyword, flexible whitespace.
pub fn parse_point(text: &str) -> Result<(f64, f64), GeoError> {
    let err = || GeoError::Wkt(text.to_string());

    let trimmed = text.trim();
    let keyword = trimmed.get(..5).ok_or_else(err)?;
    if !keyword.eq_ignore_ascii_case("point") {
        return Err(err());
    }
    let body = trimmed[5..].trim();
    let inner = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(err)?;

    let mut parts = inner.split_whitespace();
    let x = parts.next().and_then(|v| v.parse::<f64>().ok()).ok_or_else(err)?;
    let y = parts.next().and_then(|v| v.parse::<f64>().ok()).ok_or_else(err)?;
    if parts.next().is_some() {
        return Err(err());
    }
    Ok((x, y))
}
