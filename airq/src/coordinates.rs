//! Coordinate parsing and validation.

use crate::error::{AirQualityError, Result};

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude, always within -90..=90.
    pub lat: f64,
    /// Longitude, always within -180..=180.
    pub lon: f64,
}

impl Coordinates {
    /// Validate numeric coordinates.
    ///
    /// Bounds are inclusive. Non-finite values fall outside them.
    ///
    /// # Examples
    ///
    /// ```
    /// use airq::Coordinates;
    ///
    /// assert!(Coordinates::new(90.0, -180.0).is_ok());
    /// assert!(Coordinates::new(90.1, 0.0).is_err());
    /// ```
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if lat.is_nan() || lon.is_nan() {
            return Err(AirQualityError::invalid_input(
                "coordinates must be valid numbers",
            ));
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(AirQualityError::invalid_input(
                "latitude must be between -90 and 90",
            ));
        }

        if !(-180.0..=180.0).contains(&lon) {
            return Err(AirQualityError::invalid_input(
                "longitude must be between -180 and 180",
            ));
        }

        Ok(Self { lat, lon })
    }

    /// Parse coordinates from raw query strings.
    ///
    /// Surrounding whitespace is ignored. Besides decimal and exponent
    /// notation, unsigned `0x`, `0o` and `0b` integer literals are accepted.
    /// Both values must parse before any range check is made, so
    /// `lat=abc&lon=999` reports the parse failure.
    pub fn parse(lat: &str, lon: &str) -> Result<Self> {
        let lat = parse_degrees(lat);
        let lon = parse_degrees(lon);
        Self::new(lat, lon)
    }
}

fn parse_degrees(raw: &str) -> f64 {
    let raw = raw.trim();

    let radix = match raw.get(..2).map(str::to_ascii_lowercase).as_deref() {
        Some("0x") => 16,
        Some("0o") => 8,
        Some("0b") => 2,
        _ => return raw.parse::<f64>().unwrap_or(f64::NAN),
    };

    // from_str_radix tolerates a leading sign, prefixed literals do not
    let digits = &raw[2..];
    if digits.starts_with(['+', '-']) {
        return f64::NAN;
    }

    u128::from_str_radix(digits, radix)
        .map(|n| n as f64)
        .unwrap_or(f64::NAN)
}
