use crate::error::{EnrichmentError, Result};
use crate::utils::constants::MAX_GEOHASH_PRECISION;
use ::geohash::Coord;

/// Encode a coordinate pair as a geohash of `precision` characters
///
/// Precision and ranges are checked here so that callers get a config or
/// coordinate error instead of the codec's own.
///
/// # Examples
/// ```
/// use weather_enrich::utils::geohash::encode;
///
/// assert_eq!(encode(40.7128, -74.0060, 4).unwrap(), "dr5r");
/// ```
pub fn encode(latitude: f64, longitude: f64, precision: usize) -> Result<String> {
    if precision == 0 || precision > MAX_GEOHASH_PRECISION {
        return Err(EnrichmentError::Config(format!(
            "Geohash precision must be between 1 and {}, got: {}",
            MAX_GEOHASH_PRECISION, precision
        )));
    }

    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(EnrichmentError::InvalidCoordinate(format!(
            "Latitude {} is outside [-90, 90]",
            latitude
        )));
    }

    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(EnrichmentError::InvalidCoordinate(format!(
            "Longitude {} is outside [-180, 180]",
            longitude
        )));
    }

    ::geohash::encode(
        Coord {
            x: longitude,
            y: latitude,
        },
        precision,
    )
    .map_err(|e| EnrichmentError::InvalidCoordinate(e.to_string()))
}
