use crate::error::{EnrichmentError, Result};
use crate::models::SpatialBucket;
use crate::utils::constants::{DEFAULT_GEOHASH_PRECISION, MAX_GEOHASH_PRECISION};
use crate::utils::geohash;

/// Maps coordinates to a fixed-precision geohash bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpatialKeyDeriver {
    precision: usize,
}

impl SpatialKeyDeriver {
    pub fn new(precision: usize) -> Result<Self> {
        if precision == 0 || precision > MAX_GEOHASH_PRECISION {
            return Err(EnrichmentError::Config(format!(
                "Geohash precision must be between 1 and {}, got: {}",
                MAX_GEOHASH_PRECISION, precision
            )));
        }
        Ok(Self { precision })
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    /// `None` when either coordinate is absent, non-finite or out of range
    pub fn derive(&self, latitude: Option<f64>, longitude: Option<f64>) -> Option<SpatialBucket> {
        let (latitude, longitude) = (latitude?, longitude?);
        geohash::encode(latitude, longitude, self.precision)
            .ok()
            .map(SpatialBucket::new)
    }
}

impl Default for SpatialKeyDeriver {
    fn default() -> Self {
        Self {
            precision: DEFAULT_GEOHASH_PRECISION,
        }
    }
}
