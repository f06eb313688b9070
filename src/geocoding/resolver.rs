use crate::geocoding::GeocodeLookup;
use crate::models::Coordinates;
use std::sync::Arc;
use tracing::{debug, warn};

/// Best-effort coordinate resolution for a restaurant.
///
/// Each call is one independent request to the lookup; failures are logged
/// and reported as `None`, never propagated.
#[derive(Clone)]
pub struct GeocodeResolver {
    lookup: Arc<dyn GeocodeLookup>,
}

impl GeocodeResolver {
    pub fn new(lookup: Arc<dyn GeocodeLookup>) -> Self {
        Self { lookup }
    }

    pub fn resolve(&self, name: &str, city: &str, country: &str) -> Option<Coordinates> {
        let query = format!("{}, {}", name, city);
        debug!(query = %query, country, "geocoding restaurant");

        match self.lookup.lookup(&query, country) {
            Ok(Some(coordinates)) => {
                debug!(
                    query = %query,
                    latitude = coordinates.latitude,
                    longitude = coordinates.longitude,
                    "geocoded restaurant"
                );
                Some(coordinates)
            }
            Ok(None) => {
                warn!("Geocoding not possible for '{}' (country={}): no match", query, country);
                None
            }
            Err(e) => {
                warn!("Geocoding not possible for '{}' (country={}): {}", query, country, e);
                None
            }
        }
    }
}
