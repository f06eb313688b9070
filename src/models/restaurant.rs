use crate::models::{Coordinates, SpatialBucket};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One row of the restaurant CSV input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRecord {
    #[serde(default)]
    pub id: Option<u64>,
    pub franchise_id: u64,
    pub franchise_name: String,
    #[serde(default)]
    pub restaurant_franchise_id: Option<u64>,
    pub country: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// How usable the coordinates of a source row are
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoordinateState {
    Complete(Coordinates),
    /// Exactly one of latitude/longitude is present
    Partial,
    /// Both present but not finite or out of range
    Invalid,
    Missing,
}

impl RestaurantRecord {
    pub fn coordinate_state(&self) -> CoordinateState {
        match (self.lat, self.lng) {
            (Some(latitude), Some(longitude)) => {
                let coordinates = Coordinates::new(latitude, longitude);
                if coordinates.is_valid() {
                    CoordinateState::Complete(coordinates)
                } else {
                    CoordinateState::Invalid
                }
            }
            (Some(_), None) | (None, Some(_)) => CoordinateState::Partial,
            (None, None) => CoordinateState::Missing,
        }
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        match self.coordinate_state() {
            CoordinateState::Complete(coordinates) => Some(coordinates),
            _ => None,
        }
    }

    pub fn into_franchise(self) -> Franchise {
        Franchise {
            id: self.id,
            franchise_id: self.franchise_id,
            franchise_name: self.franchise_name,
            restaurant_franchise_id: self.restaurant_franchise_id,
            country: self.country,
            city: self.city,
        }
    }
}

/// Identity and location labels of a restaurant, carried unchanged into the output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Franchise {
    pub id: Option<u64>,
    pub franchise_id: u64,
    pub franchise_name: String,
    pub restaurant_franchise_id: Option<u64>,
    pub country: String,
    pub city: String,
}

/// Where a normalized restaurant's coordinates came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoordinateSource {
    Source,
    Geocoded,
    Unresolved,
}

/// Restaurant after coordinate fill and bucket attachment.
///
/// Coordinates use restaurant-scoped names so they never collide with the
/// weather side once joined.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRestaurant {
    pub franchise: Arc<Franchise>,
    pub restaurant_lat: Option<f64>,
    pub restaurant_lng: Option<f64>,
    pub geohash: Option<SpatialBucket>,
    pub coordinate_source: CoordinateSource,
}

impl NormalizedRestaurant {
    pub fn coordinates(&self) -> Option<Coordinates> {
        match (self.restaurant_lat, self.restaurant_lng) {
            (Some(latitude), Some(longitude)) => Some(Coordinates::new(latitude, longitude)),
            _ => None,
        }
    }

    pub fn franchise_id(&self) -> u64 {
        self.franchise.franchise_id
    }
}
