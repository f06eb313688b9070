use crate::models::{EnrichedRecord, NormalizedObservation, NormalizedRestaurant, SpatialBucket};
use crate::processors::dedup::retain_first_by_key;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashMap;
use tracing::info;

/// Joins weather to restaurants on bucket equality.
///
/// Observations without a restaurant that has coordinates in their bucket
/// produce no output. Matching is bucket equality only: two points either
/// side of a cell edge never match, however close they are.
pub struct EnrichmentJoiner;

impl EnrichmentJoiner {
    pub fn new() -> Self {
        Self
    }

    pub fn join(
        &self,
        weather: &[NormalizedObservation],
        restaurants: &[NormalizedRestaurant],
        pool: &ThreadPool,
    ) -> Vec<EnrichedRecord> {
        let index = Self::index_restaurants(restaurants);

        let joined: Vec<EnrichedRecord> = pool.install(|| {
            weather
                .par_iter()
                .flat_map_iter(|observation| {
                    index
                        .get(&observation.geohash)
                        .into_iter()
                        .flatten()
                        .filter_map(move |restaurant| Self::enrich(observation, restaurant))
                })
                .collect()
        });

        let matched = joined.len();
        // Both sides are already unique on their keys; this only guards the output key
        let records = retain_first_by_key(joined, EnrichedRecord::dedup_key);

        info!(
            observations = weather.len(),
            restaurants = restaurants.len(),
            matched,
            output = records.len(),
            "joined weather to restaurants"
        );

        records
    }

    /// Restaurants by bucket, in input order; rows without a bucket never match
    fn index_restaurants(
        restaurants: &[NormalizedRestaurant],
    ) -> HashMap<&SpatialBucket, Vec<&NormalizedRestaurant>> {
        let mut index: HashMap<&SpatialBucket, Vec<&NormalizedRestaurant>> = HashMap::new();
        for restaurant in restaurants {
            if let Some(bucket) = &restaurant.geohash {
                index.entry(bucket).or_default().push(restaurant);
            }
        }
        index
    }

    /// `None` when the restaurant side has no coordinates
    fn enrich(
        observation: &NormalizedObservation,
        restaurant: &NormalizedRestaurant,
    ) -> Option<EnrichedRecord> {
        let coordinates = restaurant.coordinates()?;

        Some(EnrichedRecord {
            geohash: observation.geohash.clone(),
            weather_lat: observation.weather_lat,
            weather_lng: observation.weather_lng,
            year: observation.year,
            month: observation.month,
            day: observation.day,
            measurement_row: observation.measurement_row,
            franchise: restaurant.franchise.clone(),
            restaurant_lat: coordinates.latitude,
            restaurant_lng: coordinates.longitude,
        })
    }
}

impl Default for EnrichmentJoiner {
    fn default() -> Self {
        Self::new()
    }
}
