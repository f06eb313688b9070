use crate::geocoding::GeocodeResolver;
use crate::models::{
    CoordinateSource, CoordinateState, Coordinates, NormalizedRestaurant, RestaurantRecord,
};
use crate::processors::dedup::retain_first_by_key;
use crate::processors::SpatialKeyDeriver;
use crate::utils::progress::ProgressReporter;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestaurantStats {
    pub input_rows: usize,
    pub with_coordinates: usize,
    pub missing_coordinates: usize,
    pub partial_coordinates: usize,
    pub invalid_coordinates: usize,
    pub geocoded: usize,
    pub unresolved: usize,
    pub duplicates_removed: usize,
    pub output_rows: usize,
}

impl RestaurantStats {
    pub fn needed_geocoding(&self) -> usize {
        self.missing_coordinates + self.partial_coordinates + self.invalid_coordinates
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedRestaurants {
    pub rows: Vec<NormalizedRestaurant>,
    pub stats: RestaurantStats,
}

/// Fills missing restaurant coordinates, attaches buckets and deduplicates
/// on (franchise_id, bucket).
///
/// Rows that carried coordinates in the source come before geocoded rows,
/// each group in input order, and the first row per key is kept. A source
/// location therefore always beats a geocoded one for the same key.
pub struct RestaurantNormalizer {
    resolver: GeocodeResolver,
    keys: SpatialKeyDeriver,
    silent: bool,
}

impl RestaurantNormalizer {
    pub fn new(resolver: GeocodeResolver, keys: SpatialKeyDeriver) -> Self {
        Self {
            resolver,
            keys,
            silent: false,
        }
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    pub fn normalize(
        &self,
        records: Vec<RestaurantRecord>,
        pool: &ThreadPool,
    ) -> NormalizedRestaurants {
        let mut stats = RestaurantStats {
            input_rows: records.len(),
            ..Default::default()
        };

        let mut known = Vec::new();
        let mut to_resolve = Vec::new();
        for record in records {
            match record.coordinate_state() {
                CoordinateState::Complete(coordinates) => known.push((record, coordinates)),
                CoordinateState::Partial => {
                    stats.partial_coordinates += 1;
                    to_resolve.push(record);
                }
                CoordinateState::Invalid => {
                    stats.invalid_coordinates += 1;
                    to_resolve.push(record);
                }
                CoordinateState::Missing => {
                    stats.missing_coordinates += 1;
                    to_resolve.push(record);
                }
            }
        }
        stats.with_coordinates = known.len();

        if stats.partial_coordinates > 0 || stats.invalid_coordinates > 0 {
            warn!(
                "{} restaurants have only one coordinate and {} have out-of-range coordinates; geocoding them as missing",
                stats.partial_coordinates, stats.invalid_coordinates
            );
        }

        let resolved = self.resolve_missing(to_resolve, pool);
        stats.geocoded = resolved.iter().filter(|(_, c)| c.is_some()).count();
        stats.unresolved = resolved.len() - stats.geocoded;

        let combined: Vec<(RestaurantRecord, Option<Coordinates>, CoordinateSource)> = known
            .into_iter()
            .map(|(record, coordinates)| (record, Some(coordinates), CoordinateSource::Source))
            .chain(resolved.into_iter().map(|(record, coordinates)| {
                let source = if coordinates.is_some() {
                    CoordinateSource::Geocoded
                } else {
                    CoordinateSource::Unresolved
                };
                (record, coordinates, source)
            }))
            .collect();

        let attached: Vec<NormalizedRestaurant> = pool.install(|| {
            combined
                .into_par_iter()
                .map(|(record, coordinates, source)| self.attach(record, coordinates, source))
                .collect()
        });

        let before = attached.len();
        let rows = retain_first_by_key(attached, |row| (row.franchise_id(), row.geohash.clone()));
        stats.duplicates_removed = before - rows.len();
        stats.output_rows = rows.len();

        info!(
            input = stats.input_rows,
            needed_geocoding = stats.needed_geocoding(),
            geocoded = stats.geocoded,
            unresolved = stats.unresolved,
            duplicates_removed = stats.duplicates_removed,
            output = stats.output_rows,
            "normalized restaurants"
        );

        NormalizedRestaurants { rows, stats }
    }

    /// One independent geocoding request per row, spread over the pool
    fn resolve_missing(
        &self,
        rows: Vec<RestaurantRecord>,
        pool: &ThreadPool,
    ) -> Vec<(RestaurantRecord, Option<Coordinates>)> {
        if rows.is_empty() {
            return Vec::new();
        }

        let progress = ProgressReporter::new(
            rows.len() as u64,
            "Geocoding restaurants without coordinates...",
            self.silent,
        );

        let resolved: Vec<(RestaurantRecord, Option<Coordinates>)> = pool.install(|| {
            rows.into_par_iter()
                .map(|record| {
                    let coordinates =
                        self.resolver
                            .resolve(&record.franchise_name, &record.city, &record.country);
                    progress.increment(1);
                    (record, coordinates)
                })
                .collect()
        });

        progress.finish_with_message("Geocoding complete");
        resolved
    }

    fn attach(
        &self,
        record: RestaurantRecord,
        coordinates: Option<Coordinates>,
        coordinate_source: CoordinateSource,
    ) -> NormalizedRestaurant {
        let restaurant_lat = coordinates.map(|c| c.latitude);
        let restaurant_lng = coordinates.map(|c| c.longitude);

        NormalizedRestaurant {
            geohash: self.keys.derive(restaurant_lat, restaurant_lng),
            franchise: Arc::new(record.into_franchise()),
            restaurant_lat,
            restaurant_lng,
            coordinate_source,
        }
    }
}
