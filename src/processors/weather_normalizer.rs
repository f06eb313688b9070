use crate::models::{NormalizedObservation, NormalizedWeather, WeatherObservations, WeatherRecord};
use crate::processors::dedup::retain_first_by_key;
use crate::processors::SpatialKeyDeriver;
use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::{info, warn};

/// Attaches buckets to weather observations and keeps one observation per
/// (bucket, year, month, day): the first one in input order.
pub struct WeatherNormalizer {
    keys: SpatialKeyDeriver,
}

impl WeatherNormalizer {
    pub fn new(keys: SpatialKeyDeriver) -> Self {
        Self { keys }
    }

    pub fn normalize(&self, weather: WeatherObservations, pool: &ThreadPool) -> NormalizedWeather {
        let WeatherObservations {
            records,
            measurements,
        } = weather;
        let input_rows = records.len();

        let attached: Vec<Option<NormalizedObservation>> = pool.install(|| {
            records
                .into_par_iter()
                .map(|record| self.attach(record))
                .collect()
        });

        let invalid = attached.iter().filter(|row| row.is_none()).count();
        if invalid > 0 {
            warn!(
                "Dropped {} weather observations with out-of-range coordinates",
                invalid
            );
        }

        let bucketed: Vec<NormalizedObservation> = attached.into_iter().flatten().collect();
        let before = bucketed.len();
        let observations = retain_first_by_key(bucketed, NormalizedObservation::dedup_key);

        info!(
            input = input_rows,
            duplicates_removed = before - observations.len(),
            output = observations.len(),
            "normalized weather"
        );

        NormalizedWeather {
            observations,
            measurements,
        }
    }

    fn attach(&self, record: WeatherRecord) -> Option<NormalizedObservation> {
        let geohash = self
            .keys
            .derive(Some(record.latitude), Some(record.longitude))?;

        Some(NormalizedObservation {
            geohash,
            weather_lat: record.latitude,
            weather_lng: record.longitude,
            year: record.year,
            month: record.month,
            day: record.day,
            measurement_row: record.measurement_row,
        })
    }
}
