use crate::error::Result;
use crate::models::SpatialBucket;
use arrow::datatypes::Schema;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Core fields of one weather observation.
///
/// Measurement fields stay in the columnar batch they were read into;
/// `measurement_row` points at this observation's row there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub latitude: f64,
    pub longitude: f64,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub measurement_row: usize,
}

impl WeatherRecord {
    pub fn new(
        latitude: f64,
        longitude: f64,
        year: i32,
        month: i32,
        day: i32,
        measurement_row: usize,
    ) -> Self {
        Self {
            latitude,
            longitude,
            year,
            month,
            day,
            measurement_row,
        }
    }
}

/// All weather observations of a run plus their opaque measurement columns
#[derive(Debug, Clone)]
pub struct WeatherObservations {
    pub records: Vec<WeatherRecord>,
    pub measurements: RecordBatch,
}

impl WeatherObservations {
    pub fn new(records: Vec<WeatherRecord>, measurements: RecordBatch) -> Self {
        Self {
            records,
            measurements,
        }
    }

    /// Observations without measurement columns; `measurement_row` values
    /// must be below the number of records.
    pub fn without_measurements(records: Vec<WeatherRecord>) -> Result<Self> {
        let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
        let measurements =
            RecordBatch::try_new_with_options(Arc::new(Schema::empty()), vec![], &options)?;
        Ok(Self::new(records, measurements))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Weather observation with its bucket attached and weather-scoped coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedObservation {
    pub geohash: SpatialBucket,
    pub weather_lat: f64,
    pub weather_lng: f64,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub measurement_row: usize,
}

impl NormalizedObservation {
    pub fn dedup_key(&self) -> (SpatialBucket, i32, i32, i32) {
        (self.geohash.clone(), self.year, self.month, self.day)
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedWeather {
    pub observations: Vec<NormalizedObservation>,
    pub measurements: RecordBatch,
}
