use crate::models::{Franchise, SpatialBucket};
use arrow::record_batch::RecordBatch;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// One weather observation joined with one restaurant in the same cell
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRecord {
    pub geohash: SpatialBucket,
    pub weather_lat: f64,
    pub weather_lng: f64,
    pub year: i32,
    pub month: i32,
    pub day: i32,
    pub measurement_row: usize,
    pub franchise: Arc<Franchise>,
    pub restaurant_lat: f64,
    pub restaurant_lng: f64,
}

impl EnrichedRecord {
    pub fn dedup_key(&self) -> (SpatialBucket, i32, i32, i32, u64) {
        (
            self.geohash.clone(),
            self.year,
            self.month,
            self.day,
            self.franchise.franchise_id,
        )
    }

    pub fn partition(&self) -> DatePartition {
        DatePartition {
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}

/// Output partition key; renders as the hive-style `year=Y/month=M/day=D` path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatePartition {
    pub year: i32,
    pub month: i32,
    pub day: i32,
}

impl DatePartition {
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(format!("year={}", self.year))
            .join(format!("month={}", self.month))
            .join(format!("day={}", self.day))
    }
}

impl fmt::Display for DatePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

/// Enriched rows plus the weather measurement batch their rows point into
#[derive(Debug, Clone)]
pub struct EnrichedDataset {
    pub records: Vec<EnrichedRecord>,
    pub measurements: RecordBatch,
}

impl EnrichedDataset {
    pub fn new(records: Vec<EnrichedRecord>, measurements: RecordBatch) -> Self {
        Self {
            records,
            measurements,
        }
    }

    /// Record indices grouped by date partition, partitions in date order
    pub fn partitions(&self) -> BTreeMap<DatePartition, Vec<usize>> {
        let mut partitions: BTreeMap<DatePartition, Vec<usize>> = BTreeMap::new();
        for (index, record) in self.records.iter().enumerate() {
            partitions.entry(record.partition()).or_default().push(index);
        }
        partitions
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_path() {
        let partition = DatePartition {
            year: 2023,
            month: 5,
            day: 1,
        };
        assert_eq!(
            partition.relative_path(),
            PathBuf::from("year=2023").join("month=5").join("day=1")
        );
        assert_eq!(partition.to_string(), "2023-05-01");
    }
}
