use crate::error::{EnrichmentError, Result};
use crate::models::RestaurantRecord;
use crate::utils::collect_data_files;
use csv::{ReaderBuilder, Trim};
use std::path::Path;
use tracing::debug;

pub struct RestaurantReader;

impl RestaurantReader {
    pub fn new() -> Self {
        Self
    }

    /// Read restaurant rows from a CSV file, or from every `*.csv` file in a
    /// directory in path order. Empty `lat`/`lng` cells become nulls.
    pub fn read_restaurants(&self, path: &Path) -> Result<Vec<RestaurantRecord>> {
        let files = collect_data_files(path, "csv", false)?;
        if files.is_empty() {
            return Err(EnrichmentError::MissingData(format!(
                "No CSV files found in {}",
                path.display()
            )));
        }

        let mut restaurants = Vec::new();
        for file in &files {
            let before = restaurants.len();
            self.read_file(file, &mut restaurants)?;
            debug!(
                file = %file.display(),
                rows = restaurants.len() - before,
                "read restaurant file"
            );
        }

        Ok(restaurants)
    }

    fn read_file(&self, path: &Path, restaurants: &mut Vec<RestaurantRecord>) -> Result<()> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_path(path)?;

        for result in reader.deserialize() {
            let record: RestaurantRecord = result?;
            restaurants.push(record);
        }

        Ok(())
    }
}

impl Default for RestaurantReader {
    fn default() -> Self {
        Self::new()
    }
}
