use crate::error::{EnrichmentError, Result};
use crate::geocoding::{GeocodeLookup, GeocodeResolver};
use crate::models::EnrichedDataset;
use crate::processors::{
    EnrichmentJoiner, RestaurantNormalizer, SpatialKeyDeriver, WeatherNormalizer,
};
use crate::readers::{ConcurrentReader, InputData};
use crate::utils::constants::{COMPRESSION_SNAPPY, DEFAULT_GEOHASH_PRECISION};
use crate::writers::{OutputSummary, PartitionedParquetWriter};
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Run end to end: read both inputs, normalize each side, join and write
pub struct EnrichmentPipeline {
    max_workers: usize,
    precision: usize,
    compression: String,
    silent: bool,
}

impl EnrichmentPipeline {
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers: max_workers.max(1),
            precision: DEFAULT_GEOHASH_PRECISION,
            compression: COMPRESSION_SNAPPY.to_string(),
            silent: false,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_compression(mut self, compression: &str) -> Self {
        self.compression = compression.to_string();
        self
    }

    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Enrich and write into `output_dir`, which must not exist yet
    pub async fn run(
        &self,
        restaurants_path: &Path,
        weather_path: &Path,
        output_dir: &Path,
        lookup: Arc<dyn GeocodeLookup>,
    ) -> Result<OutputSummary> {
        // Fail on configuration before touching any data
        let keys = SpatialKeyDeriver::new(self.precision)?;
        let writer = PartitionedParquetWriter::new().with_compression(&self.compression)?;
        if output_dir.exists() {
            return Err(EnrichmentError::OutputExists(output_dir.to_path_buf()));
        }

        info!(
            restaurants = %restaurants_path.display(),
            weather = %weather_path.display(),
            "reading inputs"
        );
        let InputData {
            restaurants,
            weather,
        } = ConcurrentReader::new()
            .read_inputs(restaurants_path, weather_path)
            .await?;

        let pool = Arc::new(
            ThreadPoolBuilder::new()
                .num_threads(self.max_workers)
                .build()
                .map_err(|e| EnrichmentError::Config(e.to_string()))?,
        );

        let restaurant_normalizer = RestaurantNormalizer::new(GeocodeResolver::new(lookup), keys)
            .with_silent(self.silent);
        let weather_normalizer = WeatherNormalizer::new(keys);

        let restaurant_pool = pool.clone();
        let restaurant_handle = tokio::task::spawn_blocking(move || {
            restaurant_normalizer.normalize(restaurants, &restaurant_pool)
        });

        let weather_pool = pool.clone();
        let weather_handle = tokio::task::spawn_blocking(move || {
            weather_normalizer.normalize(weather, &weather_pool)
        });

        let (restaurants, weather) = tokio::try_join!(restaurant_handle, weather_handle)?;

        let output_dir: PathBuf = output_dir.to_path_buf();
        let summary = tokio::task::spawn_blocking(move || {
            let records =
                EnrichmentJoiner::new().join(&weather.observations, &restaurants.rows, &pool);
            let dataset = EnrichedDataset::new(records, weather.measurements);
            writer.write(&dataset, &output_dir)
        })
        .await??;

        info!("{}", summary.summary());
        Ok(summary)
    }
}

impl Default for EnrichmentPipeline {
    fn default() -> Self {
        Self::new(num_cpus::get())
    }
}
