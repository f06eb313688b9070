use crate::error::{EnrichmentError, Result};
use crate::models::EnrichedDataset;
use crate::utils::constants::{
    COMPRESSION_GZIP, COMPRESSION_LZ4, COMPRESSION_NONE, COMPRESSION_SNAPPY, COMPRESSION_ZSTD,
    DEFAULT_ROW_GROUP_SIZE, PART_FILE_NAME, SUCCESS_MARKER,
};
use arrow::array::{ArrayRef, Float64Array, StringArray, UInt32Array, UInt64Array};
use arrow::compute::take;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::WriterProperties;
use std::fs::{self, File};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Writes an enriched dataset as `year=Y/month=M/day=D/part-00000.parquet`
/// under a fresh directory. Partition values live in the path only.
pub struct PartitionedParquetWriter {
    compression: Compression,
}

impl PartitionedParquetWriter {
    pub fn new() -> Self {
        Self {
            compression: Compression::SNAPPY,
        }
    }

    pub fn with_compression(mut self, compression: &str) -> Result<Self> {
        self.compression = match compression.to_lowercase().as_str() {
            COMPRESSION_SNAPPY => Compression::SNAPPY,
            COMPRESSION_GZIP => Compression::GZIP(GzipLevel::default()),
            COMPRESSION_LZ4 => Compression::LZ4,
            COMPRESSION_ZSTD => Compression::ZSTD(ZstdLevel::default()),
            COMPRESSION_NONE => Compression::UNCOMPRESSED,
            _ => {
                return Err(EnrichmentError::Config(format!(
                    "Unsupported compression: {}",
                    compression
                )))
            }
        };
        Ok(self)
    }

    /// Write every partition, then a `_SUCCESS` marker. Never reuses an
    /// existing directory.
    pub fn write(&self, dataset: &EnrichedDataset, output_dir: &Path) -> Result<OutputSummary> {
        if let Some(parent) = output_dir.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::create_dir(output_dir).map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => EnrichmentError::OutputExists(output_dir.to_path_buf()),
            _ => EnrichmentError::Io(e),
        })?;

        let schema = self.create_schema(dataset.measurements.schema().as_ref());
        let partitions = dataset.partitions();

        for (partition, indices) in &partitions {
            let partition_dir = output_dir.join(partition.relative_path());
            fs::create_dir_all(&partition_dir)?;

            let batch = self.records_to_batch(dataset, indices, schema.clone())?;
            let path = partition_dir.join(PART_FILE_NAME);
            self.write_batch(&batch, &path)?;

            debug!(partition = %partition, rows = indices.len(), "wrote partition");
        }

        File::create(output_dir.join(SUCCESS_MARKER))?;

        Ok(OutputSummary {
            path: output_dir.to_path_buf(),
            partitions: partitions.len(),
            rows: dataset.len(),
        })
    }

    fn write_batch(&self, batch: &RecordBatch, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let props = WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(DEFAULT_ROW_GROUP_SIZE)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(batch)?;
        writer.close()?;
        Ok(())
    }

    /// Output schema: weather side, measurements in input order, restaurant side
    fn create_schema(&self, measurements: &Schema) -> Arc<Schema> {
        let mut fields = vec![
            Field::new("geohash", DataType::Utf8, false),
            Field::new("weather_lat", DataType::Float64, false),
            Field::new("weather_lng", DataType::Float64, false),
        ];

        fields.extend(measurements.fields().iter().map(|f| f.as_ref().clone()));

        fields.extend([
            Field::new("id", DataType::UInt64, true),
            Field::new("franchise_id", DataType::UInt64, false),
            Field::new("franchise_name", DataType::Utf8, false),
            Field::new("restaurant_franchise_id", DataType::UInt64, true),
            Field::new("country", DataType::Utf8, false),
            Field::new("city", DataType::Utf8, false),
            Field::new("restaurant_lat", DataType::Float64, false),
            Field::new("restaurant_lng", DataType::Float64, false),
        ]);

        Arc::new(Schema::new(fields))
    }

    fn records_to_batch(
        &self,
        dataset: &EnrichedDataset,
        indices: &[usize],
        schema: Arc<Schema>,
    ) -> Result<RecordBatch> {
        let records: Vec<_> = indices.iter().map(|&i| &dataset.records[i]).collect();

        let geohashes: Vec<&str> = records.iter().map(|r| r.geohash.as_str()).collect();
        let weather_lats: Vec<f64> = records.iter().map(|r| r.weather_lat).collect();
        let weather_lngs: Vec<f64> = records.iter().map(|r| r.weather_lng).collect();

        let measurement_rows = records
            .iter()
            .map(|r| {
                u32::try_from(r.measurement_row).map_err(|_| {
                    EnrichmentError::InvalidFormat(format!(
                        "Measurement row {} exceeds the supported range",
                        r.measurement_row
                    ))
                })
            })
            .collect::<Result<Vec<u32>>>()?;
        let measurement_rows = UInt32Array::from(measurement_rows);

        let ids: Vec<Option<u64>> = records.iter().map(|r| r.franchise.id).collect();
        let franchise_ids: Vec<u64> = records.iter().map(|r| r.franchise.franchise_id).collect();
        let franchise_names: Vec<&str> = records
            .iter()
            .map(|r| r.franchise.franchise_name.as_str())
            .collect();
        let restaurant_franchise_ids: Vec<Option<u64>> = records
            .iter()
            .map(|r| r.franchise.restaurant_franchise_id)
            .collect();
        let countries: Vec<&str> = records.iter().map(|r| r.franchise.country.as_str()).collect();
        let cities: Vec<&str> = records.iter().map(|r| r.franchise.city.as_str()).collect();
        let restaurant_lats: Vec<f64> = records.iter().map(|r| r.restaurant_lat).collect();
        let restaurant_lngs: Vec<f64> = records.iter().map(|r| r.restaurant_lng).collect();

        let mut columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(geohashes)),
            Arc::new(Float64Array::from(weather_lats)),
            Arc::new(Float64Array::from(weather_lngs)),
        ];

        for column in dataset.measurements.columns() {
            columns.push(take(column.as_ref(), &measurement_rows, None)?);
        }

        columns.extend([
            Arc::new(UInt64Array::from(ids)) as ArrayRef,
            Arc::new(UInt64Array::from(franchise_ids)),
            Arc::new(StringArray::from(franchise_names)),
            Arc::new(UInt64Array::from(restaurant_franchise_ids)),
            Arc::new(StringArray::from(countries)),
            Arc::new(StringArray::from(cities)),
            Arc::new(Float64Array::from(restaurant_lats)),
            Arc::new(Float64Array::from(restaurant_lngs)),
        ]);

        Ok(RecordBatch::try_new(schema, columns)?)
    }
}

impl Default for PartitionedParquetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSummary {
    pub path: PathBuf,
    pub partitions: usize,
    pub rows: usize,
}

impl OutputSummary {
    pub fn summary(&self) -> String {
        format!(
            "Enriched output summary:\n\
            - Location: {}\n\
            - Partitions: {}\n\
            - Rows: {}",
            self.path.display(),
            self.partitions,
            self.rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EnrichedRecord, Franchise, SpatialBucket};
    use arrow::array::Array;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
    use tempfile::TempDir;

    fn measurements() -> RecordBatch {
        let schema = Arc::new(Schema::new(vec![
            Field::new("avg_tmpr_c", DataType::Float64, true),
            Field::new("wthr_date", DataType::Utf8, true),
        ]));
        RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Float64Array::from(vec![18.5, 19.0, 21.0])),
                Arc::new(StringArray::from(vec!["2023-05-01", "2023-05-02", "2023-05-01"])),
            ],
        )
        .unwrap()
    }

    fn enriched(day: i32, row: usize, franchise_id: u64) -> EnrichedRecord {
        EnrichedRecord {
            geohash: SpatialBucket::new("dr5r".to_string()),
            weather_lat: 40.7,
            weather_lng: -74.0,
            year: 2023,
            month: 5,
            day,
            measurement_row: row,
            franchise: Arc::new(Franchise {
                id: None,
                franchise_id,
                franchise_name: "Savoria".to_string(),
                restaurant_franchise_id: Some(3),
                country: "US".to_string(),
                city: "New York".to_string(),
            }),
            restaurant_lat: 40.71,
            restaurant_lng: -74.01,
        }
    }

    fn read_back(path: &Path) -> RecordBatch {
        let file = File::open(path).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();
        arrow::compute::concat_batches(&batches[0].schema(), &batches).unwrap()
    }

    #[test]
    fn test_write_partitioned_layout() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = temp_dir.path().join("df_enriched_20230501000000");
        let dataset = EnrichedDataset::new(
            vec![enriched(1, 0, 10), enriched(2, 1, 10), enriched(1, 2, 20)],
            measurements(),
        );

        let summary = PartitionedParquetWriter::new().write(&dataset, &output)?;

        assert_eq!(summary.partitions, 2);
        assert_eq!(summary.rows, 3);
        assert!(output.join("_SUCCESS").exists());

        let day_one = read_back(&output.join("year=2023/month=5/day=1/part-00000.parquet"));
        assert_eq!(day_one.num_rows(), 2);

        let schema = day_one.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(
            names,
            vec![
                "geohash",
                "weather_lat",
                "weather_lng",
                "avg_tmpr_c",
                "wthr_date",
                "id",
                "franchise_id",
                "franchise_name",
                "restaurant_franchise_id",
                "country",
                "city",
                "restaurant_lat",
                "restaurant_lng",
            ]
        );

        let temps = day_one
            .column_by_name("avg_tmpr_c")
            .unwrap()
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(temps.value(0), 18.5);
        assert_eq!(temps.value(1), 21.0);

        let ids = day_one
            .column_by_name("id")
            .unwrap()
            .as_any()
            .downcast_ref::<UInt64Array>()
            .unwrap();
        assert!(ids.is_null(0));

        let day_two = read_back(&output.join("year=2023/month=5/day=2/part-00000.parquet"));
        assert_eq!(day_two.num_rows(), 1);
        Ok(())
    }

    #[test]
    fn test_refuses_existing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let dataset = EnrichedDataset::new(vec![enriched(1, 0, 10)], measurements());

        let result = PartitionedParquetWriter::new().write(&dataset, temp_dir.path());
        assert!(matches!(result, Err(EnrichmentError::OutputExists(_))));
    }

    #[test]
    fn test_second_write_to_same_directory_fails() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = temp_dir.path().join("runs").join("df_enriched_20230501000000");
        let dataset = EnrichedDataset::new(vec![enriched(1, 0, 10)], measurements());
        let writer = PartitionedParquetWriter::new();

        // Missing parents are created for the first run
        writer.write(&dataset, &output)?;
        assert!(output.join(SUCCESS_MARKER).exists());

        let result = writer.write(&dataset, &output);
        assert!(matches!(
            result,
            Err(EnrichmentError::OutputExists(ref path)) if path == &output
        ));
        Ok(())
    }

    #[test]
    fn test_empty_dataset_writes_marker_only() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let output = temp_dir.path().join("out");
        let dataset = EnrichedDataset::new(vec![], measurements());

        let summary = PartitionedParquetWriter::new().write(&dataset, &output)?;

        assert_eq!(summary.partitions, 0);
        assert!(output.join("_SUCCESS").exists());
        Ok(())
    }

    #[test]
    fn test_different_compressions() -> Result<()> {
        for compression in ["snappy", "gzip", "lz4", "zstd", "none"] {
            let temp_dir = TempDir::new()?;
            let writer = PartitionedParquetWriter::new().with_compression(compression)?;
            let dataset = EnrichedDataset::new(vec![enriched(1, 0, 10)], measurements());

            let result = writer.write(&dataset, &temp_dir.path().join("out"));
            assert!(result.is_ok(), "Failed with compression: {}", compression);
        }

        assert!(PartitionedParquetWriter::new().with_compression("brotli9000").is_err());
        Ok(())
    }
}
