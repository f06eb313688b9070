use crate::error::{EnrichmentError, Result};
use crate::models::{WeatherObservations, WeatherRecord};
use crate::utils::collect_data_files;
use crate::utils::constants::{
    DAY_COLUMN, MONTH_COLUMN, READ_BATCH_SIZE, WEATHER_LAT_COLUMN, WEATHER_LNG_COLUMN, YEAR_COLUMN,
};
use arrow::array::{Array, ArrayRef, Float64Array, Int32Array};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

const CORE_COLUMNS: [&str; 5] = [
    WEATHER_LAT_COLUMN,
    WEATHER_LNG_COLUMN,
    YEAR_COLUMN,
    MONTH_COLUMN,
    DAY_COLUMN,
];

pub struct WeatherReader;

impl WeatherReader {
    pub fn new() -> Self {
        Self
    }

    /// Read weather observations from a Parquet file or a directory tree of them.
    ///
    /// `year`/`month`/`day` come from the file when present, otherwise from
    /// `key=value` directory segments. Every column other than the coordinates
    /// and date parts is a measurement and is kept as-is.
    pub fn read_observations(&self, path: &Path) -> Result<WeatherObservations> {
        let files = collect_data_files(path, "parquet", true)?;
        if files.is_empty() {
            return Err(EnrichmentError::MissingData(format!(
                "No Parquet files found in {}",
                path.display()
            )));
        }

        let mut records = Vec::new();
        let mut measurement_batches = Vec::new();
        let mut measurement_schema: Option<SchemaRef> = None;
        let mut row_offset = 0usize;
        let mut dropped = 0usize;

        for file in &files {
            let partition = partition_values(path, file)?;
            let reader = ParquetRecordBatchReaderBuilder::try_new(File::open(file)?)?
                .with_batch_size(READ_BATCH_SIZE)
                .build()?;

            for batch_result in reader {
                let batch = batch_result?;
                let core = CoreColumns::extract(&batch, &partition, file)?;

                for row in 0..batch.num_rows() {
                    match core.record(row, row_offset + row) {
                        Some(record) => records.push(record),
                        None => dropped += 1,
                    }
                }

                let schema = measurement_schema
                    .get_or_insert_with(|| measurement_schema_of(&batch.schema()))
                    .clone();
                measurement_batches.push(project_measurements(&batch, &schema, file)?);
                row_offset += batch.num_rows();
            }

            debug!(file = %file.display(), rows = row_offset, "read weather file");
        }

        if dropped > 0 {
            warn!(
                "Dropped {} weather rows with null coordinates or date parts",
                dropped
            );
        }

        let schema = measurement_schema.unwrap_or_else(|| Arc::new(Schema::empty()));
        let measurements = concat_batches(&schema, &measurement_batches)?;

        info!(
            files = files.len(),
            observations = records.len(),
            measurement_columns = schema.fields().len(),
            "read weather observations"
        );

        Ok(WeatherObservations::new(records, measurements))
    }
}

impl Default for WeatherReader {
    fn default() -> Self {
        Self::new()
    }
}

enum DatePart {
    Column(Int32Array),
    Constant(i32),
}

impl DatePart {
    fn value(&self, row: usize) -> Option<i32> {
        match self {
            DatePart::Column(array) if array.is_null(row) => None,
            DatePart::Column(array) => Some(array.value(row)),
            DatePart::Constant(value) => Some(*value),
        }
    }
}

struct CoreColumns {
    latitude: Float64Array,
    longitude: Float64Array,
    year: DatePart,
    month: DatePart,
    day: DatePart,
}

impl CoreColumns {
    fn extract(batch: &RecordBatch, partition: &HashMap<String, i32>, file: &Path) -> Result<Self> {
        Ok(Self {
            latitude: float_column(batch, WEATHER_LAT_COLUMN, file)?,
            longitude: float_column(batch, WEATHER_LNG_COLUMN, file)?,
            year: date_part(batch, YEAR_COLUMN, partition, file)?,
            month: date_part(batch, MONTH_COLUMN, partition, file)?,
            day: date_part(batch, DAY_COLUMN, partition, file)?,
        })
    }

    fn record(&self, row: usize, measurement_row: usize) -> Option<WeatherRecord> {
        if self.latitude.is_null(row) || self.longitude.is_null(row) {
            return None;
        }

        Some(WeatherRecord::new(
            self.latitude.value(row),
            self.longitude.value(row),
            self.year.value(row)?,
            self.month.value(row)?,
            self.day.value(row)?,
            measurement_row,
        ))
    }
}

fn missing_column(column: &str, file: &Path) -> EnrichmentError {
    EnrichmentError::MissingColumn {
        column: column.to_string(),
        source_file: file.display().to_string(),
    }
}

fn float_column(batch: &RecordBatch, name: &str, file: &Path) -> Result<Float64Array> {
    let column = batch
        .column_by_name(name)
        .ok_or_else(|| missing_column(name, file))?;
    let converted = cast(column, &DataType::Float64)?;

    converted
        .as_any()
        .downcast_ref::<Float64Array>()
        .cloned()
        .ok_or_else(|| EnrichmentError::InvalidFormat(format!("Invalid {} column type", name)))
}

fn date_part(
    batch: &RecordBatch,
    name: &str,
    partition: &HashMap<String, i32>,
    file: &Path,
) -> Result<DatePart> {
    if let Some(column) = batch.column_by_name(name) {
        let converted = cast(column, &DataType::Int32)?;
        let array = converted
            .as_any()
            .downcast_ref::<Int32Array>()
            .cloned()
            .ok_or_else(|| {
                EnrichmentError::InvalidFormat(format!("Invalid {} column type", name))
            })?;
        return Ok(DatePart::Column(array));
    }

    partition
        .get(name)
        .map(|value| DatePart::Constant(*value))
        .ok_or_else(|| missing_column(name, file))
}

/// Date parts encoded in hive-style directory names between `root` and `file`
fn partition_values(root: &Path, file: &Path) -> Result<HashMap<String, i32>> {
    let mut values = HashMap::new();
    let relative = file.strip_prefix(root).unwrap_or(file);
    let Some(parent) = relative.parent() else {
        return Ok(values);
    };

    for component in parent.components() {
        let segment = component.as_os_str().to_string_lossy();
        let Some((key, value)) = segment.split_once('=') else {
            continue;
        };

        let key = key.to_lowercase();
        if [YEAR_COLUMN, MONTH_COLUMN, DAY_COLUMN].contains(&key.as_str()) {
            let parsed = value.parse::<i32>().map_err(|_| {
                EnrichmentError::InvalidFormat(format!(
                    "Invalid partition value '{}' in {}",
                    segment,
                    file.display()
                ))
            })?;
            values.insert(key, parsed);
        }
    }

    Ok(values)
}

fn measurement_schema_of(schema: &Schema) -> SchemaRef {
    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .filter(|field| !CORE_COLUMNS.contains(&field.name().as_str()))
        .map(|field| field.as_ref().clone().with_nullable(true))
        .collect();

    Arc::new(Schema::new(fields))
}

/// Project a batch onto the measurement schema fixed by the first file
fn project_measurements(
    batch: &RecordBatch,
    schema: &SchemaRef,
    file: &Path,
) -> Result<RecordBatch> {
    let unexpected: Vec<String> = batch
        .schema()
        .fields()
        .iter()
        .map(|field| field.name().clone())
        .filter(|name| !CORE_COLUMNS.contains(&name.as_str()))
        .filter(|name| schema.field_with_name(name).is_err())
        .collect();

    if !unexpected.is_empty() {
        return Err(EnrichmentError::InvalidFormat(format!(
            "{} has measurement columns not present in earlier files: {}",
            file.display(),
            unexpected.join(", ")
        )));
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let column = batch
                .column_by_name(field.name())
                .ok_or_else(|| missing_column(field.name(), file))?;

            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                Ok(cast(column, field.data_type())?)
            }
        })
        .collect::<Result<Vec<ArrayRef>>>()?;

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        schema.clone(),
        columns,
        &options,
    )?)
}
