/// Input locations used when the binary is invoked without flags
pub const DEFAULT_RESTAURANT_DIR: &str = "raw/restaurant_csv";
pub const DEFAULT_WEATHER_DIR: &str = "raw/weather/datasets";
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";
pub const DEFAULT_OUTPUT_ROOT: &str = ".";

/// Credential file layout
pub const CREDENTIAL_SECTION: &str = "DEFAULT";
pub const CREDENTIAL_KEY: &str = "OpenCageApiKey";

/// Geocoding service
pub const OPENCAGE_ENDPOINT: &str = "https://api.opencagedata.com/geocode/v1/json";
pub const DEFAULT_GEOCODE_TIMEOUT_SECS: u64 = 30;

/// Geohash precision (characters); 4 gives cells of roughly 39km x 20km
pub const DEFAULT_GEOHASH_PRECISION: usize = 4;
pub const MAX_GEOHASH_PRECISION: usize = 12;

/// Weather input columns
pub const WEATHER_LAT_COLUMN: &str = "lat";
pub const WEATHER_LNG_COLUMN: &str = "lng";
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";

/// Output naming
pub const OUTPUT_DIR_PREFIX: &str = "df_enriched_";
pub const OUTPUT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
pub const PART_FILE_NAME: &str = "part-00000.parquet";
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Processing defaults
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const READ_BATCH_SIZE: usize = 8192;

/// Parquet compression options
pub const COMPRESSION_SNAPPY: &str = "snappy";
pub const COMPRESSION_GZIP: &str = "gzip";
pub const COMPRESSION_LZ4: &str = "lz4";
pub const COMPRESSION_ZSTD: &str = "zstd";
pub const COMPRESSION_NONE: &str = "none";
