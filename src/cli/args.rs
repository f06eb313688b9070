use crate::utils::constants::{
    COMPRESSION_SNAPPY, DEFAULT_CONFIG_FILE, DEFAULT_GEOCODE_TIMEOUT_SECS,
    DEFAULT_GEOHASH_PRECISION, DEFAULT_OUTPUT_ROOT, DEFAULT_RESTAURANT_DIR, DEFAULT_WEATHER_DIR,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "weather-enrich")]
#[command(about = "Enrich restaurant locations with weather observations from the same geohash cell")]
#[command(version)]
pub struct Cli {
    #[arg(long, default_value = DEFAULT_RESTAURANT_DIR, help = "Directory of restaurant CSV files")]
    pub restaurants: PathBuf,

    #[arg(long, default_value = DEFAULT_WEATHER_DIR, help = "Directory of weather Parquet files")]
    pub weather: PathBuf,

    #[arg(
        long,
        default_value = DEFAULT_CONFIG_FILE,
        help = "INI file holding the geocoding API key"
    )]
    pub config: PathBuf,

    #[arg(
        long,
        default_value = DEFAULT_OUTPUT_ROOT,
        help = "Directory in which df_enriched_{timestamp} is created"
    )]
    pub output_root: PathBuf,

    #[arg(
        long,
        default_value_t = DEFAULT_GEOHASH_PRECISION,
        help = "Geohash length used as join key"
    )]
    pub precision: usize,

    #[arg(short, long, default_value = COMPRESSION_SNAPPY)]
    pub compression: String,

    #[arg(long, default_value_t = num_cpus::get())]
    pub max_workers: usize,

    #[arg(
        long,
        default_value_t = DEFAULT_GEOCODE_TIMEOUT_SECS,
        help = "Per-request geocoding timeout"
    )]
    pub timeout_secs: u64,

    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}
