use crate::cli::args::Cli;
use crate::error::{EnrichmentError, Result};
use crate::geocoding::{load_api_key, OpenCageClient};
use crate::processors::EnrichmentPipeline;
use crate::utils::generate_output_dir;
use std::fs::File;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, Level};

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    // The credential is required before any row is read
    let api_key = load_api_key(&cli.config)?;
    let lookup = Arc::new(OpenCageClient::new(
        api_key,
        Duration::from_secs(cli.timeout_secs),
    ));

    let output_dir = generate_output_dir(&cli.output_root);
    info!(
        output = %output_dir.display(),
        workers = cli.max_workers,
        precision = cli.precision,
        "starting enrichment run"
    );

    let pipeline = EnrichmentPipeline::new(cli.max_workers)
        .with_precision(cli.precision)
        .with_compression(&cli.compression);

    let summary = pipeline
        .run(&cli.restaurants, &cli.weather, &output_dir, lookup)
        .await?;

    info!(
        rows = summary.rows,
        partitions = summary.partitions,
        "enrichment complete"
    );
    Ok(())
}

/// INFO by default, DEBUG when verbose; plain text when writing to a file
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false);

    let result = match log_file {
        Some(path) => {
            let file = File::create(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
        }
        None => builder.try_init(),
    };

    result.map_err(|e| EnrichmentError::Config(format!("Failed to initialise logging: {}", e)))
}
