pub mod constants;
pub mod filename;
pub mod geohash;
pub mod progress;

pub use constants::*;
pub use filename::{collect_data_files, generate_output_dir};
pub use progress::ProgressReporter;
