use crate::error::{EnrichmentError, Result};
use crate::utils::constants::{OUTPUT_DIR_PREFIX, OUTPUT_TIMESTAMP_FORMAT};
use chrono::{DateTime, Local, TimeZone};
use std::path::{Path, PathBuf};

/// Generate the run output directory: {root}/df_enriched_{YYYYMMDDHHMMSS}
pub fn generate_output_dir(root: &Path) -> PathBuf {
    output_dir_for(root, &Local::now())
}

pub fn output_dir_for<Tz: TimeZone>(root: &Path, at: &DateTime<Tz>) -> PathBuf
where
    Tz::Offset: std::fmt::Display,
{
    root.join(format!(
        "{}{}",
        OUTPUT_DIR_PREFIX,
        at.format(OUTPUT_TIMESTAMP_FORMAT)
    ))
}

/// Collect data files with the given extension under `path`, sorted by path.
///
/// A file path is returned as-is. Entries starting with `.` or `_` are
/// bookkeeping files (checksums, success markers) and are skipped.
pub fn collect_data_files(path: &Path, extension: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        return Err(EnrichmentError::MissingData(format!(
            "Input path does not exist: {}",
            path.display()
        )));
    }

    let mut files = Vec::new();
    visit(path, extension, recursive, &mut files)?;
    files.sort();
    Ok(files)
}

fn visit(dir: &Path, extension: &str, recursive: bool, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        let hidden = path
            .file_name()
            .map(|name| name.to_string_lossy())
            .is_some_and(|name| name.starts_with('.') || name.starts_with('_'));
        if hidden {
            continue;
        }

        if path.is_dir() {
            if recursive {
                visit(&path, extension, recursive, files)?;
            }
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }

    Ok(())
}
