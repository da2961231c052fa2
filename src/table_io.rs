//! CSV input and output for the event, perimeter and result tables.

use crate::error::EnrichError;
use log::info;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Reads a headed CSV file with every column kept as a string.
pub fn read_csv_as_strings(path: impl AsRef<Path>) -> Result<DataFrame, EnrichError> {
    let path = path.as_ref();
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .and_then(|reader| reader.finish())
        .map_err(|e| EnrichError::ReadCsv(path.to_path_buf(), e))
}

/// Writes `frame` to `path` with a header row, creating parent directories as needed.
pub fn write_csv(frame: &mut DataFrame, path: impl AsRef<Path>) -> Result<(), EnrichError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| EnrichError::Io(parent.to_path_buf(), e))?;
    }
    let mut file = File::create(path).map_err(|e| EnrichError::Io(path.to_path_buf(), e))?;
    CsvWriter::new(&mut file).include_header(true).finish(frame)?;
    info!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(())
}
