//! JSON result writer.
//!
//! Writes TransactionAnalysisResult structs to JSON files with proper formatting.

use super::validate_path;
use crate::analysis::TransactionAnalysisResult;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write an analysis result to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `result` - Analysis result to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
pub fn write_result(
    result: &TransactionAnalysisResult,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing analysis to: {}", output_path.display());

    validate_path(output_path)?;

    // Create parent directories if needed
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directories: {}", parent.display());
            std::fs::create_dir_all(parent).map_err(|e| {
                OutputError::InvalidPath(format!(
                    "Cannot create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }
    }

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, result).map_err(OutputError::SerializationFailed)?;

    info!(
        "Analysis written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Serialize a result to a pretty JSON string
pub fn result_to_string(result: &TransactionAnalysisResult) -> Result<String, OutputError> {
    serde_json::to_string_pretty(result).map_err(OutputError::SerializationFailed)
}

/// Calculate file size in bytes
///
/// **Private** - internal utility
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

/// Read an analysis result from a JSON file
///
/// **Public** - used by validation and tests
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_result(input_path: impl AsRef<Path>) -> Result<TransactionAnalysisResult, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading analysis from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;

    let result: TransactionAnalysisResult =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!(
        "Analysis loaded: version {}, tx {}",
        result.version, result.tx_hash
    );

    Ok(result)
}
