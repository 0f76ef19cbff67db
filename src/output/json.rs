//! JSON dataset output writer.
//!
//! Writes the aggregated dataset as pretty JSON for presentation tools
//! (charts, dashboards) that consume it as their only input.

use super::prepare_output_path;
use crate::parser::schema::Dataset;
use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Write a dataset to a JSON file
///
/// **Public** - main entry point for JSON output
///
/// # Arguments
/// * `dataset` - Aggregated dataset to write
/// * `output_path` - Path to output JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - I/O error during write
/// * `OutputError::SerializationFailed` - JSON serialization error
/// * `OutputError::InvalidPath` - Path cannot be created or is invalid
///
/// # Example
/// ```ignore
/// run.execute()?;
/// write_dataset(&run.dataset, "summary.json")?;
/// ```
pub fn write_dataset(dataset: &Dataset, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    info!("Writing dataset to: {}", output_path.display());

    prepare_output_path(output_path)?;

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, dataset).map_err(OutputError::SerializationFailed)?;

    info!(
        "Dataset written successfully ({} bytes)",
        calculate_file_size(output_path)
    );

    Ok(())
}

/// Read a dataset from a JSON file
///
/// # Errors
/// * `OutputError::WriteFailed` - File read error (reusing WriteFailed for I/O)
/// * `OutputError::SerializationFailed` - JSON parse error
pub fn read_dataset(input_path: impl AsRef<Path>) -> Result<Dataset, OutputError> {
    let input_path = input_path.as_ref();

    debug!("Reading dataset from: {}", input_path.display());

    let file = File::open(input_path).map_err(OutputError::WriteFailed)?;
    let dataset: Dataset =
        serde_json::from_reader(file).map_err(OutputError::SerializationFailed)?;

    debug!("Dataset loaded: {} implementations", dataset.len());

    Ok(dataset)
}

/// Calculate file size in bytes
fn calculate_file_size(path: &Path) -> u64 {
    std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::{ImplementationRecord, TimingStage};
    use pretty_assertions::assert_eq;
    use tempfile::NamedTempFile;

    fn create_test_dataset() -> Dataset {
        let mut record = ImplementationRecord::new("perf_opt1");
        record.resources.insert("LUT".to_string(), 1234);
        record.timing.insert(TimingStage::Target, 3.0);
        record.latency = Some(4096);

        let mut dataset = Dataset::new();
        dataset.records.insert("perf_opt1".to_string(), record);
        dataset
            .records
            .insert("origin".to_string(), ImplementationRecord::new("origin"));
        dataset
    }

    #[test]
    fn test_write_and_read_dataset() {
        let dataset = create_test_dataset();
        let temp_file = NamedTempFile::new().unwrap();

        write_dataset(&dataset, temp_file.path()).unwrap();
        let loaded = read_dataset(temp_file.path()).unwrap();

        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let temp_dir = tempfile::tempdir().unwrap();
        let nested_path = temp_dir.path().join("nested/dirs/summary.json");

        write_dataset(&create_test_dataset(), &nested_path).unwrap();

        assert!(nested_path.exists());
    }

    #[test]
    fn test_write_to_directory_fails() {
        let temp_dir = tempfile::tempdir().unwrap();
        let result = write_dataset(&create_test_dataset(), temp_dir.path());
        assert!(matches!(result, Err(OutputError::InvalidPath(_))));
    }

    #[test]
    fn test_read_invalid_json() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not json").unwrap();
        assert!(matches!(
            read_dataset(temp_file.path()),
            Err(OutputError::SerializationFailed(_))
        ));
    }
}
