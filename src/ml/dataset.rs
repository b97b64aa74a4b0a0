use crate::error::{AppError, Result};
use crate::models::DatasetRow;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

/// One CSV record; every field may be absent
#[derive(Debug, Deserialize)]
struct RawRecord {
    text: Option<String>,
    location: Option<String>,
    state: Option<String>,
    department: Option<String>,
}

impl RawRecord {
    /// Keep the row only when all four fields are present and non-blank
    fn complete(self) -> Option<DatasetRow> {
        fn field(value: Option<String>) -> Option<String> {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        }

        Some(DatasetRow {
            text: field(self.text)?,
            location: field(self.location)?,
            state: field(self.state)?,
            department: field(self.department)?,
        })
    }
}

/// Load the labelled dataset from a CSV file
pub fn load_dataset(path: &Path) -> Result<Vec<DatasetRow>> {
    if !path.exists() {
        return Err(AppError::Dataset(format!(
            "dataset not found at {}",
            path.display()
        )));
    }

    let file = std::fs::File::open(path)?;
    let rows = read_dataset(file)?;

    info!("Loaded {} dataset rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse dataset rows from any CSV reader, dropping incomplete rows
pub fn read_dataset<R: Read>(reader: R) -> Result<Vec<DatasetRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    for required in ["text", "location", "state", "department"] {
        if !headers.iter().any(|h| h == required) {
            return Err(AppError::Dataset(format!(
                "dataset is missing required column '{}'",
                required
            )));
        }
    }

    let mut rows = Vec::new();
    let mut dropped = 0usize;

    for record in csv_reader.deserialize::<RawRecord>() {
        match record?.complete() {
            Some(row) => rows.push(row),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!("Dropped {} dataset rows with missing fields", dropped);
    }
    debug!("Parsed {} complete dataset rows", rows.len());

    if rows.is_empty() {
        return Err(AppError::Dataset(
            "dataset contains no complete rows".to_string(),
        ));
    }

    Ok(rows)
}
