//! Export the aligned dataset and the machine-readable run summary.
//!
//! The CSV export is meant to be easy to consume in spreadsheets or
//! downstream scripts; the JSON summary carries the audit trail (dropped
//! rows, per-country stats) for pipelines that want to alert on data quality.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::align::aligner::AlignAudit;
use crate::domain::{AlignConfig, AlignedDataset, ExponentScope, OptimizerMode};
use crate::error::AppError;
use crate::io::ingest::RowError;

/// Write the aligned dataset as CSV.
///
/// Country names can contain commas, so this goes through a real CSV writer
/// rather than naive string joining.
pub fn write_aligned_csv(path: &Path, dataset: &AlignedDataset) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create output CSV '{}': {e}", path.display()),
        )
    })?;

    writer
        .write_record(&dataset.header)
        .map_err(|e| AppError::new(4, format!("Failed to write CSV header: {e}")))?;

    for row in &dataset.rows {
        let mut record = Vec::with_capacity(dataset.header.len());
        record.push(row.country.clone());
        record.push(row.year.to_string());
        for value in &row.values {
            record.push(value.to_field());
        }
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(4, format!("Failed to write CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush output CSV: {e}")))?;
    Ok(())
}

/// The portable JSON representation of one alignment run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummaryFile {
    pub tool: String,
    pub generated: String,
    pub input: String,
    pub seed: u64,
    pub optimizer: OptimizerMode,
    pub exponent_scope: ExponentScope,
    pub initial_exponent: f64,
    pub iterations: usize,
    pub rows_read: usize,
    pub rows_used: usize,
    pub rows_dropped: usize,
    pub dropped: Vec<RowError>,
    pub audit: AlignAudit,
}

impl RunSummaryFile {
    pub fn new(
        config: &AlignConfig,
        rows_read: usize,
        rows_used: usize,
        dropped: &[RowError],
        audit: &AlignAudit,
    ) -> Self {
        Self {
            tool: "hsa".to_string(),
            generated: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input: config.input.display().to_string(),
            seed: config.seed,
            optimizer: config.optimizer,
            exponent_scope: config.exponent_scope,
            initial_exponent: config.initial_exponent,
            iterations: config.iterations,
            rows_read,
            rows_used,
            rows_dropped: dropped.len(),
            dropped: dropped.to_vec(),
            audit: audit.clone(),
        }
    }
}

/// Write the run summary JSON.
pub fn write_summary_json(path: &Path, summary: &RunSummaryFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create summary JSON '{}': {e}", path.display()),
        )
    })?;
    serde_json::to_writer_pretty(file, summary)
        .map_err(|e| AppError::new(4, format!("Failed to write summary JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AlignedRow, CellValue};

    #[test]
    fn csv_round_trips_commas_in_country_names() {
        let dataset = AlignedDataset {
            header: vec![
                "Countries, territories and areas".to_string(),
                "Year".to_string(),
                "Metric".to_string(),
            ],
            rows: vec![AlignedRow {
                country: "occupied Palestinian territory, including east Jerusalem".to_string(),
                year: 2010,
                values: vec![CellValue::Number(12.5)],
            }],
        };

        let path = std::env::temp_dir().join("hs_align_export_commas.csv");
        write_aligned_csv(&path, &dataset).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let records: Vec<csv::StringRecord> =
            reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].get(0).unwrap(),
            "occupied Palestinian territory, including east Jerusalem"
        );
        assert_eq!(records[0].get(2).unwrap(), "12.5");
    }

    #[test]
    fn missing_cells_export_as_empty_fields() {
        let dataset = AlignedDataset {
            header: vec!["C".to_string(), "Year".to_string(), "M".to_string()],
            rows: vec![AlignedRow {
                country: "Chad".to_string(),
                year: 2001,
                values: vec![CellValue::Missing],
            }],
        };

        let path = std::env::temp_dir().join("hs_align_export_missing.csv");
        write_aligned_csv(&path, &dataset).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.lines().any(|l| l == "Chad,2001,"));
    }
}
