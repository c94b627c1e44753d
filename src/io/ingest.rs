//! CSV ingest and validation.
//!
//! This module turns a heterogeneous WHO-style export into a `RawTable` that
//! is safe to align.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level validation** (skip bad rows, but report what happened)
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no reconstruction logic here

use std::collections::HashMap;
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::align::year_spec::parse_year_spec;
use crate::domain::{AlignConfig, CellValue, RawObservation, RawTable};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RowError {
    pub line: usize,
    pub country: Option<String>,
    pub message: String,
}

/// Ingest output: the validated table + audit counters.
#[derive(Debug, Clone)]
pub struct IngestedTable {
    pub table: RawTable,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load and validate the raw observation table.
pub fn load_raw_table(path: &Path, config: &AlignConfig) -> Result<IngestedTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);

    let country_idx = require_column(&header_map, &config.country_column)?;
    let year_idx = require_column(&header_map, &config.year_column)?;

    // Every remaining column is a metric, in file order.
    let mut metric_columns = Vec::new();
    let mut metric_indices = Vec::new();
    for (idx, name) in headers.iter().enumerate() {
        if idx == country_idx || idx == year_idx {
            continue;
        }
        metric_columns.push(clean_header_name(name));
        metric_indices.push(idx);
    }
    if metric_columns.is_empty() {
        return Err(AppError::new(
            2,
            "Input has no metric columns beyond the country and year columns.",
        ));
    }

    let year_header = clean_header_name(&headers[year_idx]);

    let mut observations = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    country: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        let country = field(&record, country_idx).trim().to_string();
        if country.is_empty() {
            row_errors.push(RowError {
                line,
                country: None,
                message: "Missing country value.".to_string(),
            });
            continue;
        }

        let year = match parse_year_spec(field(&record, year_idx), &year_header) {
            Ok(Some(year)) => year,
            Ok(None) => {
                row_errors.push(RowError {
                    line,
                    country: Some(country),
                    message: "No reporting year (skipped).".to_string(),
                });
                continue;
            }
            Err(message) => {
                row_errors.push(RowError {
                    line,
                    country: Some(country),
                    message,
                });
                continue;
            }
        };

        let values: Vec<CellValue> = metric_indices
            .iter()
            .map(|&idx| CellValue::parse(field(&record, idx)))
            .collect();

        observations.push(RawObservation {
            line,
            country,
            year,
            values,
        });
    }

    let rows_used = observations.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            "No valid rows remain after parsing/validation.",
        ));
    }

    Ok(IngestedTable {
        table: RawTable {
            country_column: clean_header_name(&headers[country_idx]),
            year_column: year_header,
            metric_columns,
            observations,
        },
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Collect the distinct country names from any CSV with a country column.
pub fn read_country_set(path: &Path, country_column: &str) -> Result<BTreeSet<String>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);
    let country_idx = require_column(&header_map, country_column)?;

    let mut countries = BTreeSet::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error: {e}")))?;
        let name = field(&record, country_idx).trim();
        if !name.is_empty() {
            countries.insert(name.to_string());
        }
    }
    Ok(countries)
}

/// Read one (country, metric) numeric series back out of an aligned CSV.
pub fn read_aligned_series(
    path: &Path,
    country: &str,
    metric: &str,
    country_column: &str,
    year_column: &str,
) -> Result<Vec<(i32, f64)>, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let country_idx = require_column(&header_map, country_column)?;
    let year_idx = require_column(&header_map, year_column)?;
    let metric_idx = require_column(&header_map, metric)?;

    let mut series = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error: {e}")))?;
        if field(&record, country_idx).trim() != country {
            continue;
        }
        let Ok(year) = field(&record, year_idx).trim().parse::<i32>() else {
            continue;
        };
        if let Some(value) = CellValue::parse(field(&record, metric_idx)).as_number() {
            series.push((year, value));
        }
    }

    if series.is_empty() {
        return Err(AppError::new(
            3,
            format!("No numeric values for country '{country}', metric '{metric}'."),
        ));
    }
    series.sort_by_key(|(year, _)| *year);
    Ok(series)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    clean_header_name(name).to_ascii_lowercase()
}

fn clean_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on
    // the first header. If we don't strip it, schema validation will
    // incorrectly report missing columns.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn require_column(header_map: &HashMap<String, usize>, name: &str) -> Result<usize, AppError> {
    header_map
        .get(&normalize_header_name(name))
        .copied()
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

fn field<'a>(record: &'a StringRecord, idx: usize) -> &'a str {
    record.get(idx).unwrap_or("")
}
