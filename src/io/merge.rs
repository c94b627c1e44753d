//! Merge multiple source exports into one raw table.
//!
//! The mortality data arrives as several per-indicator CSVs with identical
//! shapes (and unnamed leading columns), the nutrition data as one file. The
//! merge concatenates the mortality files (aligning columns by header name)
//! and then full-outer-joins the nutrition file on (country, year). No value
//! coercion happens here; the output is still a *raw* table for `align`.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::error::AppError;

/// A loosely-typed CSV table used only during merging.
#[derive(Debug, Clone)]
pub struct StringTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Counters for the merge report.
#[derive(Debug, Clone)]
pub struct MergeStats {
    pub source_files: usize,
    pub base_rows: usize,
    pub joined_rows: usize,
    pub matched_rows: usize,
    pub out_rows: usize,
}

/// Merge the mortality files and (optionally) the nutrition file, writing the
/// combined raw table to `out`.
pub fn merge_sources(
    mortality: &[impl AsRef<Path>],
    nutrition: Option<&Path>,
    out: &Path,
    country_column: &str,
    year_column: &str,
) -> Result<MergeStats, AppError> {
    if mortality.is_empty() {
        return Err(AppError::new(2, "At least one input CSV is required."));
    }

    let mut base: Option<StringTable> = None;
    for path in mortality {
        let table = read_string_table(path.as_ref(), country_column, year_column)?;
        base = Some(match base {
            None => table,
            Some(acc) => concat_tables(acc, table),
        });
    }
    let mut merged = base.unwrap_or(StringTable {
        headers: Vec::new(),
        rows: Vec::new(),
    });
    let base_rows = merged.rows.len();

    let mut joined_rows = 0usize;
    let mut matched_rows = 0usize;
    if let Some(nutrition_path) = nutrition {
        let nutrition_table = read_string_table(nutrition_path, country_column, year_column)?;
        joined_rows = nutrition_table.rows.len();
        let stats = outer_join(&mut merged, nutrition_table, country_column, year_column)?;
        matched_rows = stats;
    }

    write_string_table(out, &merged)?;

    Ok(MergeStats {
        source_files: mortality.len() + usize::from(nutrition.is_some()),
        base_rows,
        joined_rows,
        matched_rows,
        out_rows: merged.rows.len(),
    })
}

/// Read a CSV into strings, renaming unnamed leading columns.
///
/// Spreadsheet exports of the mortality data leave the first two headers
/// blank (or as "Unnamed: N"); positionally they are the country and year.
pub fn read_string_table(
    path: &Path,
    country_column: &str,
    year_column: &str,
) -> Result<StringTable, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display()))
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let raw_headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let mut headers: Vec<String> = raw_headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    for (idx, header) in headers.iter_mut().enumerate() {
        if header.is_empty() || header.starts_with("Unnamed:") {
            if idx == 0 {
                *header = country_column.to_string();
            } else if idx == 1 {
                *header = year_column.to_string();
            }
        }
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| AppError::new(2, format!("CSV parse error: {e}")))?;
        rows.push(record_to_row(&record, headers.len()));
    }

    Ok(StringTable { headers, rows })
}

fn record_to_row(record: &StringRecord, width: usize) -> Vec<String> {
    (0..width)
        .map(|idx| record.get(idx).unwrap_or("").to_string())
        .collect()
}

/// Concatenate two tables, aligning columns by header name.
///
/// Columns unique to either side are kept (first-seen order); absent cells
/// become empty fields.
fn concat_tables(mut acc: StringTable, other: StringTable) -> StringTable {
    let mut index: HashMap<String, usize> = acc
        .headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.clone(), idx))
        .collect();

    let mut mapping = Vec::with_capacity(other.headers.len());
    for name in &other.headers {
        let idx = *index.entry(name.clone()).or_insert_with(|| {
            acc.headers.push(name.clone());
            acc.headers.len() - 1
        });
        mapping.push(idx);
    }

    let width = acc.headers.len();
    for row in &mut acc.rows {
        row.resize(width, String::new());
    }
    for row in other.rows {
        let mut out = vec![String::new(); width];
        for (src, &dst) in row.into_iter().zip(mapping.iter()) {
            out[dst] = src;
        }
        acc.rows.push(out);
    }

    acc
}

/// Full outer join on (country, year). Returns the number of matched rows.
fn outer_join(
    base: &mut StringTable,
    other: StringTable,
    country_column: &str,
    year_column: &str,
) -> Result<usize, AppError> {
    let base_country = column_index(&base.headers, country_column)?;
    let base_year = column_index(&base.headers, year_column)?;
    let other_country = column_index(&other.headers, country_column)?;
    let other_year = column_index(&other.headers, year_column)?;

    // Columns carried over from the joined table (everything but the key).
    let carried: Vec<usize> = (0..other.headers.len())
        .filter(|&idx| idx != other_country && idx != other_year)
        .collect();
    for &idx in &carried {
        base.headers.push(other.headers[idx].clone());
    }

    let width = base.headers.len();
    let appended = carried.len();

    let mut lookup: HashMap<(String, String), Vec<String>> = HashMap::new();
    let mut key_order: Vec<(String, String)> = Vec::new();
    for row in other.rows {
        let key = (
            row.get(other_country).cloned().unwrap_or_default(),
            row.get(other_year).cloned().unwrap_or_default(),
        );
        let values: Vec<String> = carried
            .iter()
            .map(|&idx| row.get(idx).cloned().unwrap_or_default())
            .collect();
        // Duplicate keys keep the last row, mirroring last-write-wins.
        if lookup.insert(key.clone(), values).is_none() {
            key_order.push(key);
        }
    }

    let mut matched = 0usize;
    let mut matched_keys: std::collections::HashSet<(String, String)> =
        std::collections::HashSet::new();
    for row in &mut base.rows {
        row.resize(width, String::new());
        let key = (row[base_country].clone(), row[base_year].clone());
        if let Some(values) = lookup.get(&key) {
            matched += 1;
            matched_keys.insert(key);
            for (offset, value) in values.iter().enumerate() {
                row[width - appended + offset] = value.clone();
            }
        }
    }

    // Rows that exist only in the joined table become new output rows,
    // in their original file order.
    for key in key_order {
        if matched_keys.contains(&key) {
            continue;
        }
        let Some(values) = lookup.remove(&key) else {
            continue;
        };
        let mut row = vec![String::new(); width];
        row[base_country] = key.0;
        row[base_year] = key.1;
        for (offset, value) in values.into_iter().enumerate() {
            row[width - appended + offset] = value;
        }
        base.rows.push(row);
    }

    Ok(matched)
}

fn column_index(headers: &[String], name: &str) -> Result<usize, AppError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name))
        .ok_or_else(|| AppError::new(2, format!("Missing required column: `{name}`")))
}

fn write_string_table(path: &Path, table: &StringTable) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create merged CSV '{}': {e}", path.display()),
        )
    })?;
    writer
        .write_record(&table.headers)
        .map_err(|e| AppError::new(4, format!("Failed to write merged CSV header: {e}")))?;
    for row in &table.rows {
        writer
            .write_record(row)
            .map_err(|e| AppError::new(4, format!("Failed to write merged CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush merged CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    const COUNTRY: &str = "Countries, territories and areas";
    const YEAR: &str = "Year";

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("hs_align_merge_{name}.csv"));
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn renames_unnamed_leading_columns() {
        let path = write_temp("unnamed", ",Unnamed: 1,Rate\nGhana,2010,42\n");
        let table = read_string_table(&path, COUNTRY, YEAR).unwrap();
        assert_eq!(table.headers[0], COUNTRY);
        assert_eq!(table.headers[1], YEAR);
        assert_eq!(table.headers[2], "Rate");
    }

    #[test]
    fn concatenation_aligns_by_header_name() {
        let a = write_temp("cat_a", ",Unnamed: 1,Rate A\nGhana,2010,1\n");
        let b = write_temp("cat_b", ",Unnamed: 1,Rate B\nChad,2011,2\n");
        let out = std::env::temp_dir().join("hs_align_merge_cat_out.csv");

        let stats = merge_sources(&[a, b], None, &out, COUNTRY, YEAR).unwrap();
        assert_eq!(stats.out_rows, 2);

        let merged = read_string_table(&out, COUNTRY, YEAR).unwrap();
        assert_eq!(merged.headers, vec![COUNTRY, YEAR, "Rate A", "Rate B"]);
        assert_eq!(merged.rows[0], vec!["Ghana", "2010", "1", ""]);
        assert_eq!(merged.rows[1], vec!["Chad", "2011", "", "2"]);
    }

    #[test]
    fn outer_join_keeps_rows_from_both_sides() {
        let mortality = write_temp(
            "join_m",
            ",Unnamed: 1,Mortality\nGhana,2010,11\nChad,2011,22\n",
        );
        let nutrition = write_temp(
            "join_n",
            "Countries, territories and areas,Year,Breastfeeding\nGhana,2010,66\nMali,2012,77\n",
        );
        let out = std::env::temp_dir().join("hs_align_merge_join_out.csv");

        let stats =
            merge_sources(&[mortality], Some(nutrition.as_path()), &out, COUNTRY, YEAR).unwrap();
        assert_eq!(stats.matched_rows, 1);
        assert_eq!(stats.out_rows, 3);

        let merged = read_string_table(&out, COUNTRY, YEAR).unwrap();
        assert_eq!(
            merged.headers,
            vec![COUNTRY, YEAR, "Mortality", "Breastfeeding"]
        );
        assert_eq!(merged.rows[0], vec!["Ghana", "2010", "11", "66"]);
        assert_eq!(merged.rows[1], vec!["Chad", "2011", "22", ""]);
        assert_eq!(merged.rows[2], vec!["Mali", "2012", "", "77"]);
    }
}
