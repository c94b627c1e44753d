//! Synthetic messy-CSV generation.
//!
//! Produces an input file with the same pathologies the real exports have:
//! year-range rows, annotated string cells, missing values, and the odd
//! header row leaking into the data. Fully deterministic under a fixed seed,
//! which makes it useful both for demos and for exercising the pipeline in
//! tests without shipping real data.

use std::path::Path;

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::align::aligner::TRAILING_METRICS;
use crate::error::AppError;

/// Knobs for the generator.
#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub countries: usize,
    pub start_year: i32,
    pub end_year: i32,
    pub seed: u64,
    /// Probability that a run of years collapses into one range row.
    pub range_prob: f64,
    /// Probability that a written cell carries a text annotation.
    pub annotate_prob: f64,
    /// Probability that a cell is left blank.
    pub missing_prob: f64,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            countries: 12,
            start_year: 2000,
            end_year: 2020,
            seed: 42,
            range_prob: 0.25,
            annotate_prob: 0.15,
            missing_prob: 0.2,
        }
    }
}

/// Counters for the sample report.
#[derive(Debug, Clone)]
pub struct SampleStats {
    pub rows: usize,
    pub range_rows: usize,
}

/// Generate a synthetic raw CSV at `path`.
pub fn write_sample_csv(
    path: &Path,
    options: &SampleOptions,
    country_column: &str,
    year_column: &str,
) -> Result<SampleStats, AppError> {
    if options.countries == 0 {
        return Err(AppError::new(2, "Sample country count must be > 0."));
    }
    if options.end_year < options.start_year {
        return Err(AppError::new(2, "Sample year span is inverted."));
    }
    for (name, p) in [
        ("range", options.range_prob),
        ("annotate", options.annotate_prob),
        ("missing", options.missing_prob),
    ] {
        if !(0.0..=1.0).contains(&p) {
            return Err(AppError::new(
                2,
                format!("Sample {name} probability must be in [0, 1]."),
            ));
        }
    }

    let mut rng = StdRng::seed_from_u64(options.seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let mut writer = csv::Writer::from_path(path).map_err(|e| {
        AppError::new(
            4,
            format!("Failed to create sample CSV '{}': {e}", path.display()),
        )
    })?;

    let metrics = [
        "Under-five mortality rate (per 1000 live births) (SDG 3.2.1) Both sexes",
        TRAILING_METRICS[0],
        TRAILING_METRICS[1],
    ];

    let mut header = vec![country_column.to_string(), year_column.to_string()];
    header.extend(metrics.iter().map(|m| m.to_string()));
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(4, format!("Failed to write sample header: {e}")))?;

    let mut rows = 0usize;
    let mut range_rows = 0usize;

    for country_idx in 0..options.countries {
        let country = format!("Sample Country {:02}", country_idx + 1);

        // Per-metric random walk anchored at a country-specific base level.
        let mut levels: Vec<f64> = (0..metrics.len())
            .map(|_| rng.gen_range(10.0..80.0))
            .collect();

        let mut year = options.start_year;
        while year <= options.end_year {
            for level in &mut levels {
                *level = (*level + noise.sample(&mut rng) * 2.0).clamp(0.5, 99.5);
            }

            let span = if rng.gen_bool(options.range_prob) {
                rng.gen_range(2..=4).min(options.end_year - year + 1)
            } else {
                1
            };
            let year_field = if span > 1 {
                format!("{}-{}", year, year + span - 1)
            } else {
                year.to_string()
            };

            let mut record = vec![country.clone(), year_field];
            for &level in &levels {
                if rng.gen_bool(options.missing_prob) {
                    record.push(String::new());
                } else if rng.gen_bool(options.annotate_prob) {
                    record.push(format!("{:.1} (estimate)", level));
                } else {
                    record.push(format!("{:.1}", level));
                }
            }
            writer
                .write_record(&record)
                .map_err(|e| AppError::new(4, format!("Failed to write sample row: {e}")))?;
            rows += 1;
            if span > 1 {
                range_rows += 1;
            }
            year += span;
        }

        // Occasionally leak a header row, as concatenated exports do.
        if country_idx % 5 == 4 {
            let mut record = vec![country.clone(), year_column.to_string()];
            record.extend(metrics.iter().map(|m| m.to_string()));
            writer
                .write_record(&record)
                .map_err(|e| AppError::new(4, format!("Failed to write sample row: {e}")))?;
            rows += 1;
        }
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush sample CSV: {e}")))?;

    Ok(SampleStats { rows, range_rows })
}
