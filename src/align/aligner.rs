//! Dataset assembly: group by country, reconstruct, order, audit.

use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;
use serde::Serialize;

use crate::align::reconstruct::reconstruct_country;
use crate::data::regions::{region_of, tier_of};
use crate::domain::{
    AlignConfig, AlignedDataset, AlignedRow, CellValue, CoercionError, RawObservation, RawTable,
};
use crate::error::AppError;

/// The two breastfeeding indicators are always reported last; every other
/// column keeps its original relative order.
pub const TRAILING_METRICS: [&str; 2] = [
    "Early initiation of breastfeeding (%)",
    "Infants exclusively breastfed for the first six months of life (%)",
];

/// Per-country reconstruction stats for the run summary.
#[derive(Debug, Clone, Serialize)]
pub struct CountryStats {
    pub country: String,
    pub years: usize,
    pub ranges_filled: usize,
    pub mean_exponent: Option<f64>,
}

/// Aggregate audit of one alignment run.
#[derive(Debug, Clone, Serialize)]
pub struct AlignAudit {
    pub countries: usize,
    pub rows_out: usize,
    pub ranges_filled: usize,
    /// Observations excluded by the region/tier bucket filters.
    pub filtered_out: usize,
    pub per_country: Vec<CountryStats>,
}

/// Alignment result: the dataset plus its audit trail.
#[derive(Debug, Clone)]
pub struct AlignOutput {
    pub dataset: AlignedDataset,
    pub audit: AlignAudit,
}

/// Align the raw table into a dense (country, year)-ordered dataset.
///
/// Countries are reconstructed independently (in parallel); each one draws
/// from its own generator derived from the run seed and the country name, so
/// results do not depend on scheduling.
pub fn align(table: &RawTable, config: &AlignConfig) -> Result<AlignOutput, AppError> {
    validate_config(config)?;

    let mut filtered_out = 0usize;
    let mut groups: BTreeMap<&str, Vec<&RawObservation>> = BTreeMap::new();
    for obs in &table.observations {
        if !matches_buckets(&obs.country, config) {
            filtered_out += 1;
            continue;
        }
        groups.entry(obs.country.as_str()).or_default().push(obs);
    }

    if groups.is_empty() {
        return Err(AppError::new(
            3,
            "No observations remain after bucket filtering.",
        ));
    }

    let n_metrics = table.metric_columns.len();
    let group_list: Vec<(&str, Vec<&RawObservation>)> = groups.into_iter().collect();

    let results: Vec<Result<(String, crate::align::reconstruct::ReconstructOutcome), AppError>> =
        group_list
            .par_iter()
            .map(|(country, observations)| {
                let mut rng = StdRng::seed_from_u64(country_seed(config.seed, country));
                reconstruct_country(observations, n_metrics, config, &mut rng)
                    .map(|outcome| ((*country).to_string(), outcome))
                    .map_err(|e| AppError::new(3, format!("{country}: {e}")))
            })
            .collect();

    let column_order = output_metric_order(&table.metric_columns);

    let mut header = Vec::with_capacity(2 + column_order.len());
    header.push(table.country_column.clone());
    header.push(table.year_column.clone());
    for &idx in &column_order {
        header.push(table.metric_columns[idx].clone());
    }

    let mut per_country = Vec::with_capacity(results.len());
    let mut rows = Vec::new();
    let mut ranges_filled = 0usize;

    // Group keys come out of a BTreeMap and years out of a BTreeMap, so the
    // flattened rows are already sorted by (country, year).
    for result in results {
        let (country, outcome) = result?;
        ranges_filled += outcome.ranges_filled;
        per_country.push(CountryStats {
            country: country.clone(),
            years: outcome.series.len(),
            ranges_filled: outcome.ranges_filled,
            mean_exponent: mean(&outcome.exponents),
        });

        for (year, cells) in outcome.series.iter() {
            let values: Vec<CellValue> =
                column_order.iter().map(|&idx| cells[idx].clone()).collect();

            if config.strict {
                for (pos, &src) in column_order.iter().enumerate() {
                    if let CellValue::Text(raw) = &values[pos] {
                        return Err(AppError::new(
                            3,
                            format!(
                                "{country} / {year} / '{}': {}",
                                table.metric_columns[src],
                                CoercionError::new(raw.clone())
                            ),
                        ));
                    }
                }
            }

            rows.push(AlignedRow {
                country: country.clone(),
                year,
                values,
            });
        }
    }

    let audit = AlignAudit {
        countries: per_country.len(),
        rows_out: rows.len(),
        ranges_filled,
        filtered_out,
        per_country,
    };

    Ok(AlignOutput {
        dataset: AlignedDataset { header, rows },
        audit,
    })
}

fn validate_config(config: &AlignConfig) -> Result<(), AppError> {
    if !(config.initial_exponent.is_finite() && config.initial_exponent > 0.0) {
        return Err(AppError::new(
            2,
            format!(
                "Invalid initial exponent {} (must be finite and > 0).",
                config.initial_exponent
            ),
        ));
    }
    Ok(())
}

fn matches_buckets(country: &str, config: &AlignConfig) -> bool {
    if let Some(region) = config.filter_region {
        if region_of(country) != Some(region) {
            return false;
        }
    }
    if let Some(tier) = config.filter_tier {
        if tier_of(country) != Some(tier) {
            return false;
        }
    }
    true
}

/// Metric indices in output order: everything but the trailing indicators in
/// original order, then the trailing indicators that are actually present.
fn output_metric_order(metric_columns: &[String]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..metric_columns.len())
        .filter(|&i| !TRAILING_METRICS.contains(&metric_columns[i].as_str()))
        .collect();
    for name in TRAILING_METRICS {
        if let Some(idx) = metric_columns.iter().position(|c| c == name) {
            order.push(idx);
        }
    }
    order
}

/// Derive a per-country seed so parallel reconstruction stays reproducible.
fn country_seed(seed: u64, country: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    seed.hash(&mut hasher);
    country.hash(&mut hasher);
    hasher.finish()
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ExponentScope, OptimizerMode, YearSpec};
    use std::path::PathBuf;

    fn test_config() -> AlignConfig {
        AlignConfig {
            input: PathBuf::from("unused.csv"),
            optimizer: OptimizerMode::Trial,
            exponent_scope: ExponentScope::PerRange,
            initial_exponent: 1.0,
            iterations: 25,
            seed: 42,
            filter_region: None,
            filter_tier: None,
            strict: false,
            country_column: "Countries, territories and areas".to_string(),
            year_column: "Year".to_string(),
            out: None,
            summary_json: None,
            show_dropped: 20,
        }
    }

    fn table(metric_columns: &[&str], observations: Vec<RawObservation>) -> RawTable {
        RawTable {
            country_column: "Countries, territories and areas".to_string(),
            year_column: "Year".to_string(),
            metric_columns: metric_columns.iter().map(|s| s.to_string()).collect(),
            observations,
        }
    }

    fn obs(country: &str, year: YearSpec, values: &[CellValue]) -> RawObservation {
        RawObservation {
            line: 2,
            country: country.to_string(),
            year,
            values: values.to_vec(),
        }
    }

    #[test]
    fn trailing_indicators_move_to_the_end() {
        let t = table(
            &[
                "Early initiation of breastfeeding (%)",
                "Under-five mortality rate (per 1000 live births) (SDG 3.2.1) Both sexes",
                "Infants exclusively breastfed for the first six months of life (%)",
                "Number of deaths among children under-five Both sexes",
            ],
            vec![obs(
                "France",
                YearSpec::Single(2010),
                &[
                    CellValue::Number(1.0),
                    CellValue::Number(2.0),
                    CellValue::Number(3.0),
                    CellValue::Number(4.0),
                ],
            )],
        );

        let out = align(&t, &test_config()).unwrap();
        assert_eq!(
            out.dataset.header,
            vec![
                "Countries, territories and areas".to_string(),
                "Year".to_string(),
                "Under-five mortality rate (per 1000 live births) (SDG 3.2.1) Both sexes"
                    .to_string(),
                "Number of deaths among children under-five Both sexes".to_string(),
                "Early initiation of breastfeeding (%)".to_string(),
                "Infants exclusively breastfed for the first six months of life (%)".to_string(),
            ]
        );
        assert_eq!(
            out.dataset.rows[0].values,
            vec![
                CellValue::Number(2.0),
                CellValue::Number(4.0),
                CellValue::Number(1.0),
                CellValue::Number(3.0),
            ]
        );
    }

    #[test]
    fn rows_are_sorted_by_country_then_year() {
        let t = table(
            &["m"],
            vec![
                obs("Nepal", YearSpec::Single(2011), &[CellValue::Number(1.0)]),
                obs("Brazil", YearSpec::Single(2012), &[CellValue::Number(2.0)]),
                obs("Brazil", YearSpec::Single(2010), &[CellValue::Number(3.0)]),
            ],
        );

        let out = align(&t, &test_config()).unwrap();
        let keys: Vec<(String, i32)> = out
            .dataset
            .rows
            .iter()
            .map(|r| (r.country.clone(), r.year))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Brazil".to_string(), 2010),
                ("Brazil".to_string(), 2012),
                ("Nepal".to_string(), 2011),
            ]
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let t = table(
            &["m"],
            vec![
                obs("Ghana", YearSpec::Single(2000), &[CellValue::Number(5.0)]),
                obs(
                    "Ghana",
                    YearSpec::Range { start: 2000, end: 2006 },
                    &[CellValue::Missing],
                ),
                obs("Ghana", YearSpec::Single(2006), &[CellValue::Number(40.0)]),
            ],
        );

        let config = test_config();
        let a = align(&t, &config).unwrap();
        let b = align(&t, &config).unwrap();

        let values = |out: &AlignOutput| -> Vec<Option<f64>> {
            out.dataset
                .rows
                .iter()
                .map(|r| r.values[0].as_number())
                .collect()
        };
        assert_eq!(values(&a), values(&b));
        assert_eq!(a.audit.ranges_filled, 1);
    }

    #[test]
    fn region_filter_drops_other_countries() {
        let t = table(
            &["m"],
            vec![
                obs("France", YearSpec::Single(2010), &[CellValue::Number(1.0)]),
                obs("Brazil", YearSpec::Single(2010), &[CellValue::Number(2.0)]),
            ],
        );

        let mut config = test_config();
        config.filter_region = Some(crate::data::regions::Region::WesternEurope);
        let out = align(&t, &config).unwrap();

        assert_eq!(out.audit.countries, 1);
        assert_eq!(out.audit.filtered_out, 1);
        assert_eq!(out.dataset.rows[0].country, "France");
    }

    #[test]
    fn strict_mode_rejects_retained_text() {
        let t = table(
            &["m"],
            vec![obs(
                "Chad",
                YearSpec::Single(2010),
                &[CellValue::Text("pending review".to_string())],
            )],
        );

        let mut config = test_config();
        config.strict = true;
        let err = align(&t, &config).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(format!("{err}").contains("pending review"));
    }

    #[test]
    fn invalid_exponent_is_a_config_error() {
        let t = table(
            &["m"],
            vec![obs("Chad", YearSpec::Single(2010), &[CellValue::Number(1.0)])],
        );
        let mut config = test_config();
        config.initial_exponent = 0.0;
        assert_eq!(align(&t, &config).unwrap_err().exit_code(), 2);
    }

    #[test]
    fn empty_after_filter_is_a_data_error() {
        let t = table(
            &["m"],
            vec![obs("Brazil", YearSpec::Single(2010), &[CellValue::Number(1.0)])],
        );
        let mut config = test_config();
        config.filter_region = Some(crate::data::regions::Region::NorthernEurope);
        assert_eq!(align(&t, &config).unwrap_err().exit_code(), 3);
    }
}
