//! Per-country dense series reconstruction.
//!
//! Each country is rebuilt independently as a pure fold over its
//! observations. Directly reported years must be able to anchor every range
//! fill, so single-year observations are applied first (ascending year,
//! stable), then range observations (ascending start year, stable). Within a
//! range, years are processed ascending and metrics in source column order,
//! so earlier-filled years are visible as anchors to later ones and the
//! output is reproducible.

use rand::rngs::StdRng;

use crate::align::interp::interpolate;
use crate::align::optimizer::hill_climb;
use crate::align::smoothness::smoothness_score;
use crate::domain::{
    AlignConfig, CellValue, CoercionError, CountrySeries, ExponentScope, OptimizerMode,
    RawObservation,
};

/// One country's reconstruction result.
#[derive(Debug, Clone)]
pub struct ReconstructOutcome {
    pub series: CountrySeries,
    pub ranges_filled: usize,
    /// Exponent used for each filled range, in processing order.
    pub exponents: Vec<f64>,
}

/// Build the dense series for one country.
pub fn reconstruct_country(
    observations: &[&RawObservation],
    n_metrics: usize,
    config: &AlignConfig,
    rng: &mut StdRng,
) -> Result<ReconstructOutcome, CoercionError> {
    let mut singles: Vec<&RawObservation> = observations
        .iter()
        .copied()
        .filter(|o| !o.year.is_range())
        .collect();
    singles.sort_by_key(|o| o.year.start());

    let mut ranges: Vec<&RawObservation> = observations
        .iter()
        .copied()
        .filter(|o| o.year.is_range())
        .collect();
    ranges.sort_by_key(|o| o.year.start());

    let mut series = CountrySeries::new(n_metrics);
    for obs in &singles {
        let year = obs.year.start();
        for (col, cell) in obs.values.iter().enumerate() {
            let coerced = cell.coerce();
            if !coerced.is_missing() {
                series.set(year, col, coerced);
            }
        }
    }

    let mut cached_exponent: Option<f64> = None;
    let mut exponents = Vec::with_capacity(ranges.len());

    for obs in &ranges {
        let exponent = match (config.exponent_scope, cached_exponent) {
            (ExponentScope::PerCountry, Some(e)) => e,
            _ => {
                let e = optimize_exponent(&series, observations, obs, n_metrics, config, rng);
                cached_exponent = Some(e);
                e
            }
        };
        fill_range(&mut series, obs, exponent)?;
        exponents.push(exponent);
    }

    Ok(ReconstructOutcome {
        series,
        ranges_filled: exponents.len(),
        exponents,
    })
}

/// Pick the curve exponent for one range observation.
fn optimize_exponent(
    series: &CountrySeries,
    all_observations: &[&RawObservation],
    range_obs: &RawObservation,
    n_metrics: usize,
    config: &AlignConfig,
    rng: &mut StdRng,
) -> f64 {
    match config.optimizer {
        OptimizerMode::Legacy => {
            // The historical objective: score the raw observation group,
            // which is the same table for every candidate. The strict
            // improvement test never fires and the initial exponent wins.
            let matrix = group_matrix(all_observations, n_metrics);
            let baseline = smoothness_score(&matrix);
            hill_climb(
                config.initial_exponent,
                config.iterations,
                rng,
                baseline,
                |_| smoothness_score(&matrix),
            )
        }
        OptimizerMode::Trial => {
            let baseline = smoothness_score(&series.numeric_matrix());
            hill_climb(
                config.initial_exponent,
                config.iterations,
                rng,
                baseline,
                |candidate| {
                    let mut trial = series.clone();
                    match fill_range(&mut trial, range_obs, candidate) {
                        Ok(()) => smoothness_score(&trial.numeric_matrix()),
                        // A coercion failure does not depend on the
                        // candidate; the real fill surfaces it.
                        Err(_) => f64::NEG_INFINITY,
                    }
                },
            )
        }
    }
}

/// Column-major numeric view of the raw observation rows.
///
/// A column containing any text cell carries no numeric dtype and is
/// excluded outright rather than partially read.
fn group_matrix(observations: &[&RawObservation], n_metrics: usize) -> Vec<Vec<Option<f64>>> {
    (0..n_metrics)
        .map(|col| {
            let has_text = observations
                .iter()
                .any(|o| matches!(o.values[col], CellValue::Text(_)));
            if has_text {
                Vec::new()
            } else {
                observations
                    .iter()
                    .map(|o| o.values[col].as_number())
                    .collect()
            }
        })
        .collect()
}

/// Fill every year of a range observation into the series.
fn fill_range(
    series: &mut CountrySeries,
    obs: &RawObservation,
    exponent: f64,
) -> Result<(), CoercionError> {
    let start = obs.year.start();
    let end = obs.year.end();

    for year in start..=end {
        for col in 0..obs.values.len() {
            // First non-missing match scanning outward, bounded by the range;
            // the target year itself counts once written.
            let before = (start..=year).rev().find(|y| series.cell(*y, col).is_some());
            let after = (year..=end).find(|y| series.cell(*y, col).is_some());

            match (before, after) {
                (Some(b), Some(a)) if b == a => {
                    if let Some(cell) = series.cell(b, col).cloned() {
                        series.set(year, col, cell);
                    }
                }
                (Some(b), Some(a)) => {
                    let before_value = anchor_number(series, b, col)?;
                    let after_value = anchor_number(series, a, col)?;
                    series.set(
                        year,
                        col,
                        CellValue::Number(interpolate(
                            b,
                            a,
                            before_value,
                            after_value,
                            year,
                            exponent,
                        )),
                    );
                }
                (None, None) => {
                    let fallback = obs.values[col].coerce();
                    if !fallback.is_missing() {
                        series.set(year, col, fallback);
                    }
                }
                (None, Some(a)) => {
                    if let Some(cell) = series.cell(a, col).cloned() {
                        series.set(year, col, cell);
                    }
                }
                (Some(b), None) => {
                    if let Some(cell) = series.cell(b, col).cloned() {
                        series.set(year, col, cell);
                    }
                }
            }
        }
    }

    Ok(())
}

fn anchor_number(series: &CountrySeries, year: i32, col: usize) -> Result<f64, CoercionError> {
    match series.cell(year, col) {
        Some(cell) => cell.try_number(),
        None => Err(CoercionError::new("<missing>")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::YearSpec;
    use rand::SeedableRng;
    use std::path::PathBuf;

    fn test_config(optimizer: OptimizerMode, scope: ExponentScope) -> AlignConfig {
        AlignConfig {
            input: PathBuf::from("unused.csv"),
            optimizer,
            exponent_scope: scope,
            initial_exponent: 1.0,
            iterations: 50,
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

    fn obs(line: usize, year: YearSpec, values: &[CellValue]) -> RawObservation {
        RawObservation {
            line,
            country: "X".to_string(),
            year,
            values: values.to_vec(),
        }
    }

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    #[test]
    fn range_interpolates_between_reported_anchors() {
        // metric_A is reported at the range endpoints only; metric_B only on
        // the range row itself.
        let rows = vec![
            obs(2, YearSpec::Single(2008), &[num(10.0), CellValue::Missing]),
            obs(
                3,
                YearSpec::Range { start: 2008, end: 2010 },
                &[CellValue::Missing, num(5.0)],
            ),
            obs(4, YearSpec::Single(2010), &[num(20.0), CellValue::Missing]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = reconstruct_country(&refs, 2, &config, &mut rng).unwrap();

        let years: Vec<i32> = outcome.series.iter().map(|(y, _)| y).collect();
        assert_eq!(years, vec![2008, 2009, 2010]);

        // Legacy mode keeps the initial exponent (1.0): exact midpoint.
        assert_eq!(outcome.series.cell(2008, 0), Some(&num(10.0)));
        assert_eq!(outcome.series.cell(2009, 0), Some(&num(15.0)));
        assert_eq!(outcome.series.cell(2010, 0), Some(&num(20.0)));

        // metric_B has no anchors anywhere: the row's own value everywhere.
        for year in 2008..=2010 {
            assert_eq!(outcome.series.cell(year, 1), Some(&num(5.0)));
        }

        assert_eq!(outcome.ranges_filled, 1);
        assert_eq!(outcome.exponents, vec![1.0]);
    }

    #[test]
    fn trial_mode_stays_within_anchor_bounds() {
        let rows = vec![
            obs(2, YearSpec::Single(2008), &[num(10.0)]),
            obs(3, YearSpec::Range { start: 2008, end: 2010 }, &[CellValue::Missing]),
            obs(4, YearSpec::Single(2010), &[num(20.0)]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Trial, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();

        let filled = outcome.series.cell(2009, 0).and_then(CellValue::as_number).unwrap();
        assert!((10.0..=20.0).contains(&filled));
        assert!(outcome.exponents[0] > 0.0);
    }

    #[test]
    fn later_observation_wins_for_same_year() {
        let rows = vec![
            obs(2, YearSpec::Single(2012), &[num(1.0)]),
            obs(3, YearSpec::Single(2012), &[num(2.0)]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();
        assert_eq!(outcome.series.cell(2012, 0), Some(&num(2.0)));
    }

    #[test]
    fn one_sided_anchor_is_copied() {
        let rows = vec![
            obs(2, YearSpec::Single(2008), &[num(30.0)]),
            obs(3, YearSpec::Range { start: 2008, end: 2011 }, &[CellValue::Missing]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();

        for year in 2008..=2011 {
            assert_eq!(outcome.series.cell(year, 0), Some(&num(30.0)));
        }
    }

    #[test]
    fn no_anchor_fallback_retains_text() {
        let rows = vec![obs(
            2,
            YearSpec::Range { start: 2000, end: 2001 },
            &[CellValue::Text("no data".to_string())],
        )];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();

        // The first year takes the fallback text; the second copies it as a
        // one-sided anchor.
        assert_eq!(
            outcome.series.cell(2000, 0),
            Some(&CellValue::Text("no data".to_string()))
        );
        assert_eq!(
            outcome.series.cell(2001, 0),
            Some(&CellValue::Text("no data".to_string()))
        );
    }

    #[test]
    fn interpolating_across_text_anchors_is_a_typed_error() {
        let rows = vec![
            obs(2, YearSpec::Single(2008), &[CellValue::Text("n/a".to_string())]),
            obs(3, YearSpec::Single(2010), &[num(20.0)]),
            obs(4, YearSpec::Range { start: 2008, end: 2010 }, &[CellValue::Missing]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let err = reconstruct_country(&refs, 1, &config, &mut rng).unwrap_err();
        assert_eq!(err.raw(), "n/a");
    }

    #[test]
    fn annotated_single_year_values_are_coerced() {
        let rows = vec![obs(
            2,
            YearSpec::Single(2015),
            &[CellValue::Text("45.6 (estimate)".to_string())],
        )];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();
        assert_eq!(outcome.series.cell(2015, 0), Some(&num(45.6)));
    }

    #[test]
    fn per_country_scope_reuses_one_exponent() {
        let rows = vec![
            obs(2, YearSpec::Single(2000), &[num(1.0)]),
            obs(3, YearSpec::Single(2004), &[num(9.0)]),
            obs(4, YearSpec::Range { start: 2000, end: 2004 }, &[CellValue::Missing]),
            obs(5, YearSpec::Single(2006), &[num(12.0)]),
            obs(6, YearSpec::Range { start: 2004, end: 2006 }, &[CellValue::Missing]),
        ];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Trial, ExponentScope::PerCountry);
        let mut rng = StdRng::seed_from_u64(9);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();

        assert_eq!(outcome.exponents.len(), 2);
        assert_eq!(outcome.exponents[0], outcome.exponents[1]);
    }

    #[test]
    fn degenerate_range_behaves_like_a_single_year() {
        let rows = vec![obs(
            2,
            YearSpec::Range { start: 2008, end: 2008 },
            &[num(7.0)],
        )];
        let refs: Vec<&RawObservation> = rows.iter().collect();

        let config = test_config(OptimizerMode::Legacy, ExponentScope::PerRange);
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = reconstruct_country(&refs, 1, &config, &mut rng).unwrap();
        assert_eq!(outcome.series.len(), 1);
        assert_eq!(outcome.series.cell(2008, 0), Some(&num(7.0)));
    }
}
