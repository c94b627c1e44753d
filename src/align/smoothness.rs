//! Smoothness scoring for candidate series.
//!
//! The score rewards small year-over-year movement and penalizes outliers:
//!
//! ```text
//! score = -diff_penalty - 0.1 * extreme_count
//! ```
//!
//! where `diff_penalty` is the mean (over columns) of the mean absolute
//! difference between vertically adjacent numeric cells, and `extreme_count`
//! is the number of cells strictly outside the column's [1st, 99th]
//! percentile band. Higher is smoother. Pure function of its input:
//! deterministic, no side effects.

/// Weight applied to the outlier count.
const EXTREME_WEIGHT: f64 = 0.1;

/// Score a column-major numeric matrix (rows in year order).
///
/// A matrix with no measurable differences and no outliers scores `0.0`, so
/// empty inputs are comparable instead of poisoning the search with NaN.
pub fn smoothness_score(columns: &[Vec<Option<f64>>]) -> f64 {
    let mut column_means = Vec::new();
    let mut extremes = 0usize;

    for column in columns {
        let mut diff_sum = 0.0;
        let mut diff_count = 0usize;
        for pair in column.windows(2) {
            if let (Some(a), Some(b)) = (pair[0], pair[1]) {
                diff_sum += (b - a).abs();
                diff_count += 1;
            }
        }
        if diff_count > 0 {
            column_means.push(diff_sum / diff_count as f64);
        }

        extremes += count_extremes(column);
    }

    let diff_penalty = if column_means.is_empty() {
        0.0
    } else {
        column_means.iter().sum::<f64>() / column_means.len() as f64
    };

    -diff_penalty - EXTREME_WEIGHT * extremes as f64
}

fn count_extremes(column: &[Option<f64>]) -> usize {
    let mut values: Vec<f64> = column.iter().flatten().copied().collect();
    if values.len() < 2 {
        return 0;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let (Some(low), Some(high)) = (quantile(&values, 0.01), quantile(&values, 0.99)) else {
        return 0;
    };

    column
        .iter()
        .flatten()
        .filter(|v| **v > high || **v < low)
        .count()
}

/// Linear-interpolation quantile of pre-sorted values.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    if sorted.len() == 1 {
        return Some(sorted[0]);
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
