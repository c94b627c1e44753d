//! Curve-shaped interpolation between two anchor years.

/// Interpolate a value at `target_year` between two anchors.
///
/// Linear progress through the span is bent by `exponent`: 1 is linear,
/// values above 1 concentrate the change near the end of the span, values
/// below 1 concentrate it near the start. Equal anchor years are a
/// degenerate span and return `start_value` directly.
pub fn interpolate(
    start_year: i32,
    end_year: i32,
    start_value: f64,
    end_value: f64,
    target_year: i32,
    exponent: f64,
) -> f64 {
    if start_year == end_year {
        return start_value;
    }
    let progress = f64::from(target_year - start_year) / f64::from(end_year - start_year);
    let adjusted = progress.powf(exponent);
    start_value + adjusted * (end_value - start_value)
}
