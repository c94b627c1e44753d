//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - reconstructed values: `o`
//! - straight segments between consecutive years: `.`

/// Render a plot of one (year, value) series.
pub fn render_series_plot(series: &[(i32, f64)], width: usize, height: usize, label: &str) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let (year_min, year_max) = year_range(series).unwrap_or((2000, 2020));
    let (value_min, value_max) = value_range(series).unwrap_or((0.0, 1.0));
    let (value_min, value_max) = pad_range(value_min, value_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Connect consecutive points first (so the points can overlay).
    for pair in series.windows(2) {
        let (y0, v0) = pair[0];
        let (y1, v1) = pair[1];
        let x0 = map_x(y0, year_min, year_max, width);
        let x1 = map_x(y1, year_min, year_max, width);
        if x1 <= x0 + 1 {
            continue;
        }
        for x in (x0 + 1)..x1 {
            let u = (x - x0) as f64 / (x1 - x0) as f64;
            let v = v0 + u * (v1 - v0);
            let y = map_y(v, value_min, value_max, height);
            grid[y][x] = '.';
        }
    }

    for &(year, value) in series {
        let x = map_x(year, year_min, year_max, width);
        let y = map_y(value, value_min, value_max, height);
        grid[y][x] = 'o';
    }

    // Build final string. We include a small header with ranges.
    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {label} | years=[{year_min}, {year_max}] | value=[{value_min:.2}, {value_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn year_range(series: &[(i32, f64)]) -> Option<(i32, i32)> {
    let min = series.iter().map(|(y, _)| *y).min()?;
    let max = series.iter().map(|(y, _)| *y).max()?;
    if min == max {
        // Single-year series still needs a non-degenerate axis.
        Some((min - 1, max + 1))
    } else {
        Some((min, max))
    }
}

fn value_range(series: &[(i32, f64)]) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for &(_, v) in series {
        if v.is_finite() {
            min = min.min(v);
            max = max.max(v);
        }
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, fraction: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span < 1e-9 { 1.0 } else { span * fraction };
    (min - pad, max + pad)
}

fn map_x(year: i32, year_min: i32, year_max: i32, width: usize) -> usize {
    let span = (year_max - year_min).max(1) as f64;
    let u = (year - year_min) as f64 / span;
    ((u * (width as f64 - 1.0)).round() as usize).min(width - 1)
}

fn map_y(value: f64, value_min: f64, value_max: f64, height: usize) -> usize {
    let span = value_max - value_min;
    let u = if span.abs() < 1e-12 {
        0.5
    } else {
        (value - value_min) / span
    };
    // Row 0 is the top of the grid.
    let inverted = 1.0 - u.clamp(0.0, 1.0);
    ((inverted * (height as f64 - 1.0)).round() as usize).min(height - 1)
}
