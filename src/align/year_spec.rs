//! Reporting-period parsing.
//!
//! WHO exports encode the reporting period as a single year ("2012"), an
//! inclusive range ("2008-2009"), or noise: blank cells and header rows that
//! leak into the data when files are concatenated. Blanks and header
//! sentinels skip the observation; anything else that fails to parse is a
//! row-level error so malformed periods cannot silently corrupt the series.

use crate::domain::YearSpec;

/// Parse a raw year field.
///
/// Returns `Ok(None)` when the observation carries no reporting period (blank
/// cell, or the year column's own header leaking into the data) and should be
/// skipped.
pub fn parse_year_spec(raw: &str, year_header: &str) -> Result<Option<YearSpec>, String> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if value.eq_ignore_ascii_case(year_header.trim()) {
        return Ok(None);
    }

    if value.contains('-') {
        let parts: Vec<&str> = value.split('-').collect();
        if parts.len() != 2 {
            return Err(format!("Invalid year range '{value}'."));
        }
        let start = parse_year(parts[0])
            .ok_or_else(|| format!("Invalid year range '{value}': bad start year."))?;
        let end = parse_year(parts[1])
            .ok_or_else(|| format!("Invalid year range '{value}': bad end year."))?;
        if start > end {
            return Err(format!("Invalid year range '{value}': start year after end year."));
        }
        return Ok(Some(YearSpec::Range { start, end }));
    }

    let year = parse_year(value).ok_or_else(|| format!("Invalid year '{value}'."))?;
    Ok(Some(YearSpec::Single(year)))
}

/// Parse one year token.
///
/// Accepts plain integers plus the integral-float form ("2010.0") that
/// spreadsheet round-trips produce.
fn parse_year(token: &str) -> Option<i32> {
    let token = token.trim();
    if let Ok(y) = token.parse::<i32>() {
        return Some(y);
    }
    match token.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && (-10_000.0..=10_000.0).contains(&v) => {
            Some(v as i32)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_year() {
        assert_eq!(
            parse_year_spec("2012", "Year").unwrap(),
            Some(YearSpec::Single(2012))
        );
        assert_eq!(
            parse_year_spec("2010.0", "Year").unwrap(),
            Some(YearSpec::Single(2010))
        );
    }

    #[test]
    fn parses_inclusive_range() {
        assert_eq!(
            parse_year_spec("2008-2009", "Year").unwrap(),
            Some(YearSpec::Range { start: 2008, end: 2009 })
        );
        assert_eq!(
            parse_year_spec(" 2008 - 2010 ", "Year").unwrap(),
            Some(YearSpec::Range { start: 2008, end: 2010 })
        );
    }

    #[test]
    fn blank_and_header_sentinels_skip() {
        assert_eq!(parse_year_spec("", "Year").unwrap(), None);
        assert_eq!(parse_year_spec("   ", "Year").unwrap(), None);
        assert_eq!(parse_year_spec("NaN", "Year").unwrap(), None);
        assert_eq!(parse_year_spec("Year", "Year").unwrap(), None);
        assert_eq!(parse_year_spec("year", "Year").unwrap(), None);
    }

    #[test]
    fn malformed_periods_are_errors() {
        assert!(parse_year_spec("abc", "Year").is_err());
        assert!(parse_year_spec("2008-2009-2010", "Year").is_err());
        assert!(parse_year_spec("2008-abc", "Year").is_err());
        assert!(parse_year_spec("2010-2008", "Year").is_err());
    }

    #[test]
    fn degenerate_range_is_allowed() {
        assert_eq!(
            parse_year_spec("2008-2008", "Year").unwrap(),
            Some(YearSpec::Range { start: 2008, end: 2008 })
        );
    }
}
