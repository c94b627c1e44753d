//! Country-coverage discrepancy between two datasets.
//!
//! Source files rarely cover the same country list; the discrepancy report
//! shows what each side is missing before a merge is attempted.

use std::collections::BTreeSet;

/// Countries present on one side only.
#[derive(Debug, Clone)]
pub struct Discrepancy {
    pub only_in_first: Vec<String>,
    pub only_in_second: Vec<String>,
}

/// Compute the two-way set difference (sorted output).
pub fn country_discrepancy(first: &BTreeSet<String>, second: &BTreeSet<String>) -> Discrepancy {
    Discrepancy {
        only_in_first: first.difference(second).cloned().collect(),
        only_in_second: second.difference(first).cloned().collect(),
    }
}

/// Format the report for terminal output.
pub fn format_discrepancy(
    discrepancy: &Discrepancy,
    first_label: &str,
    second_label: &str,
) -> String {
    let mut out = String::new();

    out.push_str("=== hsa - country coverage diff ===\n");
    out.push_str(&format!(
        "Only in {} ({}):\n",
        first_label,
        discrepancy.only_in_first.len()
    ));
    for country in &discrepancy.only_in_first {
        out.push_str(&format!("  {country}\n"));
    }
    out.push_str(&format!(
        "Only in {} ({}):\n",
        second_label,
        discrepancy.only_in_second.len()
    ));
    for country in &discrepancy.only_in_second {
        out.push_str(&format!("  {country}\n"));
    }

    out
}
