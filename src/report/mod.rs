//! Reporting utilities: formatted terminal output for alignment runs.
//!
//! We keep formatting code in one place so:
//! - the alignment code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod discrepancy;

pub use discrepancy::*;

use crate::align::aligner::AlignAudit;
use crate::domain::{AlignConfig, AlignedDataset};
use crate::io::ingest::IngestedTable;

/// Format the full run summary (counts + config echo + audit trail).
pub fn format_run_summary(
    ingest: &IngestedTable,
    audit: &AlignAudit,
    dataset: &AlignedDataset,
    config: &AlignConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== hsa - year-range alignment ===\n");
    out.push_str(&format!("Input: {}\n", config.input.display()));
    out.push_str(&format!(
        "Rows: read={} | used={} | dropped={}\n",
        ingest.rows_read,
        ingest.rows_used,
        ingest.row_errors.len()
    ));
    let trailing = trailing_names(dataset);
    out.push_str(&format!(
        "Columns: {} metrics (trailing: {})\n",
        ingest.table.metric_columns.len(),
        if trailing.is_empty() {
            "none".to_string()
        } else {
            trailing.join(" | ")
        }
    ));
    out.push_str(&format!(
        "Optimizer: {:?} | scope={:?} | initial={} | iterations={} | seed={}\n",
        config.optimizer,
        config.exponent_scope,
        config.initial_exponent,
        config.iterations,
        config.seed
    ));
    if let Some(region) = config.filter_region {
        out.push_str(&format!("Filter: region={}\n", region.display_name()));
    }
    if let Some(tier) = config.filter_tier {
        out.push_str(&format!("Filter: tier={}\n", tier.display_name()));
    }

    out.push_str(&format!(
        "Aligned: countries={} | rows={} | ranges interpolated={}",
        audit.countries, audit.rows_out, audit.ranges_filled
    ));
    if audit.filtered_out > 0 {
        out.push_str(&format!(" | filtered out={}", audit.filtered_out));
    }
    out.push('\n');

    if !ingest.row_errors.is_empty() {
        out.push_str(&format!(
            "\nDropped rows ({} total, showing up to {}):\n",
            ingest.row_errors.len(),
            config.show_dropped
        ));
        for error in ingest.row_errors.iter().take(config.show_dropped) {
            match &error.country {
                Some(country) => out.push_str(&format!(
                    "  line {}: [{}] {}\n",
                    error.line, country, error.message
                )),
                None => out.push_str(&format!("  line {}: {}\n", error.line, error.message)),
            }
        }
    }

    out
}

fn trailing_names(dataset: &AlignedDataset) -> Vec<String> {
    crate::align::aligner::TRAILING_METRICS
        .iter()
        .filter(|name| dataset.header.iter().any(|h| h == *name))
        .map(|name| name.to_string())
        .collect()
}
