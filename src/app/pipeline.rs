//! Shared alignment pipeline used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! ingest -> per-country reconstruction -> assembly -> audit
//!
//! The CLI can then focus on presentation (printing vs exports).

use crate::align::aligner::{AlignAudit, align};
use crate::domain::{AlignConfig, AlignedDataset};
use crate::error::AppError;
use crate::io::ingest::{IngestedTable, load_raw_table};

/// All computed outputs of a single `hsa align` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub ingest: IngestedTable,
    pub dataset: AlignedDataset,
    pub audit: AlignAudit,
}

/// Execute the full alignment pipeline and return the computed outputs.
pub fn run_align(config: &AlignConfig) -> Result<RunOutput, AppError> {
    // 1) Ingest + validate the raw table (structural errors stop here).
    let ingest = load_raw_table(&config.input, config)?;

    // 2) Reconstruct every country and assemble the ordered dataset.
    let output = align(&ingest.table, config)?;

    Ok(RunOutput {
        ingest,
        dataset: output.dataset,
        audit: output.audit,
    })
}
