//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - input configuration enums (`OptimizerMode`, `ExponentScope`)
//! - raw table types (`CellValue`, `YearSpec`, `RawObservation`, `RawTable`)
//! - reconstruction and output types (`CountrySeries`, `AlignedDataset`)

pub mod types;

pub use types::*;
