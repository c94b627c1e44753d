//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - aligned CSV / summary JSON exports (`export`)
//! - multi-source merge into one raw table (`merge`)

pub mod export;
pub mod ingest;
pub mod merge;

pub use export::*;
pub use ingest::*;
pub use merge::*;
