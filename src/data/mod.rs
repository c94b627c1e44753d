//! Static reference data and synthetic sample generation.
//!
//! - WHO-style sub-region and World Bank income-tier lookups (`regions`)
//! - deterministic messy-CSV generator for demos and tests (`sample`)

pub mod regions;
pub mod sample;

pub use regions::*;
pub use sample::*;
