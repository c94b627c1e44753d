//! Year-range alignment engine.
//!
//! Responsibilities:
//!
//! - parse reporting-period encodings ("2010", "2008-2009", sentinels)
//! - score candidate series for smoothness
//! - tune the interpolation curve shape by hill climbing
//! - reconstruct one dense series per country (parallel across countries)
//! - assemble the final (country, year)-ordered dataset

pub mod aligner;
pub mod interp;
pub mod optimizer;
pub mod reconstruct;
pub mod smoothness;
pub mod year_spec;

pub use aligner::*;
pub use interp::*;
pub use optimizer::*;
pub use reconstruct::*;
pub use smoothness::*;
pub use year_spec::*;
