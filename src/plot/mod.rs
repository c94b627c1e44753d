//! Terminal plotting for aligned series.

pub mod ascii;

pub use ascii::*;
