//! `hs-align` library crate.
//!
//! The binary (`hsa`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future notebooks, services, batch jobs)
//! - code stays easy to navigate as the project grows

pub mod align;
pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod plot;
pub mod report;
