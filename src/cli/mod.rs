//! Command-line parsing for the year-range alignment tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the alignment/reconstruction code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::align::optimizer::{DEFAULT_INITIAL_EXPONENT, DEFAULT_ITERATIONS};
use crate::data::regions::{EconomicTier, Region};
use crate::domain::{ExponentScope, OptimizerMode};

/// Default name of the country column in WHO exports.
pub const DEFAULT_COUNTRY_COLUMN: &str = "Countries, territories and areas";

/// Default name of the reporting-period column.
pub const DEFAULT_YEAR_COLUMN: &str = "Year";

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "hsa", version, about = "Country health time-series aligner")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Align year-range observations into a dense per-year table.
    Align(AlignArgs),
    /// Merge per-indicator source CSVs into one raw table.
    Merge(MergeArgs),
    /// Report country-coverage differences between two CSVs.
    Diff(DiffArgs),
    /// Generate a synthetic messy input CSV (for demos and tests).
    Sample(SampleArgs),
    /// Plot one country/metric series from an aligned CSV.
    Plot(PlotArgs),
}

/// Options for the alignment run.
#[derive(Debug, Parser, Clone)]
pub struct AlignArgs {
    /// Raw observation CSV to align.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Write the aligned table to this CSV.
    #[arg(short = 'o', long)]
    pub out: Option<PathBuf>,

    /// Write the machine-readable run summary to this JSON file.
    #[arg(long = "summary-json")]
    pub summary_json: Option<PathBuf>,

    /// How candidate exponents are scored during hill climbing.
    #[arg(long, value_enum, default_value_t = OptimizerMode::Trial)]
    pub optimizer: OptimizerMode,

    /// How often the exponent is re-optimized.
    #[arg(long = "exponent-scope", value_enum, default_value_t = ExponentScope::PerRange)]
    pub exponent_scope: ExponentScope,

    /// Starting exponent for the search (1 = linear interpolation).
    #[arg(long = "initial-exponent", default_value_t = DEFAULT_INITIAL_EXPONENT)]
    pub initial_exponent: f64,

    /// Hill-climbing iteration budget per search.
    #[arg(long, default_value_t = DEFAULT_ITERATIONS)]
    pub iterations: usize,

    /// Base random seed (per-country generators derive from it).
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Keep only countries in this sub-region.
    #[arg(long, value_enum)]
    pub region: Option<Region>,

    /// Keep only countries in this income tier.
    #[arg(long, value_enum)]
    pub tier: Option<EconomicTier>,

    /// Fail on non-numeric text cells instead of passing them through.
    #[arg(long)]
    pub strict: bool,

    /// Name of the country column.
    #[arg(long = "country-col", default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_col: String,

    /// Name of the reporting-period column.
    #[arg(long = "year-col", default_value = DEFAULT_YEAR_COLUMN)]
    pub year_col: String,

    /// How many dropped rows to list in the terminal summary.
    #[arg(long = "show-dropped", default_value_t = 20)]
    pub show_dropped: usize,
}

/// Options for merging source files.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Per-indicator CSVs to concatenate (same shape, unnamed lead columns ok).
    #[arg(long = "mortality", num_args = 1.., required = true)]
    pub mortality: Vec<PathBuf>,

    /// Nutrition CSV to full-outer-join on (country, year).
    #[arg(long)]
    pub nutrition: Option<PathBuf>,

    /// Write the merged raw table to this CSV.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Name of the country column.
    #[arg(long = "country-col", default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_col: String,

    /// Name of the reporting-period column.
    #[arg(long = "year-col", default_value = DEFAULT_YEAR_COLUMN)]
    pub year_col: String,
}

/// Options for the country-coverage diff.
#[derive(Debug, Parser)]
pub struct DiffArgs {
    /// First CSV.
    pub first: PathBuf,

    /// Second CSV.
    pub second: PathBuf,

    /// Name of the country column in both files.
    #[arg(long = "country-col", default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_col: String,
}

/// Options for synthetic sample generation.
#[derive(Debug, Parser)]
pub struct SampleArgs {
    /// Write the generated CSV here.
    #[arg(short = 'o', long)]
    pub out: PathBuf,

    /// Number of synthetic countries.
    #[arg(short = 'n', long, default_value_t = 12)]
    pub countries: usize,

    /// First reporting year.
    #[arg(long = "start-year", default_value_t = 2000)]
    pub start_year: i32,

    /// Last reporting year.
    #[arg(long = "end-year", default_value_t = 2020)]
    pub end_year: i32,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Probability that a run of years collapses into one range row.
    #[arg(long = "range-prob", default_value_t = 0.25)]
    pub range_prob: f64,

    /// Probability that a written cell carries a text annotation.
    #[arg(long = "annotate-prob", default_value_t = 0.15)]
    pub annotate_prob: f64,

    /// Probability that a cell is left blank.
    #[arg(long = "missing-prob", default_value_t = 0.2)]
    pub missing_prob: f64,

    /// Name of the country column.
    #[arg(long = "country-col", default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_col: String,

    /// Name of the reporting-period column.
    #[arg(long = "year-col", default_value = DEFAULT_YEAR_COLUMN)]
    pub year_col: String,
}

/// Options for plotting an aligned series.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Aligned CSV produced by `hsa align --out`.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Country to plot.
    #[arg(short = 'c', long)]
    pub country: String,

    /// Metric column to plot.
    #[arg(short = 'm', long)]
    pub metric: String,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Name of the country column.
    #[arg(long = "country-col", default_value = DEFAULT_COUNTRY_COLUMN)]
    pub country_col: String,

    /// Name of the reporting-period column.
    #[arg(long = "year-col", default_value = DEFAULT_YEAR_COLUMN)]
    pub year_col: String,
}
