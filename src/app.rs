//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs ingest + alignment
//! - prints reports/plots
//! - writes optional exports

use clap::Parser;

use crate::cli::{AlignArgs, Cli, Command, DiffArgs, MergeArgs, PlotArgs, SampleArgs};
use crate::domain::AlignConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `hsa` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Align(args) => handle_align(args),
        Command::Merge(args) => handle_merge(args),
        Command::Diff(args) => handle_diff(args),
        Command::Sample(args) => handle_sample(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_align(args: AlignArgs) -> Result<(), AppError> {
    let config = align_config_from_args(&args);
    let run = pipeline::run_align(&config)?;

    println!(
        "{}",
        crate::report::format_run_summary(&run.ingest, &run.audit, &run.dataset, &config)
    );

    if let Some(path) = &config.out {
        crate::io::export::write_aligned_csv(path, &run.dataset)?;
        println!("Aligned table written to '{}'.", path.display());
    }
    if let Some(path) = &config.summary_json {
        let summary = crate::io::export::RunSummaryFile::new(
            &config,
            run.ingest.rows_read,
            run.ingest.rows_used,
            &run.ingest.row_errors,
            &run.audit,
        );
        crate::io::export::write_summary_json(path, &summary)?;
        println!("Run summary written to '{}'.", path.display());
    }

    Ok(())
}

fn handle_merge(args: MergeArgs) -> Result<(), AppError> {
    let stats = crate::io::merge::merge_sources(
        &args.mortality,
        args.nutrition.as_deref(),
        &args.out,
        &args.country_col,
        &args.year_col,
    )?;

    println!(
        "Merged {} source file(s): base rows={} | joined rows={} (matched {}) | output rows={}",
        stats.source_files, stats.base_rows, stats.joined_rows, stats.matched_rows, stats.out_rows
    );
    println!("Merged table written to '{}'.", args.out.display());
    Ok(())
}

fn handle_diff(args: DiffArgs) -> Result<(), AppError> {
    let first = crate::io::ingest::read_country_set(&args.first, &args.country_col)?;
    let second = crate::io::ingest::read_country_set(&args.second, &args.country_col)?;

    let discrepancy = crate::report::country_discrepancy(&first, &second);
    println!(
        "{}",
        crate::report::format_discrepancy(
            &discrepancy,
            &args.first.display().to_string(),
            &args.second.display().to_string(),
        )
    );
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    let options = crate::data::sample::SampleOptions {
        countries: args.countries,
        start_year: args.start_year,
        end_year: args.end_year,
        seed: args.seed,
        range_prob: args.range_prob,
        annotate_prob: args.annotate_prob,
        missing_prob: args.missing_prob,
    };
    let stats =
        crate::data::sample::write_sample_csv(&args.out, &options, &args.country_col, &args.year_col)?;

    println!(
        "Sample written to '{}': rows={} (range rows={}).",
        args.out.display(),
        stats.rows,
        stats.range_rows
    );
    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let series = crate::io::ingest::read_aligned_series(
        &args.input,
        &args.country,
        &args.metric,
        &args.country_col,
        &args.year_col,
    )?;

    let label = format!("{} / {}", args.country, args.metric);
    let plot = crate::plot::render_series_plot(&series, args.width, args.height, &label);
    println!("{plot}");
    Ok(())
}

/// Build the pipeline configuration from CLI flags.
pub fn align_config_from_args(args: &AlignArgs) -> AlignConfig {
    AlignConfig {
        input: args.input.clone(),
        optimizer: args.optimizer,
        exponent_scope: args.exponent_scope,
        initial_exponent: args.initial_exponent,
        iterations: args.iterations,
        seed: args.seed,
        filter_region: args.region,
        filter_tier: args.tier,
        strict: args.strict,
        country_column: args.country_col.clone(),
        year_column: args.year_col.clone(),
        out: args.out.clone(),
        summary_json: args.summary_json.clone(),
        show_dropped: args.show_dropped,
    }
}
