//! Debt Projection CLI
//!
//! Builds the historical balance sheet from per-category CSV series, sets up
//! the rate forecast curves (presets and/or a saved scenario) and writes the
//! combined history and projection to CSV.

use anyhow::{bail, Context};
use clap::Parser;
use debt_projection::{
    forecast::{CsvScenarioStore, DEFAULT_SCENARIO_PATH},
    history::loader::{load_category_sources, DEFAULT_HISTORY_PATH},
    projection::write_balance_sheet_csv,
    DebtCategory, HistoricalAggregator, ProjectionConfig, ScenarioRunner,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "Project government debt and interest cost under rate scenarios")]
struct Args {
    /// Directory holding the per-category series CSV files
    #[arg(long, default_value = DEFAULT_HISTORY_PATH)]
    data_dir: PathBuf,

    /// Debt categories to include
    #[arg(long, value_delimiter = ',', default_value = "bonds,notes,bills")]
    categories: Vec<DebtCategory>,

    /// Rate files are in percent rather than decimal fractions
    #[arg(long)]
    rates_in_percent: bool,

    /// Directory holding saved scenarios
    #[arg(long, default_value = DEFAULT_SCENARIO_PATH)]
    scenario_dir: PathBuf,

    /// Load this scenario's control points
    #[arg(long)]
    scenario: Option<String>,

    /// Seed the curves with the preset rate paths
    #[arg(long)]
    presets: bool,

    /// Save the curves used for this run under the given scenario name
    #[arg(long)]
    save_scenario: Option<String>,

    /// Projection config JSON (step size, fiscal inputs, issuance split)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output CSV path
    #[arg(long, default_value = "projection_output.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.scenario.is_none() && !args.presets {
        bail!("no forecast control points: pass --presets and/or --scenario <name>");
    }

    let config = match &args.config {
        Some(path) => ProjectionConfig::from_json_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => ProjectionConfig::default(),
    };

    let rate_scale = if args.rates_in_percent { 0.01 } else { 1.0 };
    let mut sources = Vec::with_capacity(args.categories.len());
    for category in &args.categories {
        sources.push(
            load_category_sources(&args.data_dir, *category, rate_scale)
                .with_context(|| {
                    format!("loading {} series from {}", category, args.data_dir.display())
                })?,
        );
    }

    let history = HistoricalAggregator::aggregate(&sources)?;
    println!(
        "History: {} rows, {} to {}",
        history.len(),
        history.rows()[0].date,
        history.rows()[history.len() - 1].date
    );

    for category in history.categories() {
        let comparison = history
            .category_series(*category)
            .map(|series| series.estimated_vs_actual())
            .unwrap_or_default();
        if let Some(last) = comparison.last() {
            println!(
                "  {}: estimated interest {:.2}B vs actual {:.2}B over {} months",
                category,
                last.cumulative_estimated * 1e-9,
                last.cumulative_actual * 1e-9,
                comparison.len()
            );
        }
    }

    let runner = ScenarioRunner::new(history, config);
    let mut curves = runner.base_forecasts(args.presets)?;

    let mut store = CsvScenarioStore::new(&args.scenario_dir);
    if let Some(name) = &args.scenario {
        curves
            .load_scenario(&store, name)
            .with_context(|| format!("loading scenario '{}'", name))?;
    }
    if let Some(name) = &args.save_scenario {
        curves.save_scenario(&mut store, name)?;
        println!("Saved scenario '{}' to {}", name, store.root().display());
    }

    let result = runner.run(&curves)?;

    let file = File::create(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    write_balance_sheet_csv(file, runner.history(), &result)?;

    let summary = result.summary();
    println!(
        "\nProjection ({} steps, {} to {}):",
        summary.steps, summary.start_date, summary.end_date
    );
    println!("{:>12} {:>16} {:>16}", "Date", "Total Debt", "Monthly Int");
    println!("{}", "-".repeat(46));
    for row in result.rows.iter().step_by(6) {
        println!(
            "{:>12} {:>15.2}T {:>15.2}B",
            row.date,
            row.total_debt * 1e-12,
            row.total_interest * 1e-9
        );
    }

    println!("\nSummary:");
    println!("  Initial Total Debt: {:.2}T", summary.initial_total_debt * 1e-12);
    println!("  Final Total Debt: {:.2}T", summary.final_total_debt * 1e-12);
    println!("  Total New Issuance: {:.2}T", summary.total_new_issuance * 1e-12);
    println!("  Final Monthly Interest: {:.2}B", summary.final_monthly_interest * 1e-9);
    println!("  Peak Monthly Interest: {:.2}B", summary.peak_monthly_interest * 1e-9);
    println!("\nFull results written to: {}", args.output.display());

    Ok(())
}
