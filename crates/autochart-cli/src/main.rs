//! autochart CLI - add charts to existing workbooks

use anyhow::{Context, Result};
use autochart::prelude::*;
use clap::{ArgAction, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autochart")]
#[command(
    author,
    version,
    about = "Add a chart of a cell range to an existing Excel workbook"
)]
struct Cli {
    /// Log more (-v info, -vv debug); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one chart and save the workbook in place
    Create {
        /// Workbook to update (.xlsx)
        #[arg(short, long)]
        file: PathBuf,

        /// Sheet holding the data
        #[arg(short, long)]
        sheet: String,

        /// Sheet to place the chart on (default: the data sheet)
        #[arg(short, long)]
        target_sheet: Option<String>,

        /// Top-left cell of the block (header row, category column)
        #[arg(long)]
        start: String,

        /// Bottom-right cell of the block
        #[arg(long)]
        end: String,

        /// bar, line, area, bubble, radar, pie, doughnut or scatter
        #[arg(short, long)]
        chart_type: String,

        /// Chart title
        #[arg(long)]
        title: String,

        /// Built-in chart style number
        #[arg(long, default_value_t = 10)]
        style: u8,
    },

    /// List the sheets of a workbook
    Sheets {
        /// Workbook to inspect
        input: PathBuf,
    },

    /// Run a JSON file of chart requests in order
    Batch {
        /// JSON array of requests
        requests: PathBuf,

        /// Built-in chart style number
        #[arg(long, default_value_t = 10)]
        style: u8,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Create {
            file,
            sheet,
            target_sheet,
            start,
            end,
            chart_type,
            title,
            style,
        } => {
            let form = ChartForm {
                file: file.to_string_lossy().into_owned(),
                source_sheet: sheet,
                target_sheet,
                start_cell: start,
                end_cell: end,
                chart_type,
                title,
            };
            create(&form, style)
        }
        Commands::Sheets { input } => sheets(&input),
        Commands::Batch { requests, style } => batch(&requests, style),
    }
}

/// Install a compact stderr subscriber; the level comes from `-v` unless
/// `RUST_LOG` is set
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn orchestrator(style: u8) -> Orchestrator {
    Orchestrator::with_options(ChartOptions {
        style,
        ..ChartOptions::default()
    })
}

fn create(form: &ChartForm, style: u8) -> Result<()> {
    let report = orchestrator(style)
        .submit(form)
        .with_context(|| format!("Failed to add chart to '{}'", form.file))?;

    println!("{}", report);
    Ok(())
}

fn sheets(input: &Path) -> Result<()> {
    let names = list_sheets(input)
        .with_context(|| format!("Failed to list sheets of '{}'", input.display()))?;

    for (i, name) in names.iter().enumerate() {
        println!("{}\t{}", i, name);
    }

    Ok(())
}

fn batch(requests: &Path, style: u8) -> Result<()> {
    let reports = orchestrator(style)
        .run_batch(requests)
        .with_context(|| format!("Batch '{}' failed", requests.display()))?;

    for report in &reports {
        println!("{}", report);
    }
    eprintln!("Added {} charts", reports.len());

    Ok(())
}
