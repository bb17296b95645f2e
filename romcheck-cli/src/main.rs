mod report;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use romcheck_core::{collect, default_jobs, run, CollectOptions, Collected, Report};
use std::path::PathBuf;

/// Check that Game Boy ROM extensions match their headers
#[derive(Parser)]
#[command(
    name = "romcheck",
    about = "Check that .gb/.gbc extensions match the CGB flag in each ROM header",
    version,
    author
)]
struct Cli {
    /// ROM files, folders, or .zip/.7z archives
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Number of worker threads
    #[arg(short, long, default_value_t = default_jobs())]
    jobs: usize,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Row order
    #[arg(long, value_enum, default_value_t = Order::Discovery)]
    sort: Order,

    /// Path to the 7za executable used for .7z archives
    #[arg(long = "seven-zip", env = "ROMCHECK_7ZA")]
    seven_zip: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum Order {
    Discovery,
    Name,
}

/// Collects and checks every ROM under `paths`.
///
/// Fails only when nothing could be checked: no path exists, or none of
/// them held a `.gb`/`.gbc` file. Mismatches are not errors.
fn check_inputs(paths: &[PathBuf], options: &CollectOptions, jobs: usize) -> Result<(Collected, Report)> {
    let collected = collect(paths, options);
    if collected.existing_inputs == 0 {
        bail!("None of the given paths exist");
    }
    if collected.sources.is_empty() {
        let reasons: Vec<String> = collected.failures.iter().map(|f| f.to_string()).collect();
        if reasons.is_empty() {
            bail!("No .gb/.gbc files found");
        }
        bail!("No .gb/.gbc files found ({})", reasons.join("; "));
    }

    log::info!("Checking {} ROMs", collected.sources.len());
    let report = run(&collected.sources, jobs);
    Ok((collected, report))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let options = CollectOptions {
        seven_zip: cli.seven_zip,
    };
    let (collected, mut report) = check_inputs(&cli.paths, &options, cli.jobs)?;
    if matches!(cli.sort, Order::Name) {
        report.sort_by_name();
    }

    match cli.format {
        Format::Table => {
            report::print_failures(&collected.failures);
            report::print_table(&report);
        }
        Format::Json => report::print_json(&report, &collected.failures)?,
    }

    Ok(())
}
