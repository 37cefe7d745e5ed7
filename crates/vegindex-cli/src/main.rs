mod commands;
mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vegindex_core::consts::{ARCHIVE_DIR_ENV, DEFAULT_ARCHIVE_DIR};

#[derive(Parser)]
#[command(name = "vegindex", about = "Vegetation index time series for camera sites")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Root of the image archive
    #[arg(long, global = true, env = ARCHIVE_DIR_ENV, default_value = DEFAULT_ARCHIVE_DIR)]
    archive_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build or update the per-image RGB or IR statistics series
    Roistats(commands::roistats::RoistatsArgs),
    /// Build or update the periodic GCC summary
    Summary(commands::summary::SummaryArgs),
    /// Merge RGB and IR series into the per-image NDVI series
    Ndvi(commands::ndvi::NdviArgs),
    /// Build the periodic NDVI summary
    NdviSummary(commands::ndvi_summary::NdviSummaryArgs),
    /// Validate and print an ROI list
    Roilist(commands::roilist::RoilistArgs),
    /// Print or save the default ROI configuration
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let archive_dir = cli.archive_dir.as_path();
    match &cli.command {
        Commands::Roistats(args) => commands::roistats::run(archive_dir, args),
        Commands::Summary(args) => commands::summary::run(archive_dir, args),
        Commands::Ndvi(args) => commands::ndvi::run(archive_dir, args),
        Commands::NdviSummary(args) => commands::ndvi_summary::run(archive_dir, args),
        Commands::Roilist(args) => commands::roilist::run(archive_dir, args),
        Commands::Config(args) => commands::config::run(args),
    }
}
