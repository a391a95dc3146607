#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command line entry point for the street heat toolchain.
//!
//! Composes one short text per street segment describing its surface
//! temperature, exports the segments that have no data, and looks up the
//! house-number range of a single segment.
//!
//! Uses `indicatif-log-bridge` (via [`street_heat_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod config;
mod pipeline;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use street_heat_segment_models::SegmentId;

use crate::config::PipelineConfig;

#[derive(Parser)]
#[command(name = "street_heat", about = "Street segment heat text generator")]
struct Cli {
    /// TOML configuration file (defaults to the built-in configuration)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory the configured input files are read from
    #[arg(long, global = true, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compose, validate and write the shuffled text CSV
    Compose {
        /// Output CSV (overrides the configured file)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Shuffle seed for reproducible output order
        #[arg(long)]
        seed: Option<u64>,

        /// Maximum text length in characters
        #[arg(long)]
        char_limit: Option<usize>,
    },
    /// Export street segments with no data as `GeoJSON`
    NoData {
        /// Output `GeoJSON` file (overrides the configured file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the house-number range of one segment
    Range {
        /// Segment identifier
        segment_id: i64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = street_heat_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Compose {
            output,
            seed,
            char_limit,
        } => {
            if let Some(seed) = seed {
                config.output.seed = Some(seed);
            }
            if let Some(char_limit) = char_limit {
                config.char_limit = char_limit;
            }
            let output = output.unwrap_or_else(|| PathBuf::from(&config.output.file));
            pipeline::run_compose(&config, &cli.data_dir, &output, &multi)?;
        }
        Commands::NoData { output } => {
            let Some(output) = pipeline::no_data_path(&config, output) else {
                return Err("No no-data output file configured; pass --output".into());
            };
            pipeline::run_no_data(&config, &cli.data_dir, &output)?;
        }
        Commands::Range { segment_id } => {
            let range = pipeline::run_range(&config, &cli.data_dir, SegmentId(segment_id))?;
            if range.is_empty() {
                println!("{segment_id}: no house numbers");
            } else {
                println!("{segment_id}: {range}");
            }
        }
    }

    Ok(())
}
