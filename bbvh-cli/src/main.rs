mod commands;

use clap::{Parser, Subcommand};
use colored::*;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "bbvh")]
#[command(about = "BBVH - Binary BioVision Hierarchy converter", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a BVH file into a BBVH container
    Convert {
        /// Input BVH file ("-" reads stdin)
        #[arg(short, long)]
        input: String,

        /// Output BBVH file
        #[arg(short, long)]
        output: String,

        /// Encoding mode: 1 = 16-bit integer, 2 = float, 3 = 8-bit integer
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
        mode: u8,

        /// Do not append the END footer
        #[arg(long)]
        no_end_marker: bool,

        /// Write a JSON summary of the conversion to this file
        #[arg(long)]
        summary: Option<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    // Execute command
    let result = match cli.command {
        Commands::Convert {
            input,
            output,
            mode,
            no_end_marker,
            summary,
        } => commands::convert::execute(&input, &output, mode, !no_end_marker, summary.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("{} Conversion failed", "✗".red());
            ExitCode::FAILURE
        }
    }
}
