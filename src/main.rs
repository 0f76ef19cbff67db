//! FPGA Report Studio CLI
//!
//! Collects FPGA toolchain implementation reports under a directory and
//! writes one comparable summary per implementation.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use fpga_report_studio::commands::{
    display_format, display_version, execute_analyze, validate_args, validate_summary_file,
    AnalyzeArgs,
};
use fpga_report_studio::utils::config::DEFAULT_SUMMARY_OUTPUT;

/// FPGA Report Studio - implementation report aggregation
#[derive(Parser, Debug)]
#[command(name = "fpga-report")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Collect and merge reports into a summary
    Analyze {
        /// Directory searched for toolchain reports
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Directory holding previously exported summary text files
        #[arg(short, long)]
        summary_dir: Option<PathBuf>,

        /// Output path for the summary text
        #[arg(short, long, default_value = DEFAULT_SUMMARY_OUTPUT)]
        output: PathBuf,

        /// Output path for the JSON dataset (optional)
        #[arg(long)]
        json: Option<PathBuf>,

        /// TOML file overriding report patterns and field names
        #[arg(short, long, env = "FPGA_REPORT_CONFIG")]
        config: Option<PathBuf>,

        /// Number of extraction threads
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Print comparison tables to stdout
        #[arg(long)]
        print: bool,
    },

    /// Validate a summary text file
    Validate {
        /// Path to summary text file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Display summary format information
    Format {
        /// Show full format details
        #[arg(long)]
        show: bool,
    },

    /// Display version information
    Version,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Analyze {
            root,
            summary_dir,
            output,
            json,
            config,
            jobs,
            print,
        } => {
            let args = AnalyzeArgs {
                root,
                summary_dir,
                output_summary: output,
                output_json: json,
                config_path: config,
                jobs,
                print_summary: print,
            };

            // Validate args first
            validate_args(&args)?;

            execute_analyze(args)?;
        }

        Commands::Validate { file } => {
            validate_summary_file(file)?;
        }

        Commands::Format { show } => {
            display_format(show);
        }

        Commands::Version => {
            display_version();
        }
    }

    Ok(())
}
