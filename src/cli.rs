use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chartscope")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify the network exposure of Helm chart workloads")]
#[command(
    long_about = "A CLI tool that statically analyzes a repository of Helm charts and associated Dockerfiles, classifies every deployable workload's declared network exposure, propagates exposure across chart dependencies, and renders the resulting risk topology."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a repository of Helm charts and classify workload exposure
    Scan {
        /// Path to the repository root to scan
        #[arg(value_name = "REPO_PATH")]
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value = "console")]
        format: ScanOutputFormat,

        /// Write output to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Output format options for the scan command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ScanOutputFormat {
    /// Machine-readable JSON result
    Json,
    /// Human-readable summary with colors
    #[default]
    Console,
    /// Chart source paths with their exposure rollup
    Paths,
}

impl Cli {
    pub fn init_logging(&self) {
        if self.quiet {
            return;
        }

        let level = match self.verbose {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            2 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };

        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }
}
