//! # Chartscope CLI
//!
//! A Rust-based command-line application that statically analyzes a
//! repository of Helm charts (and associated Dockerfiles) and classifies,
//! for every deployable workload, how reachable it is from the public
//! network.
//!
//! ## Features
//!
//! - **Exposure Classification**: Three-tier scoring (LOW/MEDIUM/HIGH) from
//!   declared ingress and service configuration, per environment overlay
//! - **Dependency Propagation**: Charts one hop behind an exposed chart are
//!   upgraded to linked exposure
//! - **Source-Path Mapping**: Dockerfile copy paths consolidated into a
//!   triage index mapping code locations to network exposure
//! - **Topology Rendering**: Network partition plus a Mermaid diagram of the
//!   exposure graph
//!
//! ## Example
//!
//! ```rust,no_run
//! use chartscope_cli::scanner::ExposureScanner;
//! use std::path::Path;
//!
//! # fn main() -> chartscope_cli::Result<()> {
//! let scanner = ExposureScanner::new();
//! let result = scanner.scan(Path::new("./my-repo"))?;
//! println!("{} containers", result.scan_summary.total_containers);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod scanner;

// Re-export commonly used types and functions
pub use error::{ChartScopeError, Result};
pub use scanner::{ContainerRecord, ExposureLevel, ExposureScanner, GatewayType, ScanResult};

use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Scan {
            path,
            format,
            output,
        } => handlers::handle_scan(path, format, output, config),
    }
}
