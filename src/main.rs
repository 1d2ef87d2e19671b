use clap::Parser;
use std::process;

use chartscope_cli::cli::Cli;
use chartscope_cli::config;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> chartscope_cli::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    // Load configuration
    let config = config::load_config(cli.config.as_deref())?;

    // Execute command
    chartscope_cli::run_command(cli.command, &config)
}
