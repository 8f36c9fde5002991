use anyhow::Result;
use clap::Parser;
use rbpick::cli::Cli;
use rbpick::commands;

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for results
    let default_filter = if cli.verbose {
        "rbpick=debug"
    } else {
        "rbpick=warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    commands::execute(cli)
}
