use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wh_cli::commands::{report, rules, util};
use wh_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;

    match &cli.command {
        Some(Commands::Report(args)) => {
            args.apply(&mut config);
            tracing::debug!(?config, "loaded configuration");
            let color = !args.json && util::color_enabled(args.no_color);
            report::run(&config, args.oldest_first, color, args.json)?;
        }
        Some(Commands::Rules { json }) => {
            tracing::debug!(?config, "loaded configuration");
            rules::run(&config, *json)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
