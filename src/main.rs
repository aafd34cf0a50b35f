//! asset-id - fingerprint static web assets and publish them to an object store.

mod asset;
mod cli;
mod config;
mod core;
mod logger;
mod publish;
mod store;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::AssetIdConfig;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let mut config = AssetIdConfig::load(cli.config.as_deref())?;

    let success = match &cli.command {
        Commands::Publish { args } => {
            config.apply_publish_args(args);
            config.validate()?;
            cli::publish::publish_assets(&config, args)?
        }
        Commands::Fingerprint { args } => cli::fingerprint::print_fingerprints(&config, args)?,
    };

    if !success {
        std::process::exit(1);
    }
    Ok(())
}
