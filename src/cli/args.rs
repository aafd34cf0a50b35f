//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Fingerprint static assets and publish them with far-future cache headers
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: asset_id.toml, searched upward)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fingerprint every cataloged asset and upload it to the store
    #[command(visible_alias = "p")]
    Publish {
        #[command(flatten)]
        args: PublishArgs,
    },

    /// Print `path -> fingerprinted path` without touching the store
    #[command(visible_alias = "f")]
    Fingerprint {
        #[command(flatten)]
        args: FingerprintArgs,
    },
}

/// Flags shared by every subcommand.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Publish command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PublishArgs {
    /// Compute fingerprints and headers, make no store calls
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Print `path -> fingerprinted path` for every asset
    #[arg(short, long)]
    pub debug: bool,

    /// Worker threads (default: number of CPUs)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Skip keys the store already holds
    #[arg(short, long)]
    pub skip_existing: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Fingerprint command arguments.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct FingerprintArgs {
    /// Asset files or directories, relative to the public root.
    /// If omitted, every cataloged asset is printed.
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

impl Cli {
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Publish { args } => args.common.verbose,
            Commands::Fingerprint { args } => args.common.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_publish() {
        let cli = Cli::parse_from(["asset-id", "publish", "--dry-run", "-j", "4", "--debug"]);
        let Commands::Publish { args } = cli.command else {
            panic!("expected publish");
        };
        assert!(args.dry_run);
        assert!(args.debug);
        assert_eq!(args.jobs, Some(4));
        assert!(!args.skip_existing);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "asset-id",
            "fingerprint",
            "images/logo.png",
            "-C",
            "site/asset_id.toml",
            "-V",
        ]);
        assert!(cli.verbose());
        assert_eq!(cli.config, Some(PathBuf::from("site/asset_id.toml")));
        let Commands::Fingerprint { args } = cli.command else {
            panic!("expected fingerprint");
        };
        assert_eq!(args.paths, vec!["images/logo.png"]);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
