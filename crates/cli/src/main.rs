use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use classify::commands::{
    apply_scan_flags, list_classifiers_command, scan_command, show_config_command,
};
use classify::logging::init_logging;
use classify_core::config::load_config;
use tracing::debug;

/// Fingerprint language runtimes and standalone binaries inside a directory tree.
///
/// This CLI is a thin wrapper around `classify-core` (exposed in code as
/// `classify_core`). All substantive logic lives in the library so it can be
/// tested thoroughly and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "classify",
    version,
    about = "Fingerprint runtimes and binaries inside a filesystem tree",
    long_about = None
)]
struct Cli {
    /// Config file to use instead of the discovered one.
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all log output.
    #[arg(short = 'q', long = "quiet", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a directory and report every recognized artifact.
    ///
    /// Files are only read, never executed. Reads are bounded per classifier.
    Scan {
        /// Directory to scan.
        path: String,

        /// View of the source: squashed or all-layers.
        #[arg(long)]
        scope: Option<String>,

        /// Report format: json or table.
        #[arg(short = 'o', long)]
        output: Option<String>,

        /// Include the SHA-256 of every classified file.
        #[arg(long, default_value_t = false)]
        digests: bool,

        /// Worker threads (0 = one per CPU).
        #[arg(long)]
        parallelism: Option<usize>,
    },

    /// List the effective classifiers in evaluation order.
    Classifiers {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Print the effective configuration as YAML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if cli.quiet {
        config.quiet = true;
    }
    if let Command::Scan { scope, output, parallelism, .. } = &cli.command {
        apply_scan_flags(&mut config, scope.clone(), output.clone(), *parallelism);
    }

    let settings = config.resolve(cli.verbose).context("Invalid configuration")?;
    init_logging(&settings.log)?;
    match &config.config_path {
        Some(path) => debug!("Using config {}", path.display()),
        None => debug!("Using default config"),
    }

    match cli.command {
        Command::Scan { path, digests, .. } => scan_command(&path, &config, &settings, digests)?,
        Command::Classifiers { json } => list_classifiers_command(&config, json)?,
        Command::Config => show_config_command(&config)?,
    }

    Ok(())
}
