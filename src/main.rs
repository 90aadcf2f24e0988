//! Sitefold main entry point
//!
//! Command-line interface for the sitefold website mirrorer.

use anyhow::Result;
use clap::Parser;
use sitefold::config::{load_config, parse_base_origin};
use sitefold::crawler::mirror;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Sitefold: mirror a website into a git-tracked local copy
///
/// Sitefold crawls every same-origin resource reachable from the configured
/// root pages - following HTML, CSS, and JavaScript references - and writes
/// an exact, statically-servable copy into the output directory, committing
/// the result as one snapshot.
#[derive(Parser, Debug)]
#[command(name = "sitefold")]
#[command(version)]
#[command(about = "Mirror a website into a git-tracked local copy", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be mirrored without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)?;

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    mirror(config).await?;
    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitefold=info,warn"),
            1 => EnvFilter::new("sitefold=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: validates config and shows what would be mirrored
fn handle_dry_run(config: &sitefold::Config) -> Result<()> {
    let base = parse_base_origin(&config.mirror.base_url)?;

    println!("=== sitefold dry run ===\n");
    println!("Base origin: {}", base);

    println!("\nRoots ({}):", config.mirror.roots.len());
    for root in &config.mirror.roots {
        println!("  - {} -> {}", root, base.join(root)?);
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    if config.output.skip_git {
        println!("  Git: skipped");
    } else {
        println!("  Branch: {}", config.output.branch);
    }
    println!("  Use original names: {}", config.output.use_original_names);
    if let Some(manifest) = &config.output.manifest_path {
        println!("  Manifest: {}", manifest);
    }

    println!("\n✓ Configuration is valid");
    Ok(())
}
