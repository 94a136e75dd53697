//! tootsync CLI
//!
//! Mirrors a Mastodon account's toots into a Hugo content directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tootsync::{
    error::Result,
    models::Config,
    pipeline,
    services::MastodonClient,
    storage::{LocalStorage, TootStorage},
    utils::http,
};

/// tootsync - Mastodon to Hugo content sync
#[derive(Parser, Debug)]
#[command(name = "tootsync", version, about = "Mastodon to Hugo content sync")]

struct Cli {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, default_value = "tootsync.toml")]
    config: PathBuf,

    /// Content directory (overrides output.content_dir)
    #[arg(long, global = true)]
    content_dir: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch toots and update the content directory
    Sync {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Fetch toots into JSON snapshots
    Fetch {
        /// Directory for `{id}.json` snapshots
        #[arg(short, long, default_value = ".data")]
        output: PathBuf,
    },

    /// Update the content directory from JSON snapshots
    Render {
        /// Directory holding `{id}.json` snapshots
        #[arg(long, default_value = ".data")]
        data_dir: PathBuf,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Show content directory info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = Config::load_if_present(&cli.config)?;
    if let Some(dir) = cli.content_dir {
        config.output.content_dir = dir;
    }

    let storage = LocalStorage::new(&config.output.content_dir);

    match cli.command {
        Command::Sync { dry_run } => {
            config.validate()?;
            let client = http::create_client(&config.fetch)?;
            let source = MastodonClient::new(&config.server, client)?;

            let summary = match pipeline::run_sync(&config, &source, &storage, dry_run).await {
                Ok(summary) => summary,
                Err(e) => {
                    log::error!("Sync aborted: {}", e);
                    return Err(e);
                }
            };

            summary.report.log_summary();
            log::info!(
                "Synced {} toots over {} pages in {} ms",
                summary.stats.toot_count,
                summary.stats.pages_requested,
                summary.stats.elapsed_ms()
            );
        }

        Command::Fetch { output } => {
            config.validate()?;
            let client = http::create_client(&config.fetch)?;
            let source = MastodonClient::new(&config.server, client)?;
            let snapshots = LocalStorage::new(output);

            if let Err(e) = pipeline::run_fetch(&config, &source, &snapshots).await {
                log::error!("Fetch aborted: {}", e);
                return Err(e);
            }
        }

        Command::Render { data_dir, dry_run } => {
            let snapshots = LocalStorage::new(data_dir);
            let report = pipeline::run_render(&config, &snapshots, &storage, dry_run).await?;
            report.log_summary();
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!(
                "✓ Config OK ({} account {})",
                config.server.base_url,
                config.server.account_id
            );
        }

        Command::Info => {
            log::info!("Content directory: {}", storage.root().display());
            let known = storage.known_ids().await?;
            log::info!("Saved toots: {}", known.len());
        }
    }

    log::info!("Completed");

    Ok(())
}
