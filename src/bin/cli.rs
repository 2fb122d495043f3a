//! Tender Watch CLI
//!
//! Checks the tender listing once and notifies recipients about new tenders.
//! Meant to be run periodically (cron, CI schedule).

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tender_watch::{
    error::Result,
    models::{Config, RecipientList, RunMode},
    pipeline,
    services::{HttpPageSource, TelegramNotifier},
    storage::{LocalSeenStore, SeenStorage},
    utils::http,
};

/// Tender Watch - new tender notifications
#[derive(Parser, Debug)]
#[command(name = "tender-watch", version, about = "Tender listing watcher")]
struct Cli {
    /// Directory holding config, recipients and seen-set files
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Path to config file (default: {data_dir}/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check the listing and notify about new tenders
    Run,

    /// Validate configuration, credential and recipients
    Validate,

    /// Show seen-set and recipient info
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

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("config.toml"));
    let config = Config::load_or_default(&config_path);

    let result = match cli.command {
        Command::Run => run(&config, &cli.data_dir).await,
        Command::Validate => validate(&config, &cli.data_dir),
        Command::Info => info(&config, &cli.data_dir).await,
    };

    if let Err(e) = &result {
        log::error!("A critical error occurred: {}", e);
        log::debug!("{:?}", e);
    }
    result
}

async fn run(config: &Config, data_dir: &Path) -> Result<()> {
    // Configuration problems abort before any network activity.
    config.validate()?;
    let token = config.bot_token()?;
    let recipients = RecipientList::load(config.paths.recipients_path(data_dir))?;

    let client = http::create_async_client(&config.scrape)?;
    let source = HttpPageSource::new(client, config.site.clone());
    let notifier = TelegramNotifier::new(token);
    let storage = LocalSeenStore::new(config.paths.seen_path(data_dir));

    let summary =
        pipeline::run_check(config, &storage, &source, &notifier, &recipients).await?;

    log::info!(
        "--- Tender check complete in {}s. ---",
        (summary.end_time - summary.start_time).num_seconds()
    );
    Ok(())
}

fn validate(config: &Config, data_dir: &Path) -> Result<()> {
    log::info!("Validating configuration...");

    config.validate()?;
    log::info!("✓ Config OK");

    config.bot_token()?;
    log::info!("✓ {} is set", config.telegram.token_env);

    let recipients = RecipientList::load(config.paths.recipients_path(data_dir))?;
    log::info!("✓ {} recipient(s)", recipients.len());

    log::info!("All validations passed!");
    Ok(())
}

async fn info(config: &Config, data_dir: &Path) -> Result<()> {
    log::info!("Data directory: {}", data_dir.display());
    log::info!("Listing: {}", config.site.page_url(1)?);

    let storage = LocalSeenStore::new(config.paths.seen_path(data_dir));
    match storage.load().await {
        (_, RunMode::Priming) => log::info!("Seen-set: none (next run primes a baseline)"),
        (seen, RunMode::Steady) => log::info!("Seen-set: {} tender IDs", seen.len()),
    }

    match RecipientList::load(config.paths.recipients_path(data_dir)) {
        Ok(recipients) => log::info!("Recipients: {}", recipients.len()),
        Err(e) => log::warn!("Recipients: {}", e),
    }
    Ok(())
}
