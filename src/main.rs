use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

mod config;

use mirage::db::sqlite::SqliteStore;
use mirage::db::Store;
use mirage::mirror::engine::MirrorThresholds;
use mirage::output::terminal;
use mirage::pipeline;

/// Mirage: content fingerprinting and mirror-site clustering.
///
/// Deduplicates crawled pages by content, classifies them by topic, and
/// detects distinct domains serving the same or near-identical content.
#[derive(Parser)]
#[command(name = "mirage", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database
    Init,

    /// Load a day's scraped-records JSON file into the store
    Ingest {
        /// Path to a JSON array of scraped records
        file: PathBuf,

        /// Processing day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Build the fingerprint index for a day
    Fingerprints {
        /// Processing day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Rebuild title groups across all fingerprinted days
    GroupTitles {
        /// Day to store the groups under (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Detect mirror clusters for a day's title groups
    DetectMirrors {
        /// Processing day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Number of title groups to cluster in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// Run fingerprints, title grouping, and mirror detection for a day
    Run {
        /// Processing day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Number of title groups to cluster in parallel (default: 8)
        #[arg(long, default_value = "8")]
        concurrency: usize,
    },

    /// Display a stored mirror report
    Report {
        /// Report day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,
    },

    /// Show system status (stored days, last run, DB stats)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("mirage=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            info!("Initializing Mirage database...");
            let config = config::Config::load()?;
            let store = init_store(&config)?;
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nMirage is ready. Next step: ingest a day of scraped records:");
            println!("  cargo run -- ingest scraped_2025-10-18.json --date 2025-10-18");
        }

        Commands::Ingest { file, date } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;
            let count = pipeline::ingest::run(&store, &file, &day).await?;
            println!("Ingested {count} records for {day}.");
        }

        Commands::Fingerprints { date } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;
            let entries = pipeline::fingerprints::run(&store, &day).await?;
            println!("Fingerprint index for {day}: {entries} unique entries.");
        }

        Commands::GroupTitles { date } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;
            let groups = pipeline::titles::run(&store, &day).await?;
            println!("Grouped titles for {day}: {groups} candidate groups (≥2 URLs).");
        }

        Commands::DetectMirrors { date, concurrency } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;
            let report =
                pipeline::mirrors::run(&store, &day, concurrency, MirrorThresholds::default())
                    .await?;
            terminal::display_mirror_report(&day, &report);
        }

        Commands::Run { date, concurrency } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;

            println!("{}", format!("=== Processing {day} ===").bold());
            let report = pipeline::run_day(&store, &day, concurrency).await?;
            terminal::display_mirror_report(&day, &report);
        }

        Commands::Report { date } => {
            let config = config::Config::load()?;
            let store = open_store(&config)?;
            let day = resolve_date(date)?;
            match store.get_mirror_report(&day).await? {
                Some(report) => terminal::display_mirror_report(&day, &report),
                None => {
                    println!("No mirror report stored for {day}.");
                    println!("Run `mirage detect-mirrors --date {day}` first.");
                }
            }
        }

        Commands::Status => {
            let config = config::Config::load()?;
            if !std::path::Path::new(&config.db_path).exists() {
                println!("Database: not initialized");
                println!("\nRun `mirage init` to set up the database.");
                return Ok(());
            }
            let store = open_store(&config)?;
            mirage::status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}

/// Open (or create) the database and wrap it in the Store trait.
fn init_store(config: &config::Config) -> Result<Arc<dyn Store>> {
    let conn = mirage::db::initialize(&config.db_path)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Open an existing database (directs the user to `init` if missing).
fn open_store(config: &config::Config) -> Result<Arc<dyn Store>> {
    let conn = mirage::db::open(&config.db_path)?;
    Ok(Arc::new(SqliteStore::new(conn)))
}

/// Resolve an optional --date argument, defaulting to the local day.
fn resolve_date(date: Option<String>) -> Result<String> {
    match date {
        Some(raw) => {
            NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                .map_err(|_| anyhow::anyhow!("Invalid date '{raw}', expected YYYY-MM-DD"))?;
            Ok(raw)
        }
        None => Ok(Local::now().format("%Y-%m-%d").to_string()),
    }
}
