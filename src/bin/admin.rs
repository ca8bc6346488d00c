//! CLI administration tool for url-resolver.
//!
//! Inspects stored mappings and performs database and cache maintenance
//! without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Show the mapping behind a short code
//! cargo run --bin admin -- lookup K3x9Q1mZ
//!
//! # Show the short code for a URL
//! cargo run --bin admin -- reverse https://example.com/a
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Re-fill Redis for the 1000 newest mappings
//! cargo run --bin admin -- cache warm --limit 1000
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string, or the `DB_*` components
//! - `REDIS_URL` (for `cache warm`): Redis connection string, or the `REDIS_*` components
//! - `CACHE_TTL_SECONDS` (for `cache warm`): TTL of written entries

use url_resolver::application::services::CacheAside;
use url_resolver::application::services::cache_aside::DEFAULT_CACHE_TTL;
use url_resolver::config::Config;
use url_resolver::domain::entities::UrlMapping;
use url_resolver::domain::repositories::MappingStore;
use url_resolver::infrastructure::cache::RedisCache;
use url_resolver::infrastructure::persistence::PgMappingStore;
use url_resolver::utils::url_input::{canonical_url, prepare_url};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

/// CLI tool for managing url-resolver.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Show the mapping for a short code
    Lookup {
        /// Short code to resolve
        code: String,
    },

    /// Show the mapping for an original URL
    Reverse {
        /// Original URL (normalized before lookup)
        url: String,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },

    /// Cache operations
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

/// Cache maintenance subcommands.
#[derive(Subcommand)]
enum CacheAction {
    /// Write both cache directions for the newest mappings
    Warm {
        /// Number of mappings to load
        #[arg(short, long, default_value_t = 1000)]
        limit: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = Config::load_database_url()?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let store = PgMappingStore::new(Arc::new(pool));

    match cli.command {
        Commands::Lookup { code } => handle_lookup(&store, &code).await?,
        Commands::Reverse { url } => handle_reverse(&store, &url).await?,
        Commands::Stats => handle_stats(&store).await?,
        Commands::Db { action } => handle_db_action(action, &store).await?,
        Commands::Cache { action } => handle_cache_action(action, &store).await?,
    }

    Ok(())
}

async fn handle_lookup(store: &PgMappingStore, code: &str) -> Result<()> {
    println!("{}", "🔍 Lookup".bright_blue().bold());
    println!();

    let mapping = store
        .find_by_short_code(code)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    print_mapping(mapping.as_ref(), code);
    Ok(())
}

/// Looks up a URL the same way the shorten endpoint would store it.
async fn handle_reverse(store: &PgMappingStore, url: &str) -> Result<()> {
    println!("{}", "🔍 Reverse lookup".bright_blue().bold());
    println!();

    let normalized = canonical_url(&prepare_url(url)).context("Invalid URL")?;

    let mapping = store
        .find_by_original_url(&normalized)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    print_mapping(mapping.as_ref(), &normalized);
    Ok(())
}

fn print_mapping(mapping: Option<&UrlMapping>, query: &str) {
    match mapping {
        Some(m) => {
            println!("  ID:       {}", m.id.to_string().bright_black());
            println!("  Code:     {}", m.short_code.bright_yellow().bold());
            println!("  URL:      {}", m.original_url.cyan());
            println!(
                "  Created:  {}",
                m.created_at
                    .format("%Y-%m-%d %H:%M:%S UTC")
                    .to_string()
                    .bright_black()
            );
        }
        None => println!("  {} {}", "No mapping found for".yellow(), query.bold()),
    }
    println!();
}

/// Displays mapping count and the most recent creation time.
async fn handle_stats(store: &PgMappingStore) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let total = store
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let latest = store
        .list_recent(1)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Mappings:     {}",
        total.to_string().bright_green().bold()
    );
    match latest.first() {
        Some(m) => println!(
            "  Last created: {} ({})",
            m.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_white(),
            m.short_code.bright_black()
        ),
        None => println!("  Last created: {}", "never".bright_black()),
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, store: &PgMappingStore) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            store
                .ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(store.pool())
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}

/// Handles cache maintenance commands.
async fn handle_cache_action(action: CacheAction, store: &PgMappingStore) -> Result<()> {
    match action {
        CacheAction::Warm { limit, yes } => warm_cache(store, limit, yes).await,
    }
}

/// Re-fills Redis with both directions of the newest mappings.
///
/// Entries are written with `CACHE_TTL_SECONDS` (default 30 days). Write
/// failures are logged by the cache layer and do not stop the run.
async fn warm_cache(store: &PgMappingStore, limit: i64, skip_confirm: bool) -> Result<()> {
    println!("{}", "🔥 Warm cache".bright_blue().bold());
    println!();

    if limit <= 0 {
        anyhow::bail!("--limit must be positive, got {}", limit);
    }

    let redis_url = Config::load_redis_url().context("REDIS_URL or REDIS_HOST must be set")?;
    let ttl = std::env::var("CACHE_TTL_SECONDS")
        .ok()
        .and_then(|v| v.parse().ok())
        .filter(|&secs: &u64| secs > 0)
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_CACHE_TTL);

    let mappings = store
        .list_recent(limit)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    if mappings.is_empty() {
        println!("{}", "  No mappings to load".yellow());
        return Ok(());
    }

    println!(
        "  Mappings: {}",
        mappings.len().to_string().bright_white().bold()
    );
    println!("  TTL:      {}s", ttl.as_secs().to_string().bright_white());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Write these mappings to Redis?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let redis = RedisCache::connect(&redis_url)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let cache = CacheAside::new(Arc::new(redis), ttl);

    for mapping in &mappings {
        cache.fill(&mapping.original_url, &mapping.short_code).await;
    }

    println!(
        "{}",
        format!("✅ Cached {} mappings", mappings.len()).green().bold()
    );
    println!();

    Ok(())
}
