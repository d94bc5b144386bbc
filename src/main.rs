// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

mod api;
mod config;
mod db;
mod error;
mod log;
mod models;
mod service;

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use api::{AppState, RatesClient};
use config::Config;
use service::RateCache;

#[derive(Parser)]
#[command(version, about = "Currency conversion service with a cached rate catalog")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve,
    /// Seed the currency catalog if it is empty
    Init,
    /// List the currency catalog
    Currencies,
    /// Convert an amount between two currencies
    Convert {
        from: String,
        to: String,
        amount: String,
    },
    /// Fetch fresh rates for a base currency
    Refresh {
        #[arg(long)]
        base: Option<String>,
    },
    /// Show all cached rates for a base currency
    Rates {
        #[arg(long)]
        base: Option<String>,
    },
    /// Export cached rates for a base currency to CSV
    ExportRates {
        #[arg(long)]
        base: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    log::init_logging(cli.verbose);

    let config = config::load_config(&cli.config)?;
    let pool = db::create_db_pool(&config.database_url).await?;
    let client = RatesClient::with_timeout(
        &config.provider_url,
        Duration::from_secs(config.provider_timeout_secs),
    )?;
    let cache = Arc::new(RateCache::new(pool.clone(), Arc::new(client)));

    let result = match cli.command {
        Commands::Serve => serve(&config, pool, cache).await,
        Commands::Init => init(&config, &cache).await,
        Commands::Currencies => list_currencies(&pool).await,
        Commands::Convert { from, to, amount } => convert(&cache, &from, &to, &amount).await,
        Commands::Refresh { base } => refresh(&config, &cache, base).await,
        Commands::Rates { base } => show_rates(&config, &cache, base).await,
        Commands::ExportRates { base } => export_rates_csv(&config, &cache, base).await,
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "command failed");
    }
    result
}

async fn serve(config: &Config, pool: SqlitePool, cache: Arc<RateCache>) -> Result<()> {
    // Bootstrap seeding is best-effort: the service comes up with an empty
    // or partial catalog when the provider is down.
    if let Err(e) = cache.initialize_catalog(&config.default_base).await {
        tracing::error!(error = %e, "catalog initialization failed, continuing");
    }

    let state = AppState {
        cache,
        pool,
        default_base: config.default_base.clone(),
        global_rates_base: config.global_rates_base.clone(),
    };
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn init(config: &Config, cache: &RateCache) -> Result<()> {
    cache.initialize_catalog(&config.default_base).await?;
    println!("✅ Currency catalog initialized");
    Ok(())
}

async fn list_currencies(pool: &SqlitePool) -> Result<()> {
    let currencies = models::currency::list_currencies(pool).await?;
    for currency in &currencies {
        println!("{}  {} ({})", currency.code, currency.name, currency.symbol);
    }
    println!("{} currencies", currencies.len());
    Ok(())
}

async fn convert(cache: &RateCache, from: &str, to: &str, amount: &str) -> Result<()> {
    let amount = Decimal::from_str(amount)
        .with_context(|| format!("invalid amount {amount}"))?;

    let conversion = cache.convert(from, to, amount).await?;
    println!("{}", serde_json::to_string_pretty(&conversion)?);
    Ok(())
}

async fn refresh(config: &Config, cache: &RateCache, base: Option<String>) -> Result<()> {
    let base = base.unwrap_or_else(|| config.default_base.clone());
    let pairs = cache.refresh_rates(&base).await?;
    println!("✅ {} rates updated for {}", pairs, base.to_uppercase());
    Ok(())
}

async fn show_rates(config: &Config, cache: &RateCache, base: Option<String>) -> Result<()> {
    let base = base.unwrap_or_else(|| config.global_rates_base.clone());
    let view = cache.global_rates(&base).await?;

    for rate in &view.rates {
        println!(
            "{}/{}  {}  ({}, updated {})",
            view.base_currency, rate.currency_code, rate.rate, rate.currency_name, rate.last_updated
        );
    }
    println!("{} rates for {}", view.total_currencies, view.base_currency);
    Ok(())
}

/// Export cached rates for a base to a timestamped CSV under output/.
async fn export_rates_csv(config: &Config, cache: &RateCache, base: Option<String>) -> Result<()> {
    let base = base.unwrap_or_else(|| config.global_rates_base.clone());
    let view = cache.global_rates(&base).await?;

    let output_dir = PathBuf::from("output");
    std::fs::create_dir_all(&output_dir)?;

    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    let csv_path = output_dir.join(format!("rates_{}_{}.csv", view.base_currency, timestamp));
    let mut writer = csv::Writer::from_path(&csv_path)?;

    writer.write_record(["Base", "Currency", "Name", "Symbol", "Rate", "Last Updated"])?;
    for rate in &view.rates {
        let rate_str = rate.rate.to_string();
        let updated = rate.last_updated.to_rfc3339();
        writer.write_record([
            view.base_currency.as_str(),
            rate.currency_code.as_str(),
            rate.currency_name.as_str(),
            rate.symbol.as_str(),
            rate_str.as_str(),
            updated.as_str(),
        ])?;
    }
    writer.flush()?;

    println!("✅ CSV file created at: {}", csv_path.display());
    Ok(())
}
