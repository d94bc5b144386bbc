// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

//! Rate cache: stores currencies and pairwise exchange rates, refreshes
//! them from the external provider, and answers conversion requests with a
//! 24-hour freshness window on cached rates.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::sqlite::SqlitePool;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{FetchRatesError, RatesClientTrait};
use crate::models::currency::{self, currency_display_info, FALLBACK_CURRENCIES};
use crate::models::exchange_rate;

/// Cached rates older than this are eligible for refresh on the next read.
pub const MAX_RATE_AGE_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum RateError {
    #[error("exchange rate provider is unavailable")]
    ProviderUnavailable,
    #[error("exchange rate not available for {from} to {to}")]
    RateUnavailable { from: String, to: String },
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
    pub converted_amount: Decimal,
    pub exchange_rate: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalRate {
    pub currency_code: String,
    pub currency_name: String,
    pub symbol: String,
    pub rate: Decimal,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GlobalRates {
    pub base_currency: String,
    pub rates: Vec<GlobalRate>,
    pub total_currencies: usize,
}

pub struct RateCache {
    pool: SqlitePool,
    client: Arc<dyn RatesClientTrait>,
}

impl RateCache {
    pub fn new(pool: SqlitePool, client: Arc<dyn RatesClientTrait>) -> Self {
        Self { pool, client }
    }

    /// Fetch the provider's rate table for `base`. Every failure mode is a
    /// soft "no data" outcome; the variants only differ in what gets logged.
    async fn fetch_rates(&self, base: &str) -> Option<HashMap<String, Decimal>> {
        match self.client.fetch_rates(base).await {
            Ok(rates) => Some(rates),
            Err(e) => {
                match &e {
                    FetchRatesError::Transport(_) => {
                        warn!(base, error = %e, "rate fetch failed in transport")
                    }
                    FetchRatesError::Status(_) => {
                        warn!(base, error = %e, "rate fetch rejected by provider")
                    }
                    FetchRatesError::Payload(_) => {
                        warn!(base, error = %e, "rate fetch returned unusable payload")
                    }
                }
                None
            }
        }
    }

    /// Fetch fresh rates for `base` and overwrite the stored table for it,
    /// creating unknown currencies as bare entries along the way. Upserts
    /// are per pair; a mid-loop failure keeps the pairs written so far.
    pub async fn refresh_rates(&self, base: &str) -> Result<usize, RateError> {
        let base = base.to_uppercase();
        let rates = self
            .fetch_rates(&base)
            .await
            .ok_or(RateError::ProviderUnavailable)?;

        currency::insert_currency(&self.pool, &base, &base, &base).await?;

        let now = Utc::now().timestamp();
        for (code, rate) in &rates {
            let code = code.to_uppercase();
            currency::insert_currency(&self.pool, &code, &code, &code).await?;
            exchange_rate::upsert_rate(&self.pool, &base, &code, *rate, now).await?;
        }

        info!(base = %base, pairs = rates.len(), "exchange rates refreshed");
        Ok(rates.len())
    }

    /// Resolve the rate for a currency pair, refreshing on a miss and
    /// best-effort refreshing stale entries. A stale entry whose refresh
    /// fails is served anyway; only a pair that is still missing after a
    /// refresh attempt is an error.
    pub async fn get_rate(&self, from: &str, to: &str) -> Result<Quote, RateError> {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        if from == to {
            return Ok(Quote {
                rate: Decimal::ONE,
                last_updated: Utc::now(),
            });
        }

        let stored = match exchange_rate::get_rate(&self.pool, &from, &to).await? {
            None => {
                match self.refresh_rates(&from).await {
                    Ok(_) => {}
                    Err(RateError::ProviderUnavailable) => {
                        return Err(RateError::RateUnavailable { from, to });
                    }
                    Err(e) => return Err(e),
                }
                match exchange_rate::get_rate(&self.pool, &from, &to).await? {
                    Some(stored) => stored,
                    None => return Err(RateError::RateUnavailable { from, to }),
                }
            }
            Some(stored) if Utc::now().timestamp() - stored.last_updated > MAX_RATE_AGE_SECS => {
                if let Err(e) = self.refresh_rates(&from).await {
                    warn!(from = %from, to = %to, error = %e, "refresh failed, serving stale rate");
                }
                exchange_rate::get_rate(&self.pool, &from, &to)
                    .await?
                    .unwrap_or(stored)
            }
            Some(stored) => stored,
        };

        Ok(Quote {
            rate: stored.rate,
            last_updated: timestamp_to_datetime(stored.last_updated),
        })
    }

    /// Convert `amount` between two currencies using exact decimal
    /// arithmetic. Failures from the rate lookup pass through unchanged.
    pub async fn convert(
        &self,
        from: &str,
        to: &str,
        amount: Decimal,
    ) -> Result<Conversion, RateError> {
        let quote = self.get_rate(from, to).await?;

        Ok(Conversion {
            from_currency: from.to_uppercase(),
            to_currency: to.to_uppercase(),
            amount,
            converted_amount: amount * quote.rate,
            exchange_rate: quote.rate,
            last_updated: quote.last_updated,
        })
    }

    /// Seed the currency catalog once, at first start. With the provider
    /// reachable, every code it returns becomes a catalog entry with
    /// display data from the built-in table, followed by one initial
    /// refresh; otherwise a small fallback list is seeded. Does nothing
    /// when the catalog is already populated.
    pub async fn initialize_catalog(&self, default_base: &str) -> Result<(), RateError> {
        if currency::count_currencies(&self.pool).await? > 0 {
            debug!("currency catalog already populated, skipping initialization");
            return Ok(());
        }

        let default_base = default_base.to_uppercase();
        let Some(rates) = self.fetch_rates(&default_base).await else {
            warn!("provider unreachable during catalog initialization, seeding fallback list");
            let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
            if currency::count_currencies(&mut *tx).await? == 0 {
                for (code, name, symbol) in FALLBACK_CURRENCIES {
                    currency::insert_currency(&mut *tx, code, name, symbol).await?;
                }
            }
            tx.commit().await.map_err(anyhow::Error::from)?;
            return Ok(());
        };

        // The emptiness check is repeated inside the transaction so two
        // processes starting together cannot both seed.
        let mut tx = self.pool.begin().await.map_err(anyhow::Error::from)?;
        if currency::count_currencies(&mut *tx).await? == 0 {
            for code in rates.keys() {
                let code = code.to_uppercase();
                let (name, symbol) =
                    currency_display_info(&code).unwrap_or((code.as_str(), code.as_str()));
                currency::insert_currency(&mut *tx, &code, name, symbol).await?;
            }
            info!(currencies = rates.len(), "currency catalog initialized");
        }
        tx.commit().await.map_err(anyhow::Error::from)?;

        if let Err(e) = self.refresh_rates(&default_base).await {
            warn!(error = %e, "initial rate refresh failed, continuing without cached rates");
        }

        Ok(())
    }

    /// All stored rates for a base, refreshing once when none are stored
    /// yet. A failed refresh still yields whatever is stored.
    pub async fn global_rates(&self, base: &str) -> Result<GlobalRates, RateError> {
        let base = base.to_uppercase();
        let mut rates = exchange_rate::list_rates_for_base(&self.pool, &base).await?;

        if rates.is_empty() {
            if let Err(e) = self.refresh_rates(&base).await {
                warn!(base = %base, error = %e, "refresh for global rates view failed");
            }
            rates = exchange_rate::list_rates_for_base(&self.pool, &base).await?;
        }

        let total_currencies = rates.len();
        Ok(GlobalRates {
            base_currency: base,
            rates: rates
                .into_iter()
                .map(|r| GlobalRate {
                    currency_code: r.currency_code,
                    currency_name: r.currency_name,
                    symbol: r.symbol,
                    rate: r.rate,
                    last_updated: timestamp_to_datetime(r.last_updated),
                })
                .collect(),
            total_currencies,
        })
    }
}

fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(ts, 0).unwrap_or_default()
}
