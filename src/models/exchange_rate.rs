// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::sqlite::SqlitePool;
use std::str::FromStr;

/// One cached rate for an ordered (base, target) pair. The rate is stored
/// as TEXT so no precision is lost on the way through SQLite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRate {
    pub base_code: String,
    pub target_code: String,
    pub rate: Decimal,
    pub last_updated: i64,
}

/// A stored rate joined with the target currency's display data, as shown
/// in the global rates view.
#[derive(Debug, Clone)]
pub struct RateWithCurrency {
    pub currency_code: String,
    pub currency_name: String,
    pub symbol: String,
    pub rate: Decimal,
    pub last_updated: i64,
}

/// Insert or overwrite the rate for an ordered (base, target) pair.
pub async fn upsert_rate(
    pool: &SqlitePool,
    base: &str,
    target: &str,
    rate: Decimal,
    last_updated: i64,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO exchange_rates (base_code, target_code, rate, last_updated)
        VALUES (?, ?, ?, ?)
        ON CONFLICT(base_code, target_code) DO UPDATE SET
            rate = excluded.rate,
            last_updated = excluded.last_updated,
            updated_at = CURRENT_TIMESTAMP
        "#,
    )
    .bind(base)
    .bind(target)
    .bind(rate.to_string())
    .bind(last_updated)
    .execute(pool)
    .await?;

    Ok(())
}

/// Look up the stored rate for an ordered (base, target) pair.
pub async fn get_rate(pool: &SqlitePool, base: &str, target: &str) -> Result<Option<StoredRate>> {
    let record = sqlx::query_as::<_, (String, i64)>(
        r#"
        SELECT rate, last_updated
        FROM exchange_rates
        WHERE base_code = ? AND target_code = ?
        "#,
    )
    .bind(base)
    .bind(target)
    .fetch_optional(pool)
    .await?;

    record
        .map(|(rate, last_updated)| {
            let rate = Decimal::from_str(&rate)
                .with_context(|| format!("invalid stored rate {} for {}/{}", rate, base, target))?;
            Ok(StoredRate {
                base_code: base.to_string(),
                target_code: target.to_string(),
                rate,
                last_updated,
            })
        })
        .transpose()
}

/// List all stored rates for a base, joined with currency display data.
pub async fn list_rates_for_base(pool: &SqlitePool, base: &str) -> Result<Vec<RateWithCurrency>> {
    let records = sqlx::query_as::<_, (String, String, String, String, i64)>(
        r#"
        SELECT r.target_code, c.name, c.symbol, r.rate, r.last_updated
        FROM exchange_rates r
        JOIN currencies c ON c.code = r.target_code
        WHERE r.base_code = ?
        ORDER BY r.target_code
        "#,
    )
    .bind(base)
    .fetch_all(pool)
    .await?;

    records
        .into_iter()
        .map(|(code, name, symbol, rate, last_updated)| {
            let rate = Decimal::from_str(&rate)
                .with_context(|| format!("invalid stored rate {} for {}/{}", rate, base, code))?;
            Ok(RateWithCurrency {
                currency_code: code,
                currency_name: name,
                symbol,
                rate,
                last_updated,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::currency::insert_currency;

    #[tokio::test]
    async fn test_upsert_replaces_single_row() -> Result<()> {
        let pool = db::create_test_pool().await?;
        insert_currency(&pool, "USD", "US Dollar", "$").await?;
        insert_currency(&pool, "EUR", "Euro", "€").await?;

        upsert_rate(&pool, "USD", "EUR", Decimal::from_str("0.9")?, 1700000000).await?;
        upsert_rate(&pool, "USD", "EUR", Decimal::from_str("0.95")?, 1700086400).await?;

        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM exchange_rates WHERE base_code = 'USD'")
                .fetch_one(&pool)
                .await?;
        assert_eq!(count, 1);

        let stored = get_rate(&pool, "USD", "EUR").await?.unwrap();
        assert_eq!(stored.rate, Decimal::from_str("0.95")?);
        assert_eq!(stored.last_updated, 1700086400);

        Ok(())
    }

    #[tokio::test]
    async fn test_pairs_are_directional() -> Result<()> {
        let pool = db::create_test_pool().await?;
        insert_currency(&pool, "USD", "US Dollar", "$").await?;
        insert_currency(&pool, "EUR", "Euro", "€").await?;

        upsert_rate(&pool, "USD", "EUR", Decimal::from_str("0.9")?, 1700000000).await?;

        assert!(get_rate(&pool, "USD", "EUR").await?.is_some());
        assert!(get_rate(&pool, "EUR", "USD").await?.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn test_rate_survives_round_trip_exactly() -> Result<()> {
        let pool = db::create_test_pool().await?;
        insert_currency(&pool, "USD", "US Dollar", "$").await?;
        insert_currency(&pool, "JPY", "Japanese Yen", "¥").await?;

        let rate = Decimal::from_str("149.325901")?;
        upsert_rate(&pool, "USD", "JPY", rate, 1700000000).await?;

        let stored = get_rate(&pool, "USD", "JPY").await?.unwrap();
        assert_eq!(stored.rate, rate);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_rates_for_base_joins_currencies() -> Result<()> {
        let pool = db::create_test_pool().await?;
        insert_currency(&pool, "USD", "US Dollar", "$").await?;
        insert_currency(&pool, "EUR", "Euro", "€").await?;
        insert_currency(&pool, "JPY", "Japanese Yen", "¥").await?;

        upsert_rate(&pool, "USD", "EUR", Decimal::from_str("0.9")?, 1700000000).await?;
        upsert_rate(&pool, "USD", "JPY", Decimal::from_str("140")?, 1700000000).await?;

        let rates = list_rates_for_base(&pool, "USD").await?;
        assert_eq!(rates.len(), 2);
        assert_eq!(rates[0].currency_code, "EUR");
        assert_eq!(rates[0].currency_name, "Euro");
        assert_eq!(rates[0].symbol, "€");
        assert_eq!(rates[1].currency_code, "JPY");
        assert_eq!(rates[1].rate, Decimal::from_str("140")?);

        let none = list_rates_for_base(&pool, "EUR").await?;
        assert!(none.is_empty());

        Ok(())
    }
}
