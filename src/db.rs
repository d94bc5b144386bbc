// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::{Context, Result};
use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Sqlite};

/// Open the SQLite database, creating it if it doesn't exist, and run
/// migrations.
pub async fn create_db_pool(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url)
            .await
            .with_context(|| format!("failed to create database at {}", db_url))?;
    }

    let pool = SqlitePool::connect(db_url)
        .await
        .with_context(|| format!("failed to connect to {}", db_url))?;

    sqlx::migrate!().run(&pool).await?;

    Ok(pool)
}

#[cfg(test)]
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_db_pool("sqlite::memory:").await
}
