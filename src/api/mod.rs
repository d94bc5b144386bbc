// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

pub mod conversions;
pub mod currencies;
pub mod rates;
pub mod rates_client;

pub use rates_client::{FetchRatesError, RatesClient, RatesClientTrait, PROVIDER_TIMEOUT};

use axum::Router;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::error::AppError;
use crate::service::RateCache;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<RateCache>,
    pub pool: SqlitePool,
    pub default_base: String,
    pub global_rates_base: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/currencies", currencies::routes())
        .nest("/conversions", conversions::routes())
        .nest("/rates", rates::routes())
        .with_state(state)
}

/// Currency codes arriving over the API must be three letters; casing is
/// normalized later, in the service.
pub(crate) fn validate_code(field: &'static str, value: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.len() != 3 || !value.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation {
            field,
            message: "must be a 3-letter currency code".to_string(),
        });
    }
    Ok(value.to_string())
}
