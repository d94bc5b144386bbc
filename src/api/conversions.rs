// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use rust_decimal::Decimal;
use serde::Deserialize;

use super::{validate_code, AppState};
use crate::error::AppError;
use crate::service::Conversion;

#[derive(Debug, Deserialize)]
pub struct ConversionRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub amount: Decimal,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_conversion))
}

async fn create_conversion(
    State(state): State<AppState>,
    Json(req): Json<ConversionRequest>,
) -> Result<Json<Conversion>, AppError> {
    let from = validate_code("from_currency", &req.from_currency)?;
    let to = validate_code("to_currency", &req.to_currency)?;

    let conversion = state.cache.convert(&from, &to, req.amount).await?;
    Ok(Json(conversion))
}
