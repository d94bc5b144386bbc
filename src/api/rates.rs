// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::extract::{Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use super::{validate_code, AppState};
use crate::error::AppError;
use crate::service::GlobalRates;

#[derive(Debug, Default, Deserialize)]
pub struct RefreshRequest {
    pub base_currency: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct GlobalRatesParams {
    pub base: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/refresh", post(refresh_rates))
        .route("/global", get(global_rates))
}

async fn refresh_rates(
    State(state): State<AppState>,
    body: Option<Json<RefreshRequest>>,
) -> Result<Json<RefreshResponse>, AppError> {
    let base = body
        .and_then(|Json(req)| req.base_currency)
        .unwrap_or_else(|| state.default_base.clone());
    let base = validate_code("base_currency", &base)?;

    state.cache.refresh_rates(&base).await?;

    Ok(Json(RefreshResponse {
        message: "exchange rates updated successfully".to_string(),
    }))
}

async fn global_rates(
    State(state): State<AppState>,
    Query(params): Query<GlobalRatesParams>,
) -> Result<Json<GlobalRates>, AppError> {
    let base = params
        .base
        .unwrap_or_else(|| state.global_rates_base.clone());
    let base = validate_code("base", &base)?;

    let view = state.cache.global_rates(&base).await?;
    Ok(Json(view))
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::test_app;
    use crate::service::tests::ScriptedClient;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_refresh_with_explicit_base() {
        let (app, client, _pool) =
            test_app(ScriptedClient::with_rates("EUR", &[("USD", "1.1")])).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rates/refresh")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"base_currency": "EUR"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["message"], "exchange rates updated successfully");
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_defaults_to_configured_base() {
        let (app, client, _pool) =
            test_app(ScriptedClient::with_rates("USD", &[("EUR", "0.9")])).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rates/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_refresh_provider_failure_is_bad_gateway() {
        let (app, _client, _pool) = test_app(ScriptedClient::empty()).await;

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/rates/refresh")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"], "failed to update exchange rates");
    }

    #[tokio::test]
    async fn test_global_rates_uses_configured_default_base() {
        let (app, client, _pool) =
            test_app(ScriptedClient::with_rates("BDT", &[("USD", "0.0091")])).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rates/global")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["base_currency"], "BDT");
        assert_eq!(json["total_currencies"], 1);
        assert_eq!(json["rates"][0]["currency_code"], "USD");
        assert_eq!(client.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_global_rates_with_base_param() {
        let (app, _client, _pool) =
            test_app(ScriptedClient::with_rates("EUR", &[("USD", "1.1"), ("JPY", "155")])).await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/rates/global?base=eur")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["base_currency"], "EUR");
        assert_eq!(json["total_currencies"], 2);
    }
}
