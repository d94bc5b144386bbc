// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::AppState;
use crate::error::AppError;
use crate::models::currency::{self, Currency};

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(list_currencies))
}

async fn list_currencies(State(state): State<AppState>) -> Result<Json<Vec<Currency>>, AppError> {
    let currencies = currency::list_currencies(&state.pool).await?;
    Ok(Json(currencies))
}

#[cfg(test)]
mod tests {
    use crate::api::test_util::test_app;
    use crate::models::currency::insert_currency;
    use crate::service::tests::ScriptedClient;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_list_currencies() {
        let (app, _client, pool) = test_app(ScriptedClient::empty()).await;
        insert_currency(&pool, "USD", "US Dollar", "$").await.unwrap();
        insert_currency(&pool, "EUR", "Euro", "€").await.unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/currencies")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(
            json,
            serde_json::json!([
                { "code": "EUR", "name": "Euro", "symbol": "€" },
                { "code": "USD", "name": "US Dollar", "symbol": "$" },
            ])
        );
    }
}
