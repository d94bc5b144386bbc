// SPDX-FileCopyrightText: 2025 Joost van der Laan <joost@fashionunited.com>
//
// SPDX-License-Identifier: AGPL-3.0-only

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::service::RateError;

/// Errors surfaced at the HTTP boundary. Anything that isn't a client
/// mistake or a provider outage is reported as a generic server error and
/// only logged in full.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },
    #[error("{0}")]
    Provider(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        match err {
            RateError::RateUnavailable { .. } => AppError::NotFound(err.to_string()),
            RateError::ProviderUnavailable => {
                AppError::Provider("failed to update exchange rates".to_string())
            }
            RateError::Internal(e) => AppError::Internal(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::NotFound(message) => {
                (StatusCode::NOT_FOUND, json!({ "error": message }))
            }
            AppError::Validation { field, message } => {
                let mut errors = serde_json::Map::new();
                errors.insert(field.to_string(), json!(message));
                (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
            }
            AppError::Provider(message) => {
                (StatusCode::BAD_GATEWAY, json!({ "error": message }))
            }
            AppError::Internal(e) => {
                error!(error = ?e, "unexpected error while handling request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "an error occurred while handling the request" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
