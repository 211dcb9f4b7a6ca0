// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields: receiver_address or token_uri";
pub const INVALID_UPSTREAM_MESSAGE: &str = "Invalid response from minting service";
pub const UPSTREAM_FALLBACK_MESSAGE: &str = "Failed to mint NFT";
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

/// JSON error body returned by the proxy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    /// Raw upstream text, only present for unparseable upstream responses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn missing_fields() -> Self {
        Self::bad_request(MISSING_FIELDS_MESSAGE)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    pub fn invalid_upstream(raw: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INVALID_UPSTREAM_MESSAGE).with_details(raw)
    }

    /// Relays an upstream failure with its original status code.
    pub fn upstream(status: StatusCode, message: Option<String>) -> Self {
        Self::new(
            status,
            message.unwrap_or_else(|| UPSTREAM_FALLBACK_MESSAGE.to_string()),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            details: self.details,
        });
        (self.status, body).into_response()
    }
}
