// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Paymaster minting service client.
//!
//! Sends a single `POST /api/v1/mint-nft` per mint with the server-held API
//! key. The response is returned as raw text together with its status so the
//! caller decides how to interpret non-JSON or empty bodies.

use reqwest::{Client, StatusCode};
use serde_json::{Map, Value};

use crate::{
    config::{ApiKey, MintServiceConfig},
    models::MintRequest,
};

const MINT_PATH: &str = "/api/v1/mint-nft";
const API_KEY_HEADER: &str = "X-API-Key";

#[derive(Debug, thiserror::Error)]
pub enum PaymasterError {
    #[error("paymaster client setup failed: {0}")]
    Setup(String),

    #[error("paymaster request failed: {0}")]
    Request(String),

    #[error("paymaster response body unreadable: {0}")]
    Body(String),
}

/// Status and raw body of an upstream mint call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: String,
}

impl UpstreamResponse {
    /// Parses the body as JSON. An empty body reads as `{}`.
    pub fn parse_json(&self) -> Result<Value, serde_json::Error> {
        if self.body.is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        serde_json::from_str(&self.body)
    }
}

/// Upstream `message` field, when it is a non-empty string.
pub fn extract_upstream_message(body: &Value) -> Option<String> {
    body.get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct PaymasterClient {
    mint_url: String,
    api_key: ApiKey,
    http: Client,
}

impl PaymasterClient {
    pub fn new(config: &MintServiceConfig) -> Result<Self, PaymasterError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| PaymasterError::Setup(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            mint_url: format!(
                "{}{}",
                config.base_url.as_str().trim_end_matches('/'),
                MINT_PATH
            ),
            api_key: config.api_key.clone(),
            http,
        })
    }

    pub fn mint_url(&self) -> &str {
        &self.mint_url
    }

    pub async fn mint_nft(&self, request: &MintRequest) -> Result<UpstreamResponse, PaymasterError> {
        let response = self
            .http
            .post(&self.mint_url)
            .header(API_KEY_HEADER, self.api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|e| PaymasterError::Request(format!("POST {MINT_PATH} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymasterError::Body(e.to_string()))?;

        Ok(UpstreamResponse { status, body })
    }
}
