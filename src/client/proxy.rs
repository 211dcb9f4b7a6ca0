// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP client for the mint proxy endpoint.

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use url::Url;

use crate::{
    api::MINT_ROUTE,
    models::{MintRequest, MintResult},
};

pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to mint NFT. Please try again.";
/// Stands in for the `error` field when a failed response is not JSON.
pub const INVALID_FORMAT_MESSAGE: &str = "Invalid response format";

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid proxy URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client setup failed: {0}")]
    Setup(String),

    #[error("mint proxy request failed: {0}")]
    Transport(String),

    #[error("mint proxy returned {status}: {message}")]
    Rejected { status: StatusCode, message: String },

    #[error("mint proxy response was invalid: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// Message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Rejected { message, .. } => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }
}

/// Picks the message for a non-2xx proxy response.
///
/// Priority: `message`, then `error`, then a status-derived message.
pub fn rejection_message(status: StatusCode, body: &Value) -> String {
    let field = |name: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    field("message")
        .or_else(|| field("error"))
        .unwrap_or_else(|| format!("Server error: {}", status.as_u16()))
}

#[derive(Debug, Clone)]
pub struct ProxyClient {
    mint_url: Url,
    http: Client,
}

impl ProxyClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mint_url = Url::parse(base_url)
            .and_then(|base| base.join(MINT_ROUTE))
            .map_err(|e| ClientError::InvalidUrl(format!("{base_url}: {e}")))?;
        let http = Client::builder()
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;
        Ok(Self { mint_url, http })
    }

    pub fn mint_url(&self) -> &Url {
        &self.mint_url
    }

    /// Single POST to the proxy. Never retried.
    pub async fn mint(&self, request: &MintRequest) -> Result<MintResult, ClientError> {
        let response = self
            .http
            .post(self.mint_url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        if !status.is_success() {
            let body = serde_json::from_str::<Value>(&text)
                .unwrap_or_else(|_| json!({ "error": INVALID_FORMAT_MESSAGE }));
            return Err(ClientError::Rejected {
                status,
                message: rejection_message(status, &body),
            });
        }

        serde_json::from_str::<Value>(&text)
            .map(MintResult::from_json)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }
}
