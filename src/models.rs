// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures shared by the mint proxy and the client
//! session. All values are request-scoped; nothing here is persisted.
//!
//! ## Model Categories
//!
//! - **Wallet**: the [`WalletAddress`] newtype
//! - **Mint requests**: the inbound wire payload and the validated request
//! - **Mint results**: the paymaster response and its transaction record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Ethereum-compatible wallet address wrapper.
///
/// The proxy does not check the address format; the minting service does.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq, Hash)]
pub struct WalletAddress(pub String);

impl WalletAddress {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened display form, `0x1234...abcd`.
    ///
    /// Addresses too short to abbreviate are returned unchanged.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for WalletAddress {
    fn from(value: String) -> Self {
        WalletAddress(value)
    }
}

impl From<&str> for WalletAddress {
    fn from(value: &str) -> Self {
        WalletAddress(value.to_string())
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

// =============================================================================
// Mint Requests
// =============================================================================

/// Inbound body of `POST /api/mint-nft`.
///
/// Both fields are optional on the wire so that a missing field becomes a
/// 400 rather than a decode failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MintNftRequest {
    /// Wallet that receives the minted token.
    pub receiver_address: Option<String>,
    /// URI of the token metadata.
    pub token_uri: Option<String>,
}

impl MintNftRequest {
    /// Returns the validated request, or `None` when a field is missing or empty.
    pub fn into_mint_request(self) -> Option<MintRequest> {
        MintRequest::new(self.receiver_address?, self.token_uri?)
    }
}

/// A validated mint request. Serializes to exactly the two upstream fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MintRequest {
    pub receiver_address: WalletAddress,
    pub token_uri: String,
}

impl MintRequest {
    pub fn new(receiver_address: impl Into<String>, token_uri: impl Into<String>) -> Option<Self> {
        let receiver_address = receiver_address.into();
        let token_uri = token_uri.into();
        if receiver_address.is_empty() || token_uri.is_empty() {
            return None;
        }
        Some(Self {
            receiver_address: WalletAddress(receiver_address),
            token_uri,
        })
    }
}

// =============================================================================
// Mint Results
// =============================================================================

/// Response of the paymaster minting service.
///
/// The proxy relays the upstream JSON untouched; this type is how the client
/// reads it. The upstream shape is not guaranteed, so every field decodes
/// leniently: missing or mistyped values fall back to defaults and numbers
/// are accepted where strings are expected (and the reverse).
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MintResult {
    #[serde(default, deserialize_with = "lenient::integer")]
    pub code: i64,
    #[serde(default, deserialize_with = "lenient::string")]
    pub message: String,
    #[serde(
        default,
        deserialize_with = "lenient::record",
        skip_serializing_if = "Option::is_none"
    )]
    pub data: Option<MintTransactionRecord>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<String>,
}

impl MintResult {
    /// Reads a result out of any JSON value. Non-object values yield the
    /// default result.
    pub fn from_json(value: Value) -> Self {
        if !value.is_object() {
            return Self::default();
        }
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Transaction hash, when the service reported one.
    pub fn tx_hash(&self) -> Option<&str> {
        self.data
            .as_ref()
            .map(|d| d.tx_hash.as_str())
            .filter(|hash| !hash.is_empty())
    }
}

/// On-chain record of a mint, as reported by the paymaster.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct MintTransactionRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub status: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub tx_hash: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub user_op_hash: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub block_number: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub block_hash: String,
    /// Unix timestamp in seconds.
    #[serde(default, deserialize_with = "lenient::integer")]
    pub timestamp: i64,
}

impl MintTransactionRecord {
    pub fn minted_at(&self) -> Option<DateTime<Utc>> {
        if self.timestamp <= 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Tolerant field decoders for upstream-controlled JSON.
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::MintTransactionRecord;

    fn scalar_text(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
    }

    pub fn optional_string<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(scalar_text(Value::deserialize(deserializer)?))
    }

    pub fn integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            Value::String(s) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        })
    }

    pub fn record<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<MintTransactionRecord>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        if !value.is_object() {
            return Ok(None);
        }
        Ok(serde_json::from_value(value).ok())
    }
}
