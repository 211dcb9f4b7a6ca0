// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Mint Client
//!
//! Client-side half of the gateway: a [`MintSession`] drives one user's mint
//! flow against the proxy endpoint.
//!
//! ## Flow
//!
//! 1. The wallet provider reports a connected address (initial check,
//!    explicit connect, or `accountsChanged`).
//! 2. [`MintSession::submit`] validates the wallet and token URI, then POSTs
//!    to `/api/mint-nft`.
//! 3. The outcome lands in `result` or `error`; a transaction hash raises a
//!    [`MintNotification`] that auto-hides after ten seconds.

pub mod notification;
pub mod proxy;
pub mod session;
pub mod wallet;

pub use notification::{MintNotification, NOTIFICATION_TIMEOUT};
pub use proxy::{ClientError, ProxyClient};
pub use session::{MintPhase, MintSession, SuccessView, WalletReaction};
pub use wallet::{
    WalletError, WalletEvent, WalletEventHub, WalletProvider, WalletSession, WalletSubscription,
};

const DEFAULT_PROXY_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_EXPLORER_TX_BASE_URL: &str = "https://sepolia.basescan.org/tx/";
const DEFAULT_TOKEN_URI: &str = "https://brown-interesting-eel-440.mypinata.cloud/ipfs/bafkreihh5xmatthhijqeyf7ga2je6q7tox757ss7jhdjkmcqazrmohuwnu";

/// Client session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Origin serving `/api/mint-nft`.
    pub proxy_base_url: String,
    /// Explorer prefix; the transaction hash is appended.
    pub explorer_tx_base_url: String,
    /// Token URI pre-filled in a fresh session.
    pub default_token_uri: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy_base_url: DEFAULT_PROXY_BASE_URL.to_string(),
            explorer_tx_base_url: DEFAULT_EXPLORER_TX_BASE_URL.to_string(),
            default_token_uri: DEFAULT_TOKEN_URI.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn with_proxy_base_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_base_url = url.into();
        self
    }

    pub fn explorer_tx_url(&self, tx_hash: &str) -> String {
        let base = self.explorer_tx_base_url.trim_end_matches('/');
        format!("{base}/{tx_hash}")
    }
}
