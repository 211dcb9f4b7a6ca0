// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet provider integration.
//!
//! The wallet itself (browser extension, WalletConnect bridge, ...) is an
//! external collaborator. This module only defines the surface the mint
//! session consumes: JSON-RPC style `request` calls and an event stream for
//! `accountsChanged` / `chainChanged`.
//!
//! Event listeners are RAII handles. Dropping a [`WalletSubscription`]
//! unsubscribes it, so a session that is torn down or reloaded never leaves a
//! listener behind.

use std::future::Future;

use serde_json::Value;
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::warn;

use crate::models::WalletAddress;

/// EIP-1193 "user rejected request".
pub const USER_REJECTED_CODE: i64 = 4001;
/// "Request of this type already pending" returned by injected wallets.
pub const REQUEST_PENDING_CODE: i64 = -32002;

pub const NO_WALLET_DETECTED_MESSAGE: &str =
    "No Ethereum wallet detected. Please install MetaMask or another Ethereum wallet extension.";
pub const NO_ACCOUNTS_MESSAGE: &str = "No accounts found. Please create an account in your wallet.";
pub const USER_REJECTED_MESSAGE: &str = "User rejected the connection request";
pub const REQUEST_PENDING_MESSAGE: &str = "A connection request is already pending in your wallet. Please open your wallet and approve the connection.";
pub const UNKNOWN_WALLET_ERROR_MESSAGE: &str = "Unknown wallet connection error";

const EVENT_BUFFER: usize = 16;

/// Events emitted by the wallet provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// New account list; empty when the user disconnected every account.
    AccountsChanged(Vec<String>),
    /// New chain id, hex encoded.
    ChainChanged(String),
}

/// Error returned by a provider `request`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("wallet request failed ({code:?}): {message}")]
pub struct WalletError {
    pub code: Option<i64>,
    pub message: String,
}

impl WalletError {
    pub fn new(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Text shown to the user when a connection attempt fails.
    pub fn connection_message(&self) -> String {
        match self.code {
            Some(USER_REJECTED_CODE) => USER_REJECTED_MESSAGE.to_string(),
            Some(REQUEST_PENDING_CODE) => REQUEST_PENDING_MESSAGE.to_string(),
            _ if !self.message.trim().is_empty() => self.message.clone(),
            _ => UNKNOWN_WALLET_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn is_pending_request(&self) -> bool {
        self.code == Some(REQUEST_PENDING_CODE)
    }
}

/// Surface of an injected wallet provider.
pub trait WalletProvider: Send + Sync {
    /// JSON-RPC style call, e.g. `eth_accounts` or `eth_requestAccounts`.
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl Future<Output = Result<Value, WalletError>> + Send;

    /// Address the provider already exposes without prompting, if any.
    fn selected_address(&self) -> Option<String> {
        None
    }

    /// Registers a listener for wallet events.
    fn subscribe(&self) -> WalletSubscription;
}

/// Broadcast hub a provider implementation can use to fan events out.
#[derive(Debug, Clone)]
pub struct WalletEventHub {
    sender: broadcast::Sender<WalletEvent>,
}

impl Default for WalletEventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl WalletEventHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_BUFFER);
        Self { sender }
    }

    /// Delivers `event` to every live subscription; returns how many got it.
    pub fn emit(&self, event: WalletEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> WalletSubscription {
        WalletSubscription {
            receiver: self.sender.subscribe(),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

/// A registered event listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct WalletSubscription {
    receiver: broadcast::Receiver<WalletEvent>,
}

impl WalletSubscription {
    /// Next pending event without waiting.
    pub fn try_next(&mut self) -> Option<WalletEvent> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => return Some(event),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "Wallet listener lagged, older events dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }

    /// Waits for the next event; `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<WalletEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Wallet listener lagged, older events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// Local view of the wallet connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletSession {
    address: Option<WalletAddress>,
}

impl WalletSession {
    pub fn address(&self) -> Option<&WalletAddress> {
        self.address.as_ref()
    }

    pub fn is_connected(&self) -> bool {
        self.address.is_some()
    }

    pub fn connect(&mut self, address: impl Into<WalletAddress>) {
        let address = address.into();
        self.address = if address.as_str().is_empty() {
            None
        } else {
            Some(address)
        };
    }

    pub fn clear(&mut self) {
        self.address = None;
    }
}

/// First account of an `eth_accounts` style response.
pub fn first_account(accounts: &Value) -> Option<String> {
    accounts
        .as_array()?
        .first()?
        .as_str()
        .filter(|a| !a.is_empty())
        .map(str::to_string)
}
