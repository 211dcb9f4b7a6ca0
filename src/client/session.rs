// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mint session state machine.
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded
//!              |                  |-> Failed
//!              |                  \-> Idle (submit cancelled)
//!              \-> Idle (validation error)
//! ```
//!
//! Any terminal phase accepts a new submission. `is_loading` is set for the
//! whole `Submitting` phase so the UI can disable the submit control.

use std::fmt;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use super::{
    notification::MintNotification,
    proxy::ProxyClient,
    wallet::{
        first_account, WalletEvent, WalletProvider, WalletSession, WalletSubscription,
        NO_ACCOUNTS_MESSAGE, NO_WALLET_DETECTED_MESSAGE,
    },
    ClientConfig, ClientError,
};
use crate::models::{MintRequest, MintResult, WalletAddress};

pub const CONNECT_WALLET_FIRST_MESSAGE: &str = "Please connect your wallet first";
pub const ENTER_TOKEN_URI_MESSAGE: &str = "Please enter a token URI";
pub const MINT_SUCCESS_HEADLINE: &str = "NFT Minted Successfully!";

/// Result code the paymaster uses for a completed mint.
const MINT_OK_CODE: i64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MintPhase {
    Idle,
    Validating,
    Submitting,
    Succeeded,
    Failed,
}

/// How the session reacted to a wallet event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletReaction {
    AddressChanged(Option<WalletAddress>),
    /// Chain switched; the whole session was reset.
    Reloaded,
}

/// Success panel content for a completed mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessView {
    pub tx_hash: Option<String>,
    pub block_number: Option<String>,
    pub explorer_url: Option<String>,
    pub minted_at: Option<DateTime<Utc>>,
}

impl fmt::Display for SuccessView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MINT_SUCCESS_HEADLINE}")?;
        if let Some(hash) = &self.tx_hash {
            write!(f, "\nTransaction Hash: {hash}")?;
        }
        if let Some(block) = &self.block_number {
            write!(f, "\nBlock Number: {block}")?;
        }
        if let Some(url) = &self.explorer_url {
            write!(f, "\nView on explorer: {url}")?;
        }
        Ok(())
    }
}

/// Marks a mint as in flight for as long as it lives.
///
/// Dropping it, on completion or when the submit future is cancelled, clears
/// the loading flag and returns the phase to `Idle`.
struct InFlight<'a> {
    phase: &'a mut MintPhase,
    is_loading: &'a mut bool,
}

impl<'a> InFlight<'a> {
    fn start(phase: &'a mut MintPhase, is_loading: &'a mut bool) -> Self {
        *phase = MintPhase::Submitting;
        *is_loading = true;
        Self { phase, is_loading }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        *self.phase = MintPhase::Idle;
        *self.is_loading = false;
    }
}

pub struct MintSession<W: WalletProvider> {
    config: ClientConfig,
    proxy: ProxyClient,
    wallet: Option<W>,
    subscription: Option<WalletSubscription>,
    session: WalletSession,
    token_uri: String,
    phase: MintPhase,
    is_loading: bool,
    result: Option<MintResult>,
    error: Option<String>,
    notification: Option<MintNotification>,
}

impl<W: WalletProvider> MintSession<W> {
    /// Creates a session and subscribes to wallet events.
    ///
    /// `wallet` is `None` when no provider is injected; connecting then
    /// reports that no wallet was detected.
    pub fn new(config: ClientConfig, wallet: Option<W>) -> Result<Self, ClientError> {
        let proxy = ProxyClient::new(&config.proxy_base_url)?;
        let subscription = wallet.as_ref().map(WalletProvider::subscribe);
        let token_uri = config.default_token_uri.clone();

        Ok(Self {
            config,
            proxy,
            wallet,
            subscription,
            session: WalletSession::default(),
            token_uri,
            phase: MintPhase::Idle,
            is_loading: false,
            result: None,
            error: None,
            notification: None,
        })
    }

    pub fn phase(&self) -> MintPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn result(&self) -> Option<&MintResult> {
        self.result.as_ref()
    }

    pub fn wallet_address(&self) -> Option<&WalletAddress> {
        self.session.address()
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_connected()
    }

    /// Connected address in its shortened `0x1234...abcd` form.
    pub fn display_address(&self) -> Option<String> {
        self.session.address().map(WalletAddress::short)
    }

    pub fn token_uri(&self) -> &str {
        &self.token_uri
    }

    /// Updates the token URI. Ignored while a mint is in flight.
    pub fn set_token_uri(&mut self, token_uri: impl Into<String>) {
        if !self.is_loading {
            self.token_uri = token_uri.into();
        }
    }

    /// Whether the submit control should be enabled.
    pub fn can_submit(&self) -> bool {
        !self.is_loading && self.is_connected() && !self.token_uri.is_empty()
    }

    /// Visible success notification, if any.
    pub fn notification(&self) -> Option<&MintNotification> {
        self.notification.as_ref().filter(|n| n.is_visible())
    }

    pub fn dismiss_notification(&mut self) {
        if let Some(notification) = self.notification.take() {
            notification.dismiss();
        }
    }

    /// Success panel, shown when the paymaster reported code 200.
    pub fn success_view(&self) -> Option<SuccessView> {
        let result = self.result.as_ref().filter(|r| r.code == MINT_OK_CODE)?;
        let data = result.data.as_ref();
        let tx_hash = result.tx_hash().map(str::to_string);
        Some(SuccessView {
            explorer_url: tx_hash.as_deref().map(|h| self.config.explorer_tx_url(h)),
            tx_hash,
            block_number: data.map(|d| d.block_number.clone()),
            minted_at: data.and_then(|d| d.minted_at()),
        })
    }

    // -------------------------------------------------------------------------
    // Wallet connection
    // -------------------------------------------------------------------------

    /// Picks up an already-authorized account without prompting.
    ///
    /// Failures are logged only; nothing is shown to the user.
    pub async fn check_existing_connection(&mut self) {
        let Some(wallet) = self.wallet.as_ref() else {
            return;
        };
        match wallet.request("eth_accounts", Value::Array(Vec::new())).await {
            Ok(accounts) => {
                if let Some(account) = first_account(&accounts) {
                    self.session.connect(account);
                }
            }
            Err(e) => warn!(error = %e, "Error checking wallet connection"),
        }
    }

    /// Prompts the wallet for an account.
    pub async fn connect_wallet(&mut self) {
        self.error = None;

        let Some(wallet) = self.wallet.as_ref() else {
            self.error = Some(NO_WALLET_DETECTED_MESSAGE.to_string());
            return;
        };

        if let Some(selected) = wallet.selected_address().filter(|a| !a.is_empty()) {
            self.session.connect(selected);
            self.log_connected();
            return;
        }

        match wallet
            .request("eth_requestAccounts", Value::Array(Vec::new()))
            .await
        {
            Ok(accounts) => match first_account(&accounts) {
                Some(account) => {
                    self.session.connect(account);
                    self.log_connected();
                }
                None => self.error = Some(NO_ACCOUNTS_MESSAGE.to_string()),
            },
            Err(e) => {
                if !e.is_pending_request() {
                    warn!(error = %e, "Error connecting wallet");
                }
                self.error = Some(e.connection_message());
            }
        }
    }

    fn log_connected(&self) {
        if let Some(address) = self.display_address() {
            info!(%address, "Wallet connected");
        }
    }

    /// Forgets the local address.
    ///
    /// The provider-side authorization is left untouched; the wallet will
    /// still report the account on the next connection check.
    pub fn disconnect_wallet(&mut self) {
        self.session.clear();
    }

    pub async fn handle_wallet_event(&mut self, event: WalletEvent) -> WalletReaction {
        match event {
            WalletEvent::AccountsChanged(accounts) => {
                match accounts.into_iter().find(|a| !a.is_empty()) {
                    Some(account) => self.session.connect(account),
                    None => self.session.clear(),
                }
                WalletReaction::AddressChanged(self.session.address().cloned())
            }
            WalletEvent::ChainChanged(chain_id) => {
                info!(%chain_id, "Wallet chain changed, reloading session");
                self.reload().await;
                WalletReaction::Reloaded
            }
        }
    }

    /// Applies every wallet event queued since the last call.
    pub async fn process_wallet_events(&mut self) -> Vec<WalletReaction> {
        let mut reactions = Vec::new();
        while let Some(event) = self.subscription.as_mut().and_then(|s| s.try_next()) {
            reactions.push(self.handle_wallet_event(event).await);
        }
        reactions
    }

    /// Resets the session to a fresh state, re-subscribing to wallet events
    /// and re-running the initial connection check. Queued events are dropped.
    pub async fn reload(&mut self) {
        self.subscription = None;
        self.notification = None;
        self.session = WalletSession::default();
        self.token_uri = self.config.default_token_uri.clone();
        self.phase = MintPhase::Idle;
        self.is_loading = false;
        self.result = None;
        self.error = None;

        self.subscription = self.wallet.as_ref().map(WalletProvider::subscribe);
        self.check_existing_connection().await;
    }

    // -------------------------------------------------------------------------
    // Minting
    // -------------------------------------------------------------------------

    /// Runs one mint attempt and returns the phase it ended in.
    pub async fn submit(&mut self) -> MintPhase {
        if self.is_loading {
            return self.phase;
        }

        self.phase = MintPhase::Validating;
        let Some(address) = self.session.address().cloned() else {
            return self.reject(CONNECT_WALLET_FIRST_MESSAGE);
        };
        let Some(request) = MintRequest::new(address, self.token_uri.clone()) else {
            return self.reject(ENTER_TOKEN_URI_MESSAGE);
        };

        self.error = None;
        self.result = None;
        self.notification = None;

        info!(
            receiver_address = %request.receiver_address,
            token_uri = %request.token_uri,
            "Submitting mint request"
        );

        let outcome = {
            let _in_flight = InFlight::start(&mut self.phase, &mut self.is_loading);
            self.proxy.mint(&request).await
        };

        match outcome {
            Ok(result) => {
                if let Some(hash) = result.tx_hash() {
                    info!(tx_hash = %hash, "Mint succeeded");
                    self.notification = Some(MintNotification::show(
                        hash,
                        self.config.explorer_tx_url(hash),
                    ));
                }
                self.result = Some(result);
                self.phase = MintPhase::Succeeded;
            }
            Err(e) => {
                warn!(error = %e, "Mint failed");
                self.error = Some(e.user_message());
                self.phase = MintPhase::Failed;
            }
        }

        self.phase
    }

    fn reject(&mut self, message: &str) -> MintPhase {
        self.error = Some(message.to_string());
        self.phase = MintPhase::Idle;
        self.phase
    }
}
