// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::Router;
use nft_mint_gateway::{
    api::router,
    client::{
        wallet::WalletError, ClientConfig, MintSession, WalletEventHub, WalletProvider,
        WalletSubscription,
    },
    config::{ApiKey, MintServiceConfig},
    state::AppState,
};
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const RECEIVER: &str = "0xABC0000000000000000000000000000000000001";

/// Router wired to a mocked paymaster.
pub fn router_for(upstream: &MockServer) -> Router {
    router(state_for(&upstream.uri()))
}

pub fn state_for(base_url: &str) -> AppState {
    let config =
        MintServiceConfig::new(base_url, ApiKey::new(TEST_API_KEY)).expect("valid base url");
    AppState::from_config(&config).expect("paymaster client builds")
}

pub struct TestGateway {
    pub address: String,
    pub upstream: MockServer,
}

impl TestGateway {
    pub async fn upstream_requests(&self) -> usize {
        self.upstream.received_requests().await.unwrap().len()
    }

    pub fn session(&self, wallet: StaticWallet) -> MintSession<StaticWallet> {
        let config = ClientConfig::default().with_proxy_base_url(self.address.clone());
        MintSession::new(config, Some(wallet)).expect("session builds")
    }
}

/// Runs the gateway on an ephemeral port in front of a mocked paymaster.
pub async fn spawn_gateway() -> TestGateway {
    let upstream = MockServer::start().await;
    let app = router_for(&upstream);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("gateway serves");
    });

    TestGateway {
        address: format!("http://127.0.0.1:{port}"),
        upstream,
    }
}

/// Base URL on which nothing is listening.
pub async fn unreachable_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

/// Wallet provider that always reports the same accounts.
#[derive(Clone)]
pub struct StaticWallet {
    pub hub: WalletEventHub,
    accounts: Value,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl StaticWallet {
    pub fn connected(address: &str) -> Self {
        Self::with_accounts(json!([address]))
    }

    pub fn locked() -> Self {
        Self::with_accounts(json!([]))
    }

    fn with_accounts(accounts: Value) -> Self {
        Self {
            hub: WalletEventHub::new(),
            accounts,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl WalletProvider for StaticWallet {
    async fn request(&self, method: &str, _params: Value) -> Result<Value, WalletError> {
        self.calls.lock().unwrap().push(method.to_string());
        Ok(self.accounts.clone())
    }

    fn subscribe(&self) -> WalletSubscription {
        self.hub.subscribe()
    }
}
