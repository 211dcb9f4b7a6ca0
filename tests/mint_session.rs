// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

mod common;

use std::time::Duration;

use nft_mint_gateway::client::{ClientConfig, MintPhase, MintSession, NOTIFICATION_TIMEOUT};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{spawn_gateway, unreachable_base_url, StaticWallet, RECEIVER};

fn minted_body() -> serde_json::Value {
    json!({
        "code": 200,
        "message": "ok",
        "data": {
            "status": "success",
            "tx_hash": "0xdeadbeef",
            "user_op_hash": "0xfeed",
            "block_number": "123",
            "block_hash": "0xb10c",
            "timestamp": 1_700_000_000
        }
    })
}

#[tokio::test]
async fn successful_mint_shows_result_and_notification() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/mint-nft"))
        .and(body_json(json!({ "receiver_address": RECEIVER, "token_uri": "ipfs://xyz" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(minted_body()))
        .expect(1)
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;
    session.set_token_uri("ipfs://xyz");
    assert_eq!(session.display_address().as_deref(), Some("0xABC0...0001"));
    assert!(session.can_submit());

    let phase = session.submit().await;

    assert_eq!(phase, MintPhase::Succeeded);
    assert!(!session.is_loading());
    assert!(session.error().is_none());

    let view = session.success_view().expect("success panel shown");
    let rendered = view.to_string();
    assert!(rendered.contains("NFT Minted Successfully!"));
    assert!(rendered.contains("Transaction Hash: 0xdeadbeef"));
    assert!(rendered.contains("Block Number: 123"));
    assert_eq!(view.minted_at.map(|t| t.timestamp()), Some(1_700_000_000));

    let notification = session.notification().expect("notification visible");
    assert_eq!(notification.tx_hash(), "0xdeadbeef");
    assert_eq!(
        notification.explorer_url(),
        "https://sepolia.basescan.org/tx/0xdeadbeef"
    );

    // Freeze the clock; sleeping then auto-advances simulated time.
    tokio::time::pause();
    tokio::time::sleep(NOTIFICATION_TIMEOUT - Duration::from_secs(1)).await;
    assert!(session.notification().is_some());

    tokio::time::sleep(Duration::from_secs(1) + Duration::from_millis(1)).await;
    assert!(session.notification().is_none());
    assert!(session.success_view().is_some());
}

#[tokio::test]
async fn notification_can_be_dismissed_manually() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(minted_body()))
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;
    session.submit().await;
    assert!(session.notification().is_some());

    session.dismiss_notification();
    assert!(session.notification().is_none());
}

#[tokio::test]
async fn result_without_tx_hash_has_no_notification() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "code": 202, "message": "queued" })),
        )
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Succeeded);
    assert!(session.notification().is_none());
    assert_eq!(session.result().map(|r| r.message.as_str()), Some("queued"));
    // Only code 200 renders the success panel.
    assert!(session.success_view().is_none());
}

#[tokio::test]
async fn upstream_unavailable_surfaces_upstream_message() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "service unavailable" })),
        )
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Failed);
    assert_eq!(session.error(), Some("service unavailable"));
    assert!(session.result().is_none());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn malformed_upstream_response_surfaces_invalid_response_error() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Failed);
    assert_eq!(
        session.error(),
        Some("Invalid response from minting service")
    );
}

#[tokio::test]
async fn locked_wallet_never_reaches_the_proxy() {
    let gateway = spawn_gateway().await;

    let mut session = gateway.session(StaticWallet::locked());
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Idle);
    assert_eq!(session.error(), Some("Please connect your wallet first"));
    assert_eq!(gateway.upstream_requests().await, 0);
}

#[tokio::test]
async fn failed_mint_can_be_resubmitted() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "nonce too low" })))
        .up_to_n_times(1)
        .mount(&gateway.upstream)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(minted_body()))
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Failed);
    assert_eq!(session.error(), Some("nonce too low"));

    assert_eq!(session.submit().await, MintPhase::Succeeded);
    assert!(session.error().is_none());
    assert_eq!(gateway.upstream_requests().await, 2);
}

#[tokio::test]
async fn unreachable_proxy_uses_generic_message() {
    let config = ClientConfig::default().with_proxy_base_url(unreachable_base_url().await);
    let mut session = MintSession::new(config, Some(StaticWallet::connected(RECEIVER)))
        .expect("session builds");
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Failed);
    assert_eq!(
        session.error(),
        Some("Failed to mint NFT. Please try again.")
    );
}

#[tokio::test]
async fn loosely_typed_success_still_notifies() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "code": 200,
            "message": null,
            "data": { "tx_hash": "0xdeadbeef", "block_number": 123 }
        })))
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    assert_eq!(session.submit().await, MintPhase::Succeeded);
    assert!(session.error().is_none());
    assert_eq!(
        session.notification().map(|n| n.tx_hash()),
        Some("0xdeadbeef")
    );
    let rendered = session.success_view().expect("success panel shown").to_string();
    assert!(rendered.contains("Block Number: 123"));
}

#[tokio::test]
async fn cancelled_submit_can_be_retried() {
    let gateway = spawn_gateway().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(minted_body())
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .mount(&gateway.upstream)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(minted_body()))
        .mount(&gateway.upstream)
        .await;

    let mut session = gateway.session(StaticWallet::connected(RECEIVER));
    session.check_existing_connection().await;

    let cancelled = tokio::time::timeout(Duration::from_millis(200), session.submit()).await;
    assert!(cancelled.is_err());
    assert!(!session.is_loading());
    assert!(session.can_submit());

    assert_eq!(session.submit().await, MintPhase::Succeeded);
    assert!(session.notification().is_some());
}
