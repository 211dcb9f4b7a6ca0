// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Mint proxy endpoint.
//!
//! Validates the inbound request, forwards it to the paymaster with the
//! server-held API key, and normalizes the upstream answer:
//!
//! | Upstream outcome | Proxy response |
//! |------------------|----------------|
//! | 2xx, JSON (or empty) body | `200`, body relayed verbatim |
//! | non-2xx, JSON body | same status, `{ "error": <message> }` |
//! | body is not JSON | `500`, `{ "error", "details": <raw text> }` |
//! | transport failure | `500`, `{ "error": "Internal server error" }` |
//!
//! Single attempt, no retries.

use axum::{body::Bytes, extract::State, Json};
use serde_json::Value;
use tracing::{error, info};

use crate::{
    error::{ApiError, ErrorBody},
    models::{MintNftRequest, MintResult},
    providers::paymaster::extract_upstream_message,
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/mint-nft",
    request_body = MintNftRequest,
    tag = "Mint",
    responses(
        (status = 200, description = "Paymaster result, relayed verbatim", body = MintResult),
        (status = 400, description = "receiver_address or token_uri missing", body = ErrorBody),
        (status = 500, description = "Invalid paymaster response or internal error", body = ErrorBody)
    )
)]
pub async fn mint_nft(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let payload: MintNftRequest = serde_json::from_slice(&body).map_err(|e| {
        error!(error = %e, "Mint proxy: failed to decode request body");
        ApiError::internal()
    })?;

    let request = payload
        .into_mint_request()
        .ok_or_else(ApiError::missing_fields)?;

    info!(
        receiver_address = %request.receiver_address,
        token_uri = %request.token_uri,
        "Mint proxy: minting NFT"
    );

    let upstream = state.paymaster.mint_nft(&request).await.map_err(|e| {
        error!(error = %e, "Mint proxy: paymaster call failed");
        ApiError::internal()
    })?;

    info!(
        status = upstream.status.as_u16(),
        response = %upstream.body,
        "Mint proxy: paymaster response"
    );

    let parsed = upstream.parse_json().map_err(|e| {
        error!(error = %e, "Mint proxy: paymaster response is not valid JSON");
        ApiError::invalid_upstream(upstream.body.clone())
    })?;

    if !upstream.status.is_success() {
        return Err(ApiError::upstream(
            upstream.status,
            extract_upstream_message(&parsed),
        ));
    }

    Ok(Json(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiKey, MintServiceConfig};
    use axum::http::StatusCode;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn state_for(server: &MockServer) -> AppState {
        let config = MintServiceConfig::new(&server.uri(), ApiKey::new("test-api-key"))
            .expect("mock server uri is valid");
        AppState::from_config(&config).expect("client builds")
    }

    fn body(value: Value) -> Bytes {
        Bytes::from(serde_json::to_vec(&value).unwrap())
    }

    #[tokio::test]
    async fn forwards_request_with_api_key() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/mint-nft"))
            .and(header("X-API-Key", "test-api-key"))
            .and(header("Content-Type", "application/json"))
            .and(body_json(json!({
                "receiver_address": "0xabc",
                "token_uri": "ipfs://xyz"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 200,
                "message": "ok"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let Json(result) = mint_nft(
            State(state_for(&server).await),
            body(json!({ "receiver_address": "0xabc", "token_uri": "ipfs://xyz" })),
        )
        .await
        .expect("mint succeeds");

        assert_eq!(result, json!({ "code": 200, "message": "ok" }));
    }

    #[tokio::test]
    async fn missing_token_uri_is_rejected_without_upstream_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = mint_nft(
            State(state_for(&server).await),
            body(json!({ "receiver_address": "0xabc" })),
        )
        .await
        .expect_err("validation fails");

        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            err.message,
            "Missing required fields: receiver_address or token_uri"
        );
    }

    #[tokio::test]
    async fn undecodable_body_is_an_internal_error() {
        let server = MockServer::start().await;

        let err = mint_nft(State(state_for(&server).await), Bytes::from_static(b"not json"))
            .await
            .expect_err("decode fails");

        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "Internal server error");
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_upstream_body_is_relayed_as_empty_object() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let Json(result) = mint_nft(
            State(state_for(&server).await),
            body(json!({ "receiver_address": "0xabc", "token_uri": "ipfs://xyz" })),
        )
        .await
        .expect("empty body is accepted");

        assert_eq!(result, json!({}));
    }

    #[tokio::test]
    async fn upstream_failure_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({ "code": 422 })))
            .mount(&server)
            .await;

        let err = mint_nft(
            State(state_for(&server).await),
            body(json!({ "receiver_address": "0xabc", "token_uri": "ipfs://xyz" })),
        )
        .await
        .expect_err("upstream failure");

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.message, "Failed to mint NFT");
    }
}
