// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{HeaderName, Request},
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use crate::{
    error::ErrorBody,
    models::{MintNftRequest, MintResult, MintTransactionRecord, WalletAddress},
    state::AppState,
};

pub mod health;
pub mod mint;

pub const MINT_ROUTE: &str = "/api/mint-nft";

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Assigns a random UUID to every request that arrives without one.
#[derive(Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        Uuid::new_v4().to_string().parse().ok().map(RequestId::new)
    }
}

pub fn router(state: AppState) -> Router {
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let routes = Router::new()
        .route(MINT_ROUTE, post(mint::mint_nft))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(request_id.clone(), UuidRequestId))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::new(request_id)),
        )
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    paths(mint::mint_nft, health::liveness, health::readiness),
    components(
        schemas(
            MintNftRequest,
            MintResult,
            MintTransactionRecord,
            WalletAddress,
            ErrorBody,
            health::HealthResponse,
            health::ReadyResponse
        )
    ),
    tags(
        (name = "Mint", description = "NFT minting through the paymaster service"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
