// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP(S) serving with graceful shutdown.

use std::time::Duration;

use axum_server::{tls_rustls::RustlsConfig, Handle};
use tracing::info;

use crate::{
    api::router,
    config::{ConfigError, ServerConfig},
    providers::PaymasterError,
    state::AppState,
};

/// Grace period for in-flight mints once a shutdown signal arrives.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Paymaster(#[from] PaymasterError),

    #[error("failed to load TLS credentials: {0}")]
    Tls(std::io::Error),

    #[error("server failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serves the API until Ctrl-C or SIGTERM.
///
/// HTTPS is used when TLS paths are configured, plain HTTP otherwise.
pub async fn run(config: ServerConfig) -> Result<(), ServerError> {
    let state = AppState::from_config(&config.mint_service)?;
    let app = router(state);
    let addr = config.bind_addr;

    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        info!(
            grace_secs = SHUTDOWN_GRACE.as_secs(),
            "Shutdown signal received, draining connections"
        );
        shutdown.graceful_shutdown(Some(SHUTDOWN_GRACE));
    });

    match config.tls {
        Some(paths) => {
            let tls = RustlsConfig::from_pem_file(&paths.cert, &paths.key)
                .await
                .map_err(ServerError::Tls)?;
            info!(%addr, mint_url = %config.mint_service.base_url, "Mint gateway listening on https (docs at /docs)");
            axum_server::bind_rustls(addr, tls)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
        None => {
            info!(%addr, mint_url = %config.mint_service.base_url, "Mint gateway listening on http (docs at /docs)");
            axum_server::bind(addr)
                .handle(handle)
                .serve(app.into_make_service())
                .await?;
        }
    }

    info!("Mint gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
