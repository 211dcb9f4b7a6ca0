// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Transient "minted" notification with a block explorer link.
//!
//! The notification hides itself after [`NOTIFICATION_TIMEOUT`] unless it is
//! dismissed first. Dropping it stops the timer task.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// How long a notification stays visible without manual dismissal.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug)]
pub struct MintNotification {
    tx_hash: String,
    explorer_url: String,
    hidden: CancellationToken,
}

impl MintNotification {
    /// Shows a notification that auto-hides after [`NOTIFICATION_TIMEOUT`].
    ///
    /// Must be called from within a tokio runtime.
    pub fn show(tx_hash: impl Into<String>, explorer_url: impl Into<String>) -> Self {
        Self::show_for(tx_hash, explorer_url, NOTIFICATION_TIMEOUT)
    }

    pub fn show_for(
        tx_hash: impl Into<String>,
        explorer_url: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let hidden = CancellationToken::new();
        let timer = hidden.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(timeout) => timer.cancel(),
                _ = timer.cancelled() => {}
            }
        });

        Self {
            tx_hash: tx_hash.into(),
            explorer_url: explorer_url.into(),
            hidden,
        }
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden.is_cancelled()
    }

    pub fn dismiss(&self) {
        self.hidden.cancel();
    }

    pub fn tx_hash(&self) -> &str {
        &self.tx_hash
    }

    pub fn explorer_url(&self) -> &str {
        &self.explorer_url
    }
}

impl Drop for MintNotification {
    fn drop(&mut self) {
        self.hidden.cancel();
    }
}
