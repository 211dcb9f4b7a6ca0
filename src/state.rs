// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    config::MintServiceConfig,
    providers::{PaymasterClient, PaymasterError},
};

/// Shared, read-only handler state.
#[derive(Clone)]
pub struct AppState {
    pub paymaster: Arc<PaymasterClient>,
}

impl AppState {
    pub fn new(paymaster: PaymasterClient) -> Self {
        Self {
            paymaster: Arc::new(paymaster),
        }
    }

    pub fn from_config(config: &MintServiceConfig) -> Result<Self, PaymasterError> {
        Ok(Self::new(PaymasterClient::new(config)?))
    }
}
