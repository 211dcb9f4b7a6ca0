// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! External service integrations.

pub mod paymaster;

pub use paymaster::{PaymasterClient, PaymasterError, UpstreamResponse};
