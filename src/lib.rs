// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! NFT Mint Gateway - paymaster minting proxy
//!
//! This crate forwards wallet mint requests to the external paymaster minting
//! service, injecting the server-held API key, and provides the client-side
//! session that drives a mint from a connected wallet.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `client` - Mint session state machine and wallet integration
//! - `providers` - Paymaster minting service client
//! - `server` - HTTP(S) serving and graceful shutdown

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod server;
pub mod state;
pub mod telemetry;
