// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names, default values, and the
//! [`ServerConfig`] loaded from them once at startup. The minting service
//! credential is only ever read from the environment.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `MINT_SERVICE_URL` | Base URL of the paymaster minting service | `https://opendu-paymaster-production.up.railway.app` |
//! | `MINT_SERVICE_API_KEY` | API key sent as `X-API-Key` upstream | Required |
//! | `MINT_SERVICE_TIMEOUT_SECS` | Upstream request timeout | Unset (no explicit timeout) |
//! | `TLS_CERT_PATH` | PEM certificate chain for HTTPS | Optional |
//! | `TLS_KEY_PATH` | PEM private key for HTTPS | Optional |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, net::SocketAddr, path::PathBuf, time::Duration};

use url::Url;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const MINT_SERVICE_URL_ENV: &str = "MINT_SERVICE_URL";
pub const MINT_SERVICE_API_KEY_ENV: &str = "MINT_SERVICE_API_KEY";
pub const MINT_SERVICE_TIMEOUT_ENV: &str = "MINT_SERVICE_TIMEOUT_SECS";
pub const TLS_CERT_PATH_ENV: &str = "TLS_CERT_PATH";
pub const TLS_KEY_PATH_ENV: &str = "TLS_KEY_PATH";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Filter used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MINT_SERVICE_URL: &str = "https://opendu-paymaster-production.up.railway.app";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Secret credential for the minting service.
///
/// The value is only exposed through [`ApiKey::expose`] when building the
/// outbound header; `Debug` output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

/// Paymaster minting service endpoint settings.
#[derive(Debug, Clone)]
pub struct MintServiceConfig {
    /// Base URL, without the `/api/v1/mint-nft` path.
    pub base_url: Url,
    pub api_key: ApiKey,
    /// `None` leaves the deadline to the network stack.
    pub timeout: Option<Duration>,
}

impl MintServiceConfig {
    pub fn new(base_url: &str, api_key: ApiKey) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            api_key,
            timeout: None,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Certificate and key paths for HTTPS serving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Process-wide configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub mint_service: MintServiceConfig,
    pub tls: Option<TlsPaths>,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env_or_default(HOST_ENV, DEFAULT_HOST);
        let port = match env_optional(PORT_ENV) {
            Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };
        let bind_addr: SocketAddr =
            format!("{host}:{port}")
                .parse()
                .map_err(|e: std::net::AddrParseError| ConfigError::Invalid {
                    name: HOST_ENV,
                    reason: e.to_string(),
                })?;

        let base_url = env_or_default(MINT_SERVICE_URL_ENV, DEFAULT_MINT_SERVICE_URL);
        let api_key = ApiKey::new(env_required(MINT_SERVICE_API_KEY_ENV)?);
        let mut mint_service = MintServiceConfig::new(&base_url, api_key)?;
        if let Some(raw) = env_optional(MINT_SERVICE_TIMEOUT_ENV) {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: MINT_SERVICE_TIMEOUT_ENV,
                reason: e.to_string(),
            })?;
            mint_service = mint_service.with_timeout(Duration::from_secs(secs));
        }

        let tls = match (
            env_optional(TLS_CERT_PATH_ENV),
            env_optional(TLS_KEY_PATH_ENV),
        ) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert: cert.into(),
                key: key.into(),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing(TLS_KEY_PATH_ENV)),
            (None, Some(_)) => return Err(ConfigError::Missing(TLS_CERT_PATH_ENV)),
        };

        Ok(Self {
            bind_addr,
            mint_service,
            tls,
        })
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
        name: MINT_SERVICE_URL_ENV,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::Invalid {
            name: MINT_SERVICE_URL_ENV,
            reason: format!("unsupported scheme `{other}`"),
        }),
    }
}

fn env_required(name: &'static str) -> Result<String, ConfigError> {
    env_optional(name).ok_or(ConfigError::Missing(name))
}

fn env_optional(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    env_optional(name).unwrap_or_else(|| default.to_string())
}
