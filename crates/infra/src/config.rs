//! Process configuration, read from the environment.

use std::net::SocketAddr;

use thiserror::Error;

use pedalshare_auth::DEFAULT_TOKEN_TTL_MINUTES;

const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} is not valid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Runtime settings for the API process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// HTTP + WebSocket listen address (`PEDALSHARE_ADDR`).
    pub listen_addr: SocketAddr,
    /// HS256 signing secret (`JWT_SECRET`).
    pub jwt_secret: String,
    /// Token lifetime in minutes (`TOKEN_TTL_MINUTES`).
    pub token_ttl_minutes: i64,
    /// Size of the request worker pool (`WORKER_THREADS`).
    pub worker_threads: usize,
    /// Origin allowed by CORS (`CORS_ORIGIN`).
    pub cors_origin: String,
    /// Load the demo fleet at startup (`SEED_INVENTORY`).
    pub seed_inventory: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            token_ttl_minutes: DEFAULT_TOKEN_TTL_MINUTES,
            worker_threads: 10,
            cors_origin: "http://localhost:3002".to_string(),
            seed_inventory: true,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(addr) = lookup("PEDALSHARE_ADDR") {
            cfg.listen_addr = parse("PEDALSHARE_ADDR", &addr)?;
        }

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => cfg.jwt_secret = secret,
            _ => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(ttl) = lookup("TOKEN_TTL_MINUTES") {
            cfg.token_ttl_minutes = parse("TOKEN_TTL_MINUTES", &ttl)?;
            if cfg.token_ttl_minutes <= 0 {
                return Err(invalid("TOKEN_TTL_MINUTES", "must be positive"));
            }
        }

        if let Some(workers) = lookup("WORKER_THREADS") {
            cfg.worker_threads = parse("WORKER_THREADS", &workers)?;
            if cfg.worker_threads == 0 {
                return Err(invalid("WORKER_THREADS", "must be at least 1"));
            }
        }

        if let Some(origin) = lookup("CORS_ORIGIN") {
            cfg.cors_origin = origin;
        }

        if let Some(seed) = lookup("SEED_INVENTORY") {
            cfg.seed_inventory = parse("SEED_INVENTORY", &seed)?;
        }

        Ok(cfg)
    }
}

fn parse<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| invalid(key, e.to_string()))
}

fn invalid(key: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key,
        reason: reason.into(),
    }
}
