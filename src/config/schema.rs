//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A CSP policy as written in config: directive name → allowed sources.
pub type CspTable = BTreeMap<String, Vec<String>>;

/// Root configuration for the scoreboard gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Session cookie settings.
    pub session: SessionConfig,

    /// Response security header settings.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Identity store settings.
    pub store: StoreConfig,

    /// Competition window exposed as `gametime`.
    pub game: GameConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session blob.
    pub cookie_name: String,

    /// HMAC key used to sign the session blob.
    pub secret_key: String,

    /// Mark the cookie `Secure`.
    pub secure: bool,

    /// Encoded cookies above this size are not written.
    pub max_cookie_bytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "session".to_string(),
            // WARNING: This is a placeholder! Change this in production.
            secret_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            secure: false,
            max_cookie_bytes: 4093,
        }
    }
}

/// Security header configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SecurityConfig {
    /// Full override of the content security policy.
    pub csp_policy: Option<CspTable>,

    /// Sources appended to the default policy, per directive.
    pub extend_csp_policy: Option<CspTable>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Count identity store statements per request and log the total.
    pub count_queries: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            count_queries: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Identity store configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// JSON fixture with `users` and `teams` arrays loaded at startup.
    pub seed_path: Option<String>,
}

/// Competition window, as unix timestamps.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GameConfig {
    pub start: Option<u64>,
    pub end: Option<u64>,
}
