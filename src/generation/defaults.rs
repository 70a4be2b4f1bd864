//! Fallback values baked into every generated client
//!
//! These are the only definitions of the numbers; templates read them from
//! the render context and the built-in HTTP loader reads them directly.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClientDefaults {
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Total attempts, including the first
    pub max_retries: u32,
    pub auth_type: &'static str,
    pub api_key_header: &'static str,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
}

pub const CLIENT_DEFAULTS: ClientDefaults = ClientDefaults {
    timeout_ms: 30_000,
    max_retries: 3,
    auth_type: "none",
    api_key_header: crate::core::model::DEFAULT_API_KEY_HEADER,
    backoff_base_ms: 1_000,
    backoff_cap_ms: 10_000,
};
