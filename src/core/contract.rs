//! Runtime contract shared by generated clients and the HTTP source loader
//!
//! Two pure pieces of behavior are specified once here and mirrored by every
//! emitted client: deriving authentication headers from configuration, and
//! deciding whether a failed request is retried and after what delay.

use std::collections::BTreeMap;
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use zeroize::Zeroizing;

use crate::core::model::DEFAULT_API_KEY_HEADER;

/// Configuration faults raised while deriving auth headers
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContractError {
    #[error("{auth_type} authentication requires {field}")]
    MissingCredential {
        auth_type: &'static str,
        field: &'static str,
    },

    #[error("unknown auth type: {0}")]
    UnknownAuthType(String),
}

/// Auth strategy selector, mirroring `API_AUTH_TYPE` in generated clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthType {
    #[default]
    None,
    Bearer,
    ApiKey,
    Basic,
    OAuth2,
}

impl std::str::FromStr for AuthType {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" => Ok(AuthType::None),
            "bearer" => Ok(AuthType::Bearer),
            "apiKey" | "apikey" | "api_key" => Ok(AuthType::ApiKey),
            "basic" => Ok(AuthType::Basic),
            "oauth2" => Ok(AuthType::OAuth2),
            other => Err(ContractError::UnknownAuthType(other.to_string())),
        }
    }
}

/// Credentials and auth selection; secrets are wiped on drop
#[derive(Debug, Clone, Default)]
pub struct AuthSettings {
    pub auth_type: AuthType,
    pub api_key: Option<Zeroizing<String>>,
    pub bearer_token: Option<Zeroizing<String>>,
    pub username: Option<String>,
    pub password: Option<Zeroizing<String>>,
    pub access_token: Option<Zeroizing<String>>,
    pub header_name: Option<String>,
}

fn present(value: &Option<Zeroizing<String>>) -> Option<&str> {
    value.as_deref().map(String::as_str).filter(|v| !v.is_empty())
}

impl AuthSettings {
    /// Bearer auth with the given token
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            auth_type: AuthType::Bearer,
            bearer_token: Some(Zeroizing::new(token.into())),
            ..Default::default()
        }
    }

    /// Derives the header map for the configured auth type.
    ///
    /// | type | header |
    /// |---|---|
    /// | bearer | `Authorization: Bearer <apiKey or bearerToken>` |
    /// | apiKey | `<headerName or X-API-Key>: <apiKey>` |
    /// | basic | `Authorization: Basic base64(user:pass)` |
    /// | oauth2 | `Authorization: Bearer <accessToken>` |
    /// | none | nothing |
    pub fn headers(&self) -> Result<BTreeMap<String, String>, ContractError> {
        let mut headers = BTreeMap::new();
        match self.auth_type {
            AuthType::None => {}
            AuthType::Bearer => {
                let token = present(&self.api_key)
                    .or_else(|| present(&self.bearer_token))
                    .ok_or(ContractError::MissingCredential {
                        auth_type: "bearer",
                        field: "an API key or bearer token",
                    })?;
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }
            AuthType::ApiKey => {
                let key = present(&self.api_key).ok_or(ContractError::MissingCredential {
                    auth_type: "apiKey",
                    field: "an API key",
                })?;
                let name = self
                    .header_name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .unwrap_or(DEFAULT_API_KEY_HEADER);
                headers.insert(name.to_string(), key.to_string());
            }
            AuthType::Basic => {
                let (Some(user), Some(pass)) = (
                    self.username.as_deref().filter(|u| !u.is_empty()),
                    present(&self.password),
                ) else {
                    return Err(ContractError::MissingCredential {
                        auth_type: "basic",
                        field: "a username and password",
                    });
                };
                let encoded = STANDARD.encode(format!("{user}:{pass}"));
                headers.insert("Authorization".to_string(), format!("Basic {encoded}"));
            }
            AuthType::OAuth2 => {
                let token = present(&self.access_token).ok_or(ContractError::MissingCredential {
                    auth_type: "oauth2",
                    field: "an access token",
                })?;
                headers.insert("Authorization".to_string(), format!("Bearer {token}"));
            }
        }
        Ok(headers)
    }
}

/// What a single attempt produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// A response arrived with this status
    Status(u16),
    /// No response was received
    Transport,
}

impl AttemptOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, AttemptOutcome::Status(s) if (200..300).contains(s))
    }

    /// 4xx other than 429 is surfaced at once; 5xx, 429 and transport failures may be retried
    pub fn is_retryable(&self) -> bool {
        match self {
            AttemptOutcome::Status(429) => true,
            AttemptOutcome::Status(s) if (400..500).contains(s) => false,
            AttemptOutcome::Status(_) | AttemptOutcome::Transport => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The attempt succeeded; return its result
    Done,
    /// Sleep for the delay, then attempt again
    Retry(Duration),
    /// Give up and surface the failure
    Surface,
}

/// Retry with capped exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        let defaults = crate::generation::defaults::CLIENT_DEFAULTS;
        Self {
            max_retries: defaults.max_retries,
            base_delay: Duration::from_millis(defaults.backoff_base_ms),
            max_delay: Duration::from_millis(defaults.backoff_cap_ms),
        }
    }
}

impl RetryPolicy {
    /// `min(base * 2^(attempt-1), cap)` for a 1-based attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let factor = 1u32 << exponent;
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }

    /// Decides what follows attempt number `attempt` (1-based)
    pub fn decide(&self, attempt: u32, outcome: AttemptOutcome) -> RetryDecision {
        if outcome.is_success() {
            return RetryDecision::Done;
        }
        if !outcome.is_retryable() || attempt >= self.max_retries.max(1) {
            return RetryDecision::Surface;
        }
        RetryDecision::Retry(self.delay_for_attempt(attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(auth_type: AuthType) -> AuthSettings {
        AuthSettings {
            auth_type,
            ..Default::default()
        }
    }

    #[test]
    fn test_api_key_uses_default_header() {
        let mut s = settings(AuthType::ApiKey);
        s.api_key = Some(Zeroizing::new("k".to_string()));
        let headers = s.headers().unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("X-API-Key").map(String::as_str), Some("k"));
    }

    #[test]
    fn test_api_key_custom_header_and_missing_key() {
        let mut s = settings(AuthType::ApiKey);
        s.header_name = Some("X-Token".to_string());
        assert!(matches!(
            s.headers(),
            Err(ContractError::MissingCredential { auth_type: "apiKey", .. })
        ));
        s.api_key = Some(Zeroizing::new("secret".to_string()));
        assert_eq!(s.headers().unwrap()["X-Token"], "secret");
    }

    #[test]
    fn test_bearer_prefers_api_key_field() {
        let mut s = AuthSettings::bearer("from-bearer");
        assert_eq!(s.headers().unwrap()["Authorization"], "Bearer from-bearer");
        s.api_key = Some(Zeroizing::new("from-key".to_string()));
        assert_eq!(s.headers().unwrap()["Authorization"], "Bearer from-key");
        assert!(settings(AuthType::Bearer).headers().is_err());
    }

    #[test]
    fn test_basic_and_oauth2() {
        let mut basic = settings(AuthType::Basic);
        basic.username = Some("user".to_string());
        assert!(basic.headers().is_err());
        basic.password = Some(Zeroizing::new("pass".to_string()));
        assert_eq!(basic.headers().unwrap()["Authorization"], "Basic dXNlcjpwYXNz");

        let mut oauth = settings(AuthType::OAuth2);
        assert!(oauth.headers().is_err());
        oauth.access_token = Some(Zeroizing::new("tok".to_string()));
        assert_eq!(oauth.headers().unwrap()["Authorization"], "Bearer tok");

        assert!(settings(AuthType::None).headers().unwrap().is_empty());
    }

    #[test]
    fn test_auth_type_from_str() {
        assert_eq!("apiKey".parse::<AuthType>().unwrap(), AuthType::ApiKey);
        assert_eq!("".parse::<AuthType>().unwrap(), AuthType::None);
        assert!("digest".parse::<AuthType>().is_err());
    }

    #[test]
    fn test_backoff_is_capped() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for_attempt(4), Duration::from_millis(8000));
        assert_eq!(policy.delay_for_attempt(5), Duration::from_millis(10000));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_millis(10000));
    }

    #[test]
    fn test_persistent_server_error_takes_three_attempts() {
        let policy = RetryPolicy::default();
        let mut attempts = 0;
        let mut delays = Vec::new();
        loop {
            attempts += 1;
            match policy.decide(attempts, AttemptOutcome::Status(500)) {
                RetryDecision::Retry(delay) => delays.push(delay),
                RetryDecision::Surface => break,
                RetryDecision::Done => unreachable!(),
            }
        }
        assert_eq!(attempts, 3);
        assert_eq!(
            delays,
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[test]
    fn test_client_errors_are_not_retried() {
        let policy = RetryPolicy {
            max_retries: 10,
            ..Default::default()
        };
        assert_eq!(policy.decide(1, AttemptOutcome::Status(404)), RetryDecision::Surface);
        assert!(matches!(
            policy.decide(1, AttemptOutcome::Status(429)),
            RetryDecision::Retry(_)
        ));
        assert!(matches!(
            policy.decide(1, AttemptOutcome::Transport),
            RetryDecision::Retry(_)
        ));
        assert_eq!(policy.decide(1, AttemptOutcome::Status(204)), RetryDecision::Done);
    }

    #[test]
    fn test_zero_retries_still_attempts_once() {
        let policy = RetryPolicy {
            max_retries: 0,
            ..Default::default()
        };
        assert_eq!(policy.decide(1, AttemptOutcome::Status(503)), RetryDecision::Surface);
    }
}
