//! HTTP-based documentation loader
//!
//! Fetches retry and authenticate through the same contract the generated
//! clients implement.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::application::{ApplicationError, SourceLoader};
use crate::core::contract::{AttemptOutcome, AuthSettings, RetryDecision, RetryPolicy};
use crate::generation::defaults::CLIENT_DEFAULTS;

/// Loads documentation from HTTP/HTTPS URLs
pub struct HttpSourceLoader {
    client: Client,
    timeout: Duration,
    policy: RetryPolicy,
    auth: AuthSettings,
}

impl HttpSourceLoader {
    pub fn new() -> Self {
        let timeout = Duration::from_millis(CLIENT_DEFAULTS.timeout_ms);
        Self {
            client: build_client(timeout),
            timeout,
            policy: RetryPolicy::default(),
            auth: AuthSettings::default(),
        }
    }

    /// Per-attempt request timeout
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self.timeout = timeout;
        self
    }

    /// Credentials sent with every fetch
    pub fn with_auth(mut self, auth: AuthSettings) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

fn build_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl Default for HttpSourceLoader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SourceLoader for HttpSourceLoader {
    async fn load(&self, source: &str) -> Result<String, ApplicationError> {
        // Only handle HTTP(S) URLs
        if !source.starts_with("http://") && !source.starts_with("https://") {
            return Err(ApplicationError::load(
                source,
                "HttpSourceLoader only handles HTTP(S) URLs",
            ));
        }

        let headers = self.auth.headers()?;
        let mut attempt = 1;
        loop {
            let mut request = self.client.get(source);
            for (name, value) in &headers {
                request = request.header(name.as_str(), value.as_str());
            }

            let (outcome, failure) = match request.send().await {
                Ok(response) if response.status().is_success() => {
                    let content = response.text().await.map_err(|e| {
                        ApplicationError::load(source, format!("Failed to read response body: {e}"))
                    })?;
                    tracing::debug!(source, attempt, bytes = content.len(), "Fetched documentation");
                    return Ok(content);
                }
                Ok(response) => (
                    AttemptOutcome::Status(response.status().as_u16()),
                    format!("HTTP {}", response.status()),
                ),
                Err(e) => (AttemptOutcome::Transport, e.to_string()),
            };

            match self.policy.decide(attempt, outcome) {
                RetryDecision::Retry(delay) => {
                    tracing::warn!(
                        source,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "Fetch failed ({failure}), retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::Done | RetryDecision::Surface => {
                    return Err(ApplicationError::load(source, failure));
                }
            }
        }
    }
}
