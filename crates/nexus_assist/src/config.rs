//! Assistant configuration.
//!
//! Resolution order, later wins:
//! 1. Built-in defaults
//! 2. `<workspace>/.nexus/settings.json` (optional)
//! 3. Environment: `NEXUS_API_URL`, `NEXUS_API_TOKEN`, `NEXUS_TIMEOUT_SECS`,
//!    `NEXUS_RETRY_ATTEMPTS`

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult};
use crate::types::MAX_CONTEXT_TURNS;

/// Backend proxy used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Bounded retry applied by the facade around a single gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetryPolicy {
    /// Total attempts, including the first. 1 disables retry.
    pub max_attempts: u32,
    /// Delay before the first retry; doubles for each later one
    pub base_delay_ms: u64,
    /// Upper bound on any single delay
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

impl RetryPolicy {
    /// A single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 500,
            max_delay_ms: 4_000,
        }
    }

    pub fn attempts(max_attempts: u32) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..Self::none()
        }
    }

    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.base_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.saturating_sub(1).min(16);
        let delay = self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms);
        Duration::from_millis(delay)
    }
}

/// Configuration for the gateway and facade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssistantConfig {
    /// Base URL of the generation proxy
    pub api_url: String,
    /// Bearer token for the proxy, never the provider key
    #[serde(skip_serializing)]
    pub api_token: Option<String>,
    pub timeout_secs: u64,
    /// Turns of history sent with each chat prompt
    pub context_window: usize,
    pub retry: RetryPolicy,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            timeout_secs: 30,
            context_window: MAX_CONTEXT_TURNS,
            retry: RetryPolicy::default(),
        }
    }
}

impl AssistantConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> ConfigResult<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Workspace settings file, then the process environment.
    pub fn load(workspace_root: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with(workspace_root, |key| std::env::var(key).ok())
    }

    /// Workspace settings file, then the given environment lookup.
    pub fn load_with(
        workspace_root: impl AsRef<Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let settings_path = workspace_root.as_ref().join(".nexus").join("settings.json");

        let base = if settings_path.exists() {
            debug!("Loading assistant settings from {:?}", settings_path);
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content)?
        } else {
            Self::default()
        };

        base.with_env(lookup)
    }

    /// Apply overrides from an environment lookup and validate the result.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("NEXUS_API_URL") {
            self.api_url = url;
        }
        if let Some(token) = get("NEXUS_API_TOKEN") {
            self.api_token = Some(token);
        }
        if let Some(timeout) = get("NEXUS_TIMEOUT_SECS") {
            self.timeout_secs = parse_number("NEXUS_TIMEOUT_SECS", &timeout)?;
        }
        if let Some(attempts) = get("NEXUS_RETRY_ATTEMPTS") {
            self.retry.max_attempts = parse_number("NEXUS_RETRY_ATTEMPTS", &attempts)?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = self.api_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "apiUrl must be an http(s) URL, got '{}'",
                self.api_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid("timeoutSecs must be positive".to_string()));
        }
        if self.context_window > MAX_CONTEXT_TURNS {
            return Err(ConfigError::Invalid(format!(
                "contextWindow must be at most {}",
                MAX_CONTEXT_TURNS
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid("retry.maxAttempts must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid(format!("{} must be a number, got '{}'", key, value)))
}
