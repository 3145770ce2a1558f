// src/config.rs
//! Audit configuration with environment overrides.

use std::time::Duration;
use tracing::warn;

const DEFAULT_DETECT_TIMEOUT_SECS: u64 = 8;
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MIN_REQUEST_INTERVAL_MS: u64 = 1000;
const DEFAULT_MIN_CONFIDENCE: f64 = 0.6;
const DEFAULT_USER_AGENT: &str = "RoleAuditBot/0.1 (+https://roleaudit.dev/bot)";

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Ceiling for the detector's careers-page fetch.
    pub detect_timeout: Duration,
    /// Ceiling for provider job-board API calls.
    pub fetch_timeout: Duration,
    /// Minimum spacing between consecutive requests through one fetch gate.
    pub min_request_interval: Duration,
    /// Identifying header sent on every outbound request.
    pub user_agent: String,
    /// Detections below this confidence are not acted on.
    pub min_confidence: f64,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            detect_timeout: Duration::from_secs(DEFAULT_DETECT_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            min_request_interval: Duration::from_millis(DEFAULT_MIN_REQUEST_INTERVAL_MS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

impl AuditConfig {
    /// Load configuration, applying any `ROLEAUDIT_*` environment overrides.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(secs) = env_parsed::<u64>("ROLEAUDIT_DETECT_TIMEOUT_SECS") {
            config.detect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_parsed::<u64>("ROLEAUDIT_FETCH_TIMEOUT_SECS") {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = env_parsed::<u64>("ROLEAUDIT_MIN_REQUEST_INTERVAL_MS") {
            config.min_request_interval = Duration::from_millis(ms);
        }
        if let Some(confidence) = env_parsed::<f64>("ROLEAUDIT_MIN_CONFIDENCE") {
            config.min_confidence = confidence.clamp(0.0, 1.0);
        }
        if let Ok(agent) = std::env::var("ROLEAUDIT_USER_AGENT") {
            if !agent.trim().is_empty() {
                config.user_agent = agent;
            }
        }

        config
    }
}

/// Parse an environment variable, falling back to the default on bad input.
fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match raw.parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuditConfig::default();
        assert_eq!(config.detect_timeout, Duration::from_secs(8));
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.min_request_interval, Duration::from_millis(1000));
        assert_eq!(config.min_confidence, 0.6);
        assert!(config.user_agent.contains("RoleAuditBot"));
    }

    #[test]
    fn test_env_override_and_fallback() {
        std::env::set_var("ROLEAUDIT_FETCH_TIMEOUT_SECS", "30");
        std::env::set_var("ROLEAUDIT_MIN_CONFIDENCE", "not-a-number");

        let config = AuditConfig::load();

        std::env::remove_var("ROLEAUDIT_FETCH_TIMEOUT_SECS");
        std::env::remove_var("ROLEAUDIT_MIN_CONFIDENCE");

        assert_eq!(config.fetch_timeout, Duration::from_secs(30));
        assert_eq!(config.min_confidence, DEFAULT_MIN_CONFIDENCE);
    }
}
