// src/http.rs
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between consecutive requests.
///
/// Owned by one [`FetchGate`]; audits that should share throttling toward a
/// provider share the gate, audits that should not own separate gates.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Sleep just long enough to guarantee the minimum spacing, then record
    /// this request. The lock is held across the sleep so concurrent callers
    /// queue instead of stampeding.
    pub async fn wait(&self) {
        let mut last = self.last_request.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let pause = self.min_interval - elapsed;
                debug!("Rate limiter pausing for {:?}", pause);
                tokio::time::sleep(pause).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Bounded, rate-limited request primitive used by every outbound call.
///
/// Any HTTP status comes back as `Ok` for the caller to handle; only
/// transport failure and deadline expiry are errors.
pub struct FetchGate {
    client: Client,
    limiter: RateLimiter,
}

impl FetchGate {
    pub fn new(timeout: Duration, min_interval: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            limiter: RateLimiter::new(min_interval),
        })
    }

    /// Plain GET, following redirects. Used for careers pages.
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.limiter.wait().await;
        self.client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))
    }

    /// GET expecting a JSON body. Used for provider job-board APIs.
    pub async fn get_json(&self, url: &str) -> Result<Response> {
        self.limiter.wait().await;
        self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))
    }

    pub async fn post_json<T: Serialize>(&self, url: &str, body: &T) -> Result<Response> {
        self.limiter.wait().await;
        self.client
            .post(url)
            .header("Accept", "application/json")
            .json(body)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rate_limiter_enforces_spacing() {
        let limiter = RateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();

        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;

        // Three requests: the second and third each wait out the interval.
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_rate_limiter_first_request_is_immediate() {
        let limiter = RateLimiter::new(Duration::from_secs(5));
        let start = Instant::now();

        limiter.wait().await;

        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
