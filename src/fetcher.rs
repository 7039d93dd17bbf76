use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::Client;
use tracing::{debug, error, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Anything that can turn a URL into document text.
#[allow(async_fn_in_trait)]
pub trait Fetch {
    /// The page body, or `None` once the fetcher has given up.
    async fn fetch(&self, url: &str) -> Option<String>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub max_retries: u32,
    pub backoff_factor: f64,
}

impl RetryPolicy {
    /// Linear backoff: `backoff_factor × attempt` seconds.
    pub fn backoff(&self, attempt: u32) -> Duration {
        Duration::try_from_secs_f64(self.backoff_factor.max(0.0) * f64::from(attempt))
            .unwrap_or(Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            timeout: Duration::from_secs(15),
            max_retries: 3,
            backoff_factor: 0.8,
        }
    }
}

/// HTTP fetcher over one pooled client, retrying failed requests.
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    pub fn new(policy: RetryPolicy) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(policy.timeout)
            .build()?;

        Ok(HttpFetcher { client, policy })
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Option<String> {
        let max = self.policy.max_retries;
        let mut last_error: Option<String> = None;

        for attempt in 1..=max {
            debug!("GET {} (attempt {})", url, attempt);
            match self.client.get(url).send().await {
                Ok(resp) if resp.status().as_u16() >= 400 => {
                    warn!("Received HTTP {} for {}", resp.status(), url);
                    last_error = Some(format!("HTTP {}", resp.status()));
                }
                Ok(resp) => match resp.text().await {
                    Ok(body) => return Some(body),
                    Err(e) => {
                        warn!("Failed to read body of {}: {}", url, e);
                        last_error = Some(e.to_string());
                    }
                },
                Err(e) => {
                    warn!("Request error for {}: {}", url, e);
                    last_error = Some(e.to_string());
                }
            }

            if attempt < max {
                let backoff = self.policy.backoff(attempt);
                debug!("Sleeping {:.2}s before retry", backoff.as_secs_f64());
                tokio::time::sleep(backoff).await;
            }
        }

        error!(
            "Failed to fetch {} after {} attempts: {}",
            url,
            max,
            last_error.as_deref().unwrap_or("no attempts made")
        );
        None
    }
}
