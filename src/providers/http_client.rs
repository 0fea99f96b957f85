//! Rate-limited HTTP client for blob service APIs
//!
//! Wraps reqwest with a bounded request timeout and a per-minute quota shared
//! by every clone, so concurrent request handlers cannot exceed the provider's
//! API limits or hang on a slow endpoint.

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, RequestBuilder, Response};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::providers::traits::{ProviderError, ProviderResult};

/// Rate-limited HTTP client for API requests
#[derive(Clone)]
pub struct RateLimitedClient {
    /// Inner HTTP client (connection pool is shared between clones)
    client: Client,

    /// Rate limiter (requests per minute), shared between clones
    limiter: Arc<DefaultDirectRateLimiter>,

    /// Configured rate limit
    rate_limit_per_minute: u32,

    /// Request timeout
    timeout: Duration,
}

impl RateLimitedClient {
    /// Create a new rate-limited client
    ///
    /// # Arguments
    /// * `rate_limit_per_minute` - Maximum requests allowed per minute
    /// * `timeout` - Upper bound for a whole request, body included
    /// * `connect_timeout` - Upper bound for establishing the connection
    pub fn new(
        rate_limit_per_minute: u32,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ProviderResult<Self> {
        // At least 1 request per minute
        let rate = NonZeroU32::new(rate_limit_per_minute.max(1)).unwrap_or(NonZeroU32::MIN);
        let limiter = Arc::new(RateLimiter::direct(Quota::per_minute(rate)));

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(10)
            .user_agent(concat!("asset-storage/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(RateLimitedClient {
            client,
            limiter,
            rate_limit_per_minute,
            timeout,
        })
    }

    pub fn rate_limit_per_minute(&self) -> u32 {
        self.rate_limit_per_minute
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Build a GET request
    pub fn get(&self, url: &str) -> RateLimitedRequestBuilder<'_> {
        RateLimitedRequestBuilder {
            client: self,
            builder: self.client.get(url),
        }
    }

    /// Build a POST request
    pub fn post(&self, url: &str) -> RateLimitedRequestBuilder<'_> {
        RateLimitedRequestBuilder {
            client: self,
            builder: self.client.post(url),
        }
    }

    /// Wait for rate limit and execute request
    ///
    /// The wait for a permit counts against the request timeout. Requests are
    /// never retried: a retried upload whose first attempt reached the
    /// provider could store the payload twice.
    async fn execute(&self, builder: RequestBuilder) -> ProviderResult<Response> {
        let send = async {
            self.limiter.until_ready().await;
            debug!("Executing rate-limited request");
            builder.send().await
        };

        let response = tokio::time::timeout(self.timeout, send)
            .await
            .map_err(|_| self.timed_out())?
            .map_err(|e| self.classify(e))?;

        if response.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            warn!(retry_after_secs = retry_after, "Rate limited by blob service");

            return Err(ProviderError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        Ok(response)
    }

    /// Map a reqwest failure, from sending or from reading the body
    pub fn classify(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            self.timed_out()
        } else {
            ProviderError::Http(err)
        }
    }

    fn timed_out(&self) -> ProviderError {
        ProviderError::Timeout {
            timeout_secs: self.timeout.as_secs(),
        }
    }
}

/// Request builder wrapper that enforces rate limiting
pub struct RateLimitedRequestBuilder<'a> {
    client: &'a RateLimitedClient,
    builder: RequestBuilder,
}

impl<'a> RateLimitedRequestBuilder<'a> {
    /// Attach a multipart form body
    pub fn multipart(mut self, form: reqwest::multipart::Form) -> Self {
        self.builder = self.builder.multipart(form);
        self
    }

    /// Attach a url-encoded form body
    pub fn form<T: serde::Serialize + ?Sized>(mut self, form: &T) -> Self {
        self.builder = self.builder.form(form);
        self
    }

    /// Add HTTP basic credentials
    pub fn basic_auth(mut self, username: &str, password: &str) -> Self {
        self.builder = self.builder.basic_auth(username, Some(password));
        self
    }

    /// Send the request (waits for rate limit)
    pub async fn send(self) -> ProviderResult<Response> {
        self.client.execute(self.builder).await
    }
}
