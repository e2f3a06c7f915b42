//! Dispatcher for API requests.
//!
//! This module defines two structs, [`Client`] and [`ClientBuilder`].
//! `Client` sends requests and returns raw response bodies.
//! `ClientBuilder` holds and validates the configuration a `Client` is
//! built from.
#![allow(clippy::module_name_repetitions)]

use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    ErrorKind, Result, check_status,
    cache::ResponseCache,
    endpoint::{DEFAULT_HOST, DEFAULT_NINJA_HOST, Endpoint, HostKind},
    ratelimit::{RateClass, RateLimiter},
};

/// Default number of cached responses, 50.
///
/// A page of the public stash river is around 3MB, so a full cache of stash
/// pages takes about 150MB.
pub const DEFAULT_CACHE_SIZE: usize = 50;
/// Default ceiling for all endpoints except the public stash tabs, 4 requests
/// per second.
///
/// The API allows 5, but clients running right at the limit still see
/// occasional `429` responses.
pub const DEFAULT_RATE_LIMIT: u32 = 4;
/// Default ceiling for the public stash tab endpoint, 1 request per second.
pub const DEFAULT_STASH_RATE_LIMIT: u32 = 1;
/// Highest accepted ceiling for either class, one request per nanosecond.
pub const MAX_RATE_LIMIT: u32 = 1_000_000_000;
/// Default time before a request is cancelled, 2 seconds.
///
/// Some endpoints take more than a second to answer.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Shortest accepted request timeout
const MIN_REQUEST_TIMEOUT: Duration = Duration::from_millis(1);

/// Builder for [`Client`].
///
/// Can be deserialized, e.g. from a TOML config file, where
/// `request_timeout` is a human readable duration like `"2s"`.
/// Missing fields take their default value.
#[derive(TypedBuilder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[builder(field_defaults(default, setter(into)))]
#[builder(builder_method(doc = "
Create a builder for building `ClientBuilder`.

On the builder call, call methods with same name as its fields to set their values.

Finally, call `.build()` to create the instance of `ClientBuilder`.
"))]
#[serde(default)]
pub struct ClientBuilder {
    /// Hostname of the Path of Exile API, optionally with a port.
    ///
    /// Only useful to override for testing.
    #[builder(default = String::from(DEFAULT_HOST))]
    host: String,

    /// Hostname used to look up the latest stash change id.
    #[builder(default = String::from(DEFAULT_NINJA_HOST))]
    ninja_host: String,

    /// Use HTTPS. Turn off if your network does not allow outbound HTTPS.
    #[builder(default = true)]
    use_ssl: bool,

    /// Serve repeated requests for the same URL from memory.
    #[builder(default = true)]
    use_cache: bool,

    /// Number of responses kept in the cache. Expect about 3MB per stash
    /// page and up to 0.5MB for anything else.
    #[builder(default = DEFAULT_CACHE_SIZE)]
    cache_size: usize,

    /// Requests per second for every endpoint except the stash tabs.
    #[builder(default = DEFAULT_RATE_LIMIT)]
    rate_limit: u32,

    /// Requests per second for the public stash tab endpoint.
    #[builder(default = DEFAULT_STASH_RATE_LIMIT)]
    stash_rate_limit: u32,

    /// Time to wait before cancelling a request.
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    #[serde(with = "humantime_serde")]
    request_timeout: Duration,

    /// User-Agent header sent with each request. Nothing is sent when unset.
    #[builder(setter(strip_option))]
    user_agent: Option<String>,
}

impl Default for ClientBuilder {
    #[inline]
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ClientBuilder {
    /// Instantiates a [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - The host or ninja host is not a bare `host[:port]`.
    /// - The cache size is zero.
    /// - Either rate limit is zero or above [`MAX_RATE_LIMIT`].
    /// - The request timeout is shorter than one millisecond.
    /// - The request client cannot be created.
    ///   See [here](https://docs.rs/reqwest/latest/reqwest/struct.ClientBuilder.html#errors).
    pub fn client(self) -> Result<Client> {
        if !is_valid_host(&self.host) {
            return Err(ErrorKind::InvalidHost(self.host));
        }
        if !is_valid_host(&self.ninja_host) {
            return Err(ErrorKind::InvalidNinjaHost(self.ninja_host));
        }
        // Validated even when caching is off
        if self.cache_size < 1 {
            return Err(ErrorKind::InvalidCacheSize(self.cache_size));
        }
        let rate_limit = NonZeroU32::new(self.rate_limit)
            .filter(|rate| rate.get() <= MAX_RATE_LIMIT)
            .ok_or(ErrorKind::InvalidRateLimit(self.rate_limit))?;
        let stash_rate_limit = NonZeroU32::new(self.stash_rate_limit)
            .filter(|rate| rate.get() <= MAX_RATE_LIMIT)
            .ok_or(ErrorKind::InvalidStashRateLimit(self.stash_rate_limit))?;
        if self.request_timeout < MIN_REQUEST_TIMEOUT {
            return Err(ErrorKind::InvalidRequestTimeout(self.request_timeout));
        }

        let mut builder = reqwest::ClientBuilder::new()
            .gzip(true)
            .timeout(self.request_timeout);
        if let Some(user_agent) = &self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        let reqwest_client = builder.build().map_err(ErrorKind::BuildRequestClient)?;

        let cache = if self.use_cache {
            Some(Arc::new(ResponseCache::new(self.cache_size)?))
        } else {
            None
        };

        let stash_url = Endpoint::Stashes { change_id: None }.url(&self.host, self.use_ssl)?;

        log::trace!(
            "Built client for {} (cache: {}, limits: {rate_limit}/s standard, {stash_rate_limit}/s stash)",
            self.host,
            if self.use_cache { "on" } else { "off" },
        );

        Ok(Client {
            reqwest_client,
            host: self.host,
            ninja_host: self.ninja_host,
            use_ssl: self.use_ssl,
            stash_url,
            limiter: Arc::new(RateLimiter::new(rate_limit, stash_rate_limit)),
            cache,
        })
    }
}

/// A host must be a bare authority: a hostname or IP address with an optional
/// port, and nothing else.
fn is_valid_host(host: &str) -> bool {
    if host.is_empty() || host.contains(['/', '?', '#', '@']) {
        return false;
    }
    Url::parse(&format!("http://{host}")).is_ok_and(|url| url.host_str().is_some())
}

/// Dispatches API requests: answers from the cache when possible, otherwise
/// waits for rate limit admission, sends the request and classifies the
/// response.
///
/// Cloning is cheap. Clones share the rate limiter and the cache, so a
/// client can be handed to many tasks without loosening the limits.
///
/// See [`ClientBuilder`] which contains sane defaults for all configuration
/// options.
#[derive(Debug, Clone)]
pub struct Client {
    /// HTTP request client, with the request timeout applied.
    reqwest_client: reqwest::Client,

    host: String,
    ninja_host: String,
    use_ssl: bool,

    /// First page of the stash river; any URL with the same origin and path
    /// counts against the restricted rate class.
    stash_url: Url,

    limiter: Arc<RateLimiter>,

    /// Present only when caching is enabled.
    cache: Option<Arc<ResponseCache>>,
}

impl Client {
    /// Fetch `url` and return the response body.
    ///
    /// Cached bodies are returned without touching the rate limiter or the
    /// network. Only successful responses are cached. Nothing is retried;
    /// a [`ErrorKind::RateLimited`] response is returned as is.
    ///
    /// # Errors
    ///
    /// Returns an `Err` if:
    /// - `url` is not a valid URL.
    /// - The request fails below the HTTP layer (connection, timeout,
    ///   redirects). See [`ErrorKind::NetworkRequest`].
    /// - The response status is not `200 OK`. See [`check_status`].
    /// - The response body cannot be read.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        if let Some(cache) = &self.cache
            && let Some(body) = cache.get(url)
        {
            log::debug!("Cache hit for {url}");
            return Ok(body);
        }

        let parsed = Url::parse(url).map_err(|e| ErrorKind::ParseUrl(e, url.to_string()))?;
        let class = self.rate_class(&parsed);
        self.limiter.admit(class).await;

        log::debug!("GET {url} ({class})");
        let response = self
            .reqwest_client
            .get(parsed)
            .send()
            .await
            .map_err(ErrorKind::NetworkRequest)?;

        let status = response.status();
        check_status(status).inspect_err(|e| log::debug!("GET {url} failed: {e}"))?;

        let body = response.text().await.map_err(ErrorKind::ReadResponseBody)?;
        if let Some(cache) = &self.cache {
            cache.put(url.to_string(), body.clone());
        }

        Ok(body)
    }

    /// Fetch the given endpoint from its configured host.
    ///
    /// # Errors
    ///
    /// See [`Client::fetch`].
    pub async fn get(&self, endpoint: &Endpoint) -> Result<String> {
        let url = self.endpoint_url(endpoint)?;
        self.fetch(url.as_str()).await
    }

    /// Full URL of `endpoint` on the configured host and scheme.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured host cannot form a URL. Hosts are
    /// validated when the client is built, so this does not happen in
    /// practice.
    pub fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url> {
        let host = match endpoint.host_kind() {
            HostKind::Api => &self.host,
            HostKind::Ninja => &self.ninja_host,
        };
        endpoint.url(host, self.use_ssl)
    }

    /// The rate class `url` is admitted under.
    ///
    /// Only the public stash tab endpoint of the configured API host is
    /// restricted, whatever its query string.
    #[must_use]
    pub fn rate_class(&self, url: &Url) -> RateClass {
        if url.origin() == self.stash_url.origin() && url.path() == self.stash_url.path() {
            RateClass::Restricted
        } else {
            RateClass::Standard
        }
    }

    /// The response cache, if caching is enabled
    #[must_use]
    pub fn cache(&self) -> Option<&ResponseCache> {
        self.cache.as_deref()
    }

    /// The rate limiter shared by all clones of this client
    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }
}
