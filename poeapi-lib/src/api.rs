use async_trait::async_trait;
use url::Url;

use crate::{Client, Endpoint, Result};

/// Capabilities of a Path of Exile API client.
///
/// [`Client`] is the implementation that talks to the network. Code that
/// consumes API responses can depend on this trait instead and swap in a
/// double for testing.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch `url` and return the raw response body
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Full URL of `endpoint`
    fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url>;

    /// Fetch `endpoint` and return the raw response body
    async fn get(&self, endpoint: &Endpoint) -> Result<String> {
        let url = self.endpoint_url(endpoint)?;
        self.fetch(url.as_str()).await
    }
}

#[async_trait]
impl ApiClient for Client {
    async fn fetch(&self, url: &str) -> Result<String> {
        Client::fetch(self, url).await
    }

    fn endpoint_url(&self, endpoint: &Endpoint) -> Result<Url> {
        Client::endpoint_url(self, endpoint)
    }
}
