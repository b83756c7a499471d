// # HTTP Address Resolver
//
// This crate discovers the machine's current public IPv4 address by asking
// an external IP-reporting endpoint over HTTP.
//
// ## Response Scraping
//
// The default endpoint answers with a small script body of the shape
//
// ```text
// ipCallback({ip:"203.0.113.5"})
// ```
//
// so the resolver extracts the first `ip:"<value>"` substring rather than
// parsing the body as JSON. The capture is bounded at the first closing
// quote: on a body with several quoted segments it yields only the address
// field, not everything through the last quote. Any body without that
// substring counts as unparseable.
//
// ## Failure Model
//
// Per the `AddressResolver` contract, every failure path (request error,
// unreadable body, no pattern match) logs a diagnostic and yields `None`;
// resolution never raises an error, so the reconciler simply skips the
// cycle and retries on the next firing.

use aliddns_core::AddressResolver;
use regex::Regex;
use std::time::Duration;
use tracing::warn;

/// Default public IP-reporting endpoint.
pub const DEFAULT_LOOKUP_URL: &str = "https://www.taobao.com/help/getip.php";

/// HTTP timeout for the lookup request.
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves the public address by scraping an HTTP IP-reporting endpoint
pub struct HttpAddressResolver {
    /// URL of the reporting endpoint
    url: String,

    /// HTTP client, re-used across cycles
    client: reqwest::Client,

    /// The `ip:"<value>"` extraction pattern
    pattern: Regex,
}

impl HttpAddressResolver {
    /// Create a resolver against a specific reporting endpoint
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
            pattern: Regex::new(r#"ip:"([^"]*)""#).expect("extraction pattern is valid"),
        }
    }

    /// Extract the first `ip:"<value>"` capture from a response body
    fn extract(&self, body: &str) -> Option<String> {
        self.pattern
            .captures(body)
            .map(|captures| captures[1].to_string())
    }
}

impl Default for HttpAddressResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKUP_URL)
    }
}

#[async_trait::async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self) -> Option<String> {
        let response = match self.client.get(&self.url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("public address lookup failed: {}", e);
                return None;
            }
        };

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!("failed to read the address lookup response: {}", e);
                return None;
            }
        };

        match self.extract(&body) {
            Some(address) => Some(address),
            None => {
                warn!("no public address found in the lookup response");
                None
            }
        }
    }
}
