use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, RequestBuilder};
use std::collections::HashSet;
use std::time::Duration;
use url::Url;

use crate::error::{MathHelperError, Result};

/// An HTTP client scoped to the equations API.
///
/// Every request is resolved against the API base URL and must target the
/// base host (or one of the explicitly allowed hosts). Locators returned by
/// the server go through the same check before they are followed.
#[derive(Debug, Clone)]
pub struct SandboxClient {
    client: Client,
    base: Url,
    allowlist: HashSet<String>,
}

impl SandboxClient {
    /// Builds a client for `base_url` with the given request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base = normalise_base(base_url)?;
        let host = base
            .host_str()
            .ok_or_else(|| MathHelperError::Config(format!("API base URL has no host: {base}")))?
            .to_string();

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = ClientBuilder::new()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let mut allowlist = HashSet::new();
        allowlist.insert(host);

        Ok(Self { client, base, allowlist })
    }

    /// Appends an exact hostname to the allowlist.
    pub fn allow_domain(&mut self, domain: &str) {
        self.allowlist.insert(domain.to_ascii_lowercase());
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Validates if a URL is permitted under the current policy.
    pub fn is_allowed(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        self.allowlist
            .iter()
            .any(|allowed| host == allowed || host.ends_with(&format!(".{allowed}")))
    }

    /// Resolves an absolute or base-relative locator to a permitted URL.
    pub fn resolve(&self, locator: &str) -> Result<Url> {
        let url = self.base.join(locator.trim())?;
        if !self.is_allowed(&url) {
            return Err(MathHelperError::SecurityError(format!(
                "Locator outside the equations API: {url}"
            )));
        }
        Ok(url)
    }

    pub fn get(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::POST, url)
    }

    pub fn delete(&self, url: Url) -> Result<RequestBuilder> {
        self.request(Method::DELETE, url)
    }

    pub fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        if !self.is_allowed(&url) {
            return Err(MathHelperError::SecurityError(format!(
                "Network capabilities capped: host not in allowlist for URL {url}"
            )));
        }
        Ok(self.client.request(method, url))
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn normalise_base(base_url: &str) -> Result<Url> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };
    let url = Url::parse(&with_slash)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(MathHelperError::Config(format!(
            "API base URL must be http or https: {url}"
        )));
    }
    Ok(url)
}
