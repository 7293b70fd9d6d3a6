//! Proxied HTTP client for listing-site search pages.

mod proxy;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::{Certificate, Client, Proxy};

use nycrental_core::AppConfig;

use crate::error::FetchError;
use crate::retry::retry_fixed_delay;

pub use proxy::proxy_url;

/// Upper bound on redirects followed for a single search URL.
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL reached after following redirects.
    pub final_url: String,
    pub body: Vec<u8>,
}

/// Source of listing pages for the pipeline.
///
/// [`ProxiedFetcher`] is the production implementation; tests substitute
/// in-memory stubs.
pub trait ListingFetcher {
    /// Fetches `url`, following redirects. Retry policy is the implementor's.
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Everything needed to build a [`ProxiedFetcher`].
#[derive(Clone)]
pub struct FetcherConfig {
    /// `host:port` of the forward proxy, optionally with an `http://` scheme.
    pub proxy_host: String,
    pub proxy_username: String,
    pub proxy_password: String,
    /// PEM-encoded trust anchor; replaces the built-in root store.
    pub trust_anchor_pem: Vec<u8>,
    pub user_agent: String,
    pub request_timeout: Duration,
    /// Additional attempts after the first on a transient failure.
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl FetcherConfig {
    /// Builds fetcher settings from application config, reading the trust
    /// anchor from `proxy_cert_path`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::TrustAnchor`] if the certificate file cannot be read.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, FetchError> {
        Ok(Self {
            proxy_host: config.proxy_host.clone(),
            proxy_username: config.proxy_username.clone(),
            proxy_password: config.proxy_password.clone(),
            trust_anchor_pem: read_trust_anchor(&config.proxy_cert_path)?,
            user_agent: config.user_agent.clone(),
            request_timeout: Duration::from_secs(config.request_timeout_secs),
            max_retries: config.max_retries,
            retry_delay: Duration::from_secs(config.retry_delay_secs),
        })
    }
}

impl std::fmt::Debug for FetcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetcherConfig")
            .field("proxy_host", &self.proxy_host)
            .field("proxy_username", &"[redacted]")
            .field("proxy_password", &"[redacted]")
            .field("trust_anchor_pem_len", &self.trust_anchor_pem.len())
            .field("user_agent", &self.user_agent)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .finish()
    }
}

fn read_trust_anchor(path: &Path) -> Result<Vec<u8>, FetchError> {
    std::fs::read(path).map_err(|source| FetchError::TrustAnchor {
        path: path.display().to_string(),
        source,
    })
}

/// Fetches listing pages through an authenticated forward proxy.
///
/// Every request is routed through the proxy with credentials embedded in the
/// proxy authority, and TLS is verified only against the configured trust
/// anchor. One pooled `reqwest::Client` is shared by all concurrent fetches.
///
/// Transient failures (timeout, transport, body read, non-2xx) are retried
/// up to `max_retries` additional times with a fixed `retry_delay` between
/// attempts.
pub struct ProxiedFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl ProxiedFetcher {
    /// Creates a `ProxiedFetcher` bound to the configured proxy and trust anchor.
    ///
    /// # Errors
    ///
    /// - [`FetchError::InvalidUrl`] if the proxy host and credentials do not
    ///   form a valid proxy URL.
    /// - [`FetchError::Client`] if the certificate is not valid PEM or the
    ///   `reqwest::Client` cannot be constructed.
    pub fn new(config: &FetcherConfig) -> Result<Self, FetchError> {
        let proxy_url = proxy_url(
            &config.proxy_host,
            &config.proxy_username,
            &config.proxy_password,
        )?;
        let proxy = Proxy::all(proxy_url).map_err(FetchError::Client)?;
        let trust_anchor =
            Certificate::from_pem(&config.trust_anchor_pem).map_err(FetchError::Client)?;

        let client = Client::builder()
            .proxy(proxy)
            .add_root_certificate(trust_anchor)
            .tls_built_in_root_certs(false)
            .timeout(config.request_timeout)
            .connect_timeout(config.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            max_retries: config.max_retries,
            retry_delay: config.retry_delay,
        })
    }

    /// Convenience constructor: [`FetcherConfig::from_app_config`] then [`Self::new`].
    ///
    /// # Errors
    ///
    /// See [`FetcherConfig::from_app_config`] and [`Self::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, FetchError> {
        Self::new(&FetcherConfig::from_app_config(config)?)
    }

    async fn fetch_once(&self, url: reqwest::Url) -> Result<FetchedPage, FetchError> {
        let requested = url.to_string();
        let response = self
            .client
            .get(url)
            .header(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8",
            )
            .header(reqwest::header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&requested, e))?;

        let final_url = response.url().to_string();
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: final_url,
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(&final_url, e))?;

        Ok(FetchedPage {
            final_url,
            body: body.to_vec(),
        })
    }
}

impl ListingFetcher for ProxiedFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

        retry_fixed_delay(self.max_retries, self.retry_delay, || {
            self.fetch_once(parsed.clone())
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
