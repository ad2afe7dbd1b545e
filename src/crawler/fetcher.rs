//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the long-lived registry session (cookies, user agent, timeouts)
//! - Listing requests as form-encoded POSTs
//! - Detail and image requests as GETs against the registry base URL
//! - Error classification

use crate::config::{CrawlerConfig, RegistryConfig, UserAgentConfig};
use crate::{ConfigError, CrawlError, FetchError, FetchResult};
use reqwest::{Client, RequestBuilder, Response};
use std::time::Duration;
use url::Url;

/// What to fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchParams {
    /// A listing page; `None` is the unpaginated first page
    Listing { page: Option<u32> },

    /// A detail or image resource, absolute or relative to the base URL
    Url(String),
}

/// The registry session
///
/// One instance is shared by every request of a crawl so cookies and
/// connections carry over between calls.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
    base_url: Url,
    listing_url: Url,
    registry: RegistryConfig,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use sor_crawler::config::UserAgentConfig;
/// use sor_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig {
///     crawler_name: "SorCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

impl PageFetcher {
    pub fn new(
        registry: &RegistryConfig,
        crawler: &CrawlerConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, CrawlError> {
        let base_url = parse_base_url(&registry.base_url)?;
        let listing_url = base_url
            .join(&registry.listing_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing_path: {}", e)))?;

        let client = build_http_client(
            user_agent,
            Duration::from_secs(crawler.request_timeout_secs),
        )?;

        Ok(Self {
            client,
            base_url,
            listing_url,
            registry: registry.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a registry reference against the base URL
    pub fn resolve(&self, reference: &str) -> FetchResult<Url> {
        self.base_url
            .join(reference.trim())
            .map_err(|source| FetchError::InvalidUrl {
                url: reference.to_string(),
                source,
            })
    }

    /// Form fields for a listing request
    pub fn listing_form(&self, page: Option<u32>) -> Vec<(&'static str, String)> {
        let mut form = vec![
            ("cnt", self.registry.county.clone()),
            ("rad", self.registry.radius.clone()),
            ("sz", self.registry.result_size.clone()),
            ("form", self.registry.form_mode.clone()),
        ];
        if let Some(page) = page {
            form.push(("page", page.to_string()));
            form.push(("srt", self.registry.sort.clone()));
        }
        form
    }

    /// Fetches markup
    ///
    /// Any transport failure or non-success status is returned as a
    /// `FetchError`.
    pub async fn fetch(&self, params: &FetchParams) -> FetchResult<String> {
        let (url, request) = match params {
            FetchParams::Listing { page } => {
                tracing::debug!("POST {} (page {:?})", self.listing_url, page);
                (
                    self.listing_url.to_string(),
                    self.client
                        .post(self.listing_url.clone())
                        .form(&self.listing_form(*page)),
                )
            }
            FetchParams::Url(reference) => {
                let url = self.resolve(reference)?;
                tracing::debug!("GET {}", url);
                (url.to_string(), self.client.get(url))
            }
        };

        let response = send(&url, request).await?;
        response
            .text()
            .await
            .map_err(|e| classify_error(&url, e))
    }

    /// Fetches raw bytes from a resource reference
    pub async fn fetch_bytes(&self, reference: &str) -> FetchResult<Vec<u8>> {
        let url = self.resolve(reference)?;
        tracing::debug!("GET {}", url);

        let url_str = url.to_string();
        let response = send(&url_str, self.client.get(url)).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_error(&url_str, e))?;
        Ok(bytes.to_vec())
    }
}

/// Base URL with a trailing slash so relative references join beneath it
fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))
}

async fn send(url: &str, request: RequestBuilder) -> FetchResult<Response> {
    let response = request.send().await.map_err(|e| classify_error(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// Maps a reqwest error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        FetchError::Connect {
            url: url.to_string(),
        }
    } else {
        FetchError::Http {
            url: url.to_string(),
            source: error,
        }
    }
}
