//! HTTP fetcher implementation
//!
//! This module performs single-page GET requests for the crawler:
//! - Building the HTTP client with the crawler's user agent string
//! - Disabling redirect following so callers see raw 3xx answers
//! - Capturing the `Location` header of redirects
//! - Classifying network and body-read failures

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::FetchError;
use reqwest::{header::LOCATION, redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;

/// Raw outcome of one GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// The requested URL
    pub url: String,

    /// HTTP status code
    pub status: u16,

    /// Response body (may be empty)
    pub body: String,

    /// `Location` header, only captured for 3xx responses
    pub location: Option<String>,
}

impl FetchedPage {
    /// Returns true for 300-399 responses
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status)
    }
}

/// A source of pages
///
/// The crawl engine is generic over this trait so tests can substitute an
/// in-memory site for the network.
pub trait Fetch: Send + Sync + 'static {
    /// Issues one GET for `url` without following redirects
    fn fetch(&self, url: &str) -> impl Future<Output = Result<FetchedPage, FetchError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Crawler settings (request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.user_agent_string())
        .timeout(Duration::from_secs(crawler.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none()) // Callers handle redirects
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetch`] implementation backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler and user agent settings
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, crawler)?,
        })
    }

    /// Wraps an already configured client
    ///
    /// The client must not follow redirects.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status().as_u16();
        let location = if response.status().is_redirection() {
            response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        } else {
            None
        };

        let body = response.text().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            status,
            message: e.to_string(),
        })?;

        Ok(FetchedPage {
            url: url.to_string(),
            status,
            body,
            location,
        })
    }
}

/// Maps a request error onto the fetch error taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        return FetchError::InvalidUrl {
            url: url.to_string(),
            message: error.to_string(),
        };
    }

    let message = if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> (UserAgentConfig, CrawlerConfig) {
        (
            UserAgentConfig {
                crawler_name: "fawnbot".to_string(),
                crawler_version: "1.0".to_string(),
                contact_url: "https://example.com/bot".to_string(),
            },
            CrawlerConfig::default(),
        )
    }

    #[test]
    fn test_build_http_client() {
        let (ua, crawler) = create_test_config();
        assert!(build_http_client(&ua, &crawler).is_ok());
        assert!(HttpFetcher::new(&ua, &crawler).is_ok());
    }

    #[test]
    fn test_is_redirect_bounds() {
        let mut page = FetchedPage {
            url: "https://example.com/".to_string(),
            status: 299,
            body: String::new(),
            location: None,
        };
        assert!(!page.is_redirect());
        page.status = 300;
        assert!(page.is_redirect());
        page.status = 399;
        assert!(page.is_redirect());
        page.status = 400;
        assert!(!page.is_redirect());
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let (ua, crawler) = create_test_config();
        let fetcher = HttpFetcher::new(&ua, &crawler).unwrap();

        // Nothing listens on the discard port
        let err = fetcher.fetch("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(err.status(), 0);
    }

    #[tokio::test]
    async fn test_invalid_url_is_reported() {
        let (ua, crawler) = create_test_config();
        let fetcher = HttpFetcher::new(&ua, &crawler).unwrap();

        let err = fetcher.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
