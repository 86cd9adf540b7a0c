use crate::UrlError;
use url::Url;

/// Same-host filter for one site crawl
///
/// Accepts absolute `http`/`https` URLs whose host (including any port) equals
/// the root's host, or its `www.`-toggled twin. The twin is accepted so that
/// www normalization can fold it onto the root host afterwards.
#[derive(Debug, Clone)]
pub struct HostScope {
    host: String,
    twin: String,
}

impl HostScope {
    /// Compiles the filter for a crawl root
    ///
    /// # Returns
    ///
    /// * `Ok(HostScope)` - The filter for this root
    /// * `Err(UrlError)` - The root is not an absolute http(s) URL with a host
    pub fn new(root: &str) -> Result<Self, UrlError> {
        let parsed = Url::parse(root).map_err(|e| UrlError::Parse(format!("{}: {}", root, e)))?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
        }

        let host = host_key(&parsed).ok_or_else(|| UrlError::MissingHost(root.to_string()))?;

        let twin = match host.strip_prefix("www.") {
            Some(bare) => bare.to_string(),
            None => format!("www.{}", host),
        };

        Ok(Self { host, twin })
    }

    /// The root host this scope was compiled for
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Checks whether a link belongs to the crawled site
    pub fn contains(&self, link: &str) -> bool {
        let Ok(parsed) = Url::parse(link) else {
            return false;
        };

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return false;
        }

        match host_key(&parsed) {
            Some(host) => host == self.host || host == self.twin,
            None => false,
        }
    }
}

/// Lower-cased `host[:port]` of a parsed URL; default ports are omitted
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}
