use crate::UrlError;
use url::Url;

/// Extracts the host portion of a URL string
///
/// Strips a leading `http://` or `https://` and returns everything up to the
/// first `/`. No validation is performed: a port is kept, and malformed input
/// yields a best-effort (possibly empty) host.
///
/// # Examples
///
/// ```
/// use fawnbot::url::extract_host;
///
/// assert_eq!(extract_host("https://example.com/path"), "example.com");
/// assert_eq!(extract_host("http://127.0.0.1:8080"), "127.0.0.1:8080");
/// assert_eq!(extract_host("/relative"), "");
/// ```
pub fn extract_host(url: &str) -> &str {
    let rest = strip_scheme(url);
    match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    }
}

/// Returns the URL with an `http://` or `https://` prefix removed
pub(crate) fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
        .unwrap_or(url)
}

/// Resolves a root-relative link against the crawl root
///
/// Only links starting with a single `/` are resolved; the root's trailing
/// slash is dropped before concatenation. Everything else, including
/// protocol-relative (`//host/...`) and already-absolute links, is returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use fawnbot::url::resolve_relative;
///
/// assert_eq!(resolve_relative("/about", "https://example.com/"), "https://example.com/about");
/// assert_eq!(resolve_relative("/about", "https://example.com"), "https://example.com/about");
/// assert_eq!(resolve_relative("contact", "https://example.com/"), "contact");
/// ```
pub fn resolve_relative(link: &str, root: &str) -> String {
    if link.starts_with('/') && !link.starts_with("//") {
        let base = root.strip_suffix('/').unwrap_or(root);
        format!("{}{}", base, link)
    } else {
        link.to_string()
    }
}

/// Resolves a redirect `Location` header against the URL that issued it
///
/// Returns `None` for an empty header or one that cannot be joined onto the
/// base URL.
pub fn resolve_location(base: &str, location: &str) -> Option<String> {
    let location = location.trim();
    if location.is_empty() {
        return None;
    }

    match Url::parse(location) {
        Ok(absolute) => Some(absolute.to_string()),
        Err(_) => Url::parse(base)
            .and_then(|base| base.join(location))
            .map(|joined| joined.to_string())
            .ok(),
    }
}

/// Builds the `scheme://host/robots.txt` URL for a crawl root
///
/// # Examples
///
/// ```
/// use fawnbot::url::robots_url;
///
/// let url = robots_url("https://example.com/blog/post").unwrap();
/// assert_eq!(url, "https://example.com/robots.txt");
/// ```
pub fn robots_url(root: &str) -> Result<String, UrlError> {
    let parsed = Url::parse(root).map_err(|e| UrlError::Parse(format!("{}: {}", root, e)))?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(UrlError::InvalidScheme(parsed.scheme().to_string()));
    }

    let host = parsed
        .host_str()
        .ok_or_else(|| UrlError::MissingHost(root.to_string()))?;

    Ok(match parsed.port() {
        Some(port) => format!("{}://{}:{}/robots.txt", parsed.scheme(), host, port),
        None => format!("{}://{}/robots.txt", parsed.scheme(), host),
    })
}
