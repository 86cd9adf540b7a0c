use crate::crawler::Fetch;
use crate::url::host::{extract_host, resolve_location, strip_scheme};
use crate::FetchError;

const WWW_PREFIX: &str = "www.";

/// Rewrites a URL's host so its `www.` prefix matches the preferred root
///
/// If exactly one of the two hosts starts with `www.`, the URL's host is
/// replaced by the preferred root's host. When both or neither carry the
/// prefix the URL is returned unchanged, which makes the function idempotent.
///
/// # Examples
///
/// ```
/// use fawnbot::url::normalize_www;
///
/// let root = "https://www.example.com/";
/// assert_eq!(normalize_www("https://example.com/a", root), "https://www.example.com/a");
/// assert_eq!(normalize_www("https://www.example.com/a", root), "https://www.example.com/a");
/// ```
pub fn normalize_www(url: &str, preferred_root: &str) -> String {
    let url_host = extract_host(url);
    let preferred_host = extract_host(preferred_root);

    if url_host.is_empty() {
        return url.to_string();
    }

    let url_www = url_host.starts_with(WWW_PREFIX);
    let preferred_www = preferred_host.starts_with(WWW_PREFIX);
    if url_www == preferred_www {
        return url.to_string();
    }

    // Splice by position so a host that also occurs in the scheme is safe
    let host_start = url.len() - strip_scheme(url).len();
    let host_end = host_start + url_host.len();
    format!("{}{}{}", &url[..host_start], preferred_host, &url[host_end..])
}

/// Detects whether a site forces `www.` or bare-host URLs
///
/// Fetches the root once without following redirects. A 3xx answer whose
/// `Location` points at a different host is adopted as the new root (this
/// captures `example.com -> www.example.com` and the reverse). Any other
/// answer keeps the given root.
///
/// This fetch happens before any robots policy is known and is never delayed.
///
/// # Returns
///
/// * `Ok(String)` - The root to crawl from
/// * `Err(FetchError)` - The probe failed; callers log it and keep the original root
pub async fn detect_www_preference<F: Fetch>(fetcher: &F, root: &str) -> Result<String, FetchError> {
    let page = fetcher.fetch(root).await?;

    if page.is_redirect() {
        if let Some(target) = page
            .location
            .as_deref()
            .and_then(|location| resolve_location(root, location))
        {
            if extract_host(&target) != extract_host(root) {
                tracing::info!("Detected www preference: {} -> {}", root, target);
                return Ok(target);
            }
        }
    }

    Ok(root.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::FetchedPage;
    use std::collections::HashMap;

    struct StaticFetcher {
        pages: HashMap<String, FetchedPage>,
    }

    impl Fetch for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Network {
                    url: url.to_string(),
                    message: "connection refused".to_string(),
                })
        }
    }

    fn redirect(url: &str, location: &str) -> FetchedPage {
        FetchedPage {
            url: url.to_string(),
            status: 301,
            body: String::new(),
            location: Some(location.to_string()),
        }
    }

    #[test]
    fn test_adds_www_when_preferred() {
        assert_eq!(
            normalize_www("https://example.com/page", "https://www.example.com"),
            "https://www.example.com/page"
        );
    }

    #[test]
    fn test_strips_www_when_not_preferred() {
        assert_eq!(
            normalize_www("https://www.example.com/page", "https://example.com/"),
            "https://example.com/page"
        );
    }

    #[test]
    fn test_noop_when_both_or_neither() {
        assert_eq!(
            normalize_www("https://example.com/a", "https://example.com/"),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_www("https://www.example.com/a", "https://www.example.com/"),
            "https://www.example.com/a"
        );
    }

    #[test]
    fn test_splices_host_not_scheme() {
        assert_eq!(
            normalize_www("http://h/x", "http://www.h/"),
            "http://www.h/x"
        );
    }

    #[test]
    fn test_idempotent() {
        let roots = ["https://example.com/", "https://www.example.com", "", "/x"];
        let urls = [
            "https://example.com/a",
            "https://www.example.com/b?q=1",
            "http://www.other.org",
            "relative/path",
            "",
            "https://",
        ];

        for root in roots {
            for url in urls {
                let once = normalize_www(url, root);
                assert_eq!(normalize_www(&once, root), once, "url={url} root={root}");
            }
        }
    }

    #[tokio::test]
    async fn test_detect_adopts_cross_host_redirect() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://example.com/".to_string(),
            redirect("https://example.com/", "https://www.example.com/"),
        );
        let fetcher = StaticFetcher { pages };

        let root = detect_www_preference(&fetcher, "https://example.com/")
            .await
            .unwrap();
        assert_eq!(root, "https://www.example.com/");
    }

    #[tokio::test]
    async fn test_detect_ignores_same_host_redirect() {
        let mut pages = HashMap::new();
        pages.insert(
            "https://example.com/".to_string(),
            redirect("https://example.com/", "/home"),
        );
        let fetcher = StaticFetcher { pages };

        let root = detect_www_preference(&fetcher, "https://example.com/")
            .await
            .unwrap();
        assert_eq!(root, "https://example.com/");
    }

    #[tokio::test]
    async fn test_detect_reports_fetch_failure() {
        let fetcher = StaticFetcher {
            pages: HashMap::new(),
        };

        let result = detect_www_preference(&fetcher, "https://example.com/").await;
        assert!(matches!(result, Err(FetchError::Network { .. })));
    }
}
