use crate::config::types::{Config, CrawlFrequency, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig};
use crate::ConfigError;
use chrono::NaiveDate;
use url::Url;

/// Validates the entire configuration
///
/// Global sections must be valid. Invalid `[[site]]` entries are logged and
/// removed, so one bad site does not prevent the others from being crawled.
pub fn validate(config: &mut Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_sites(&mut config.sites)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_concurrent_fetches < 1 || config.max_concurrent_fetches > 32 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_fetches must be between 1 and 32, got {}",
            config.max_concurrent_fetches
        )));
    }

    if config.request_timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_secs must be >= 1, got {}",
            config.request_timeout_secs
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Crawler name doubles as the robots.txt identity token
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.summary_dir.is_empty() {
        return Err(ConfigError::Validation(
            "summary_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Drops invalid site entries, failing only when no valid site remains
fn validate_sites(sites: &mut Vec<SiteConfig>) -> Result<(), ConfigError> {
    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "at least one [[site]] must be configured".to_string(),
        ));
    }

    sites.retain(|site| match validate_site(site) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Skipping site '{}': {}", site.root, e);
            false
        }
    });

    if sites.is_empty() {
        return Err(ConfigError::Validation(
            "no valid [[site]] entries configured".to_string(),
        ));
    }

    Ok(())
}

/// Validates one site entry
fn validate_site(site: &SiteConfig) -> Result<(), ConfigError> {
    validate_root(&site.root)?;

    if let Some(start) = &site.crawl_start {
        parse_crawl_start(start)?;
    }

    if let Some(frequency) = &site.crawl_frequency {
        frequency.parse::<CrawlFrequency>()?;
    }

    Ok(())
}

/// Validates a crawl root: absolute http(s) URL with a host
fn validate_root(root: &str) -> Result<(), ConfigError> {
    let url = Url::parse(root)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid site root '{}': {}", root, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "Site root '{}' must use http or https",
            root
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "Site root '{}' has no host",
            root
        )));
    }

    Ok(())
}

/// Parses a `crawl-start` value
pub(crate) fn parse_crawl_start(value: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        ConfigError::InvalidSchedule(format!("invalid crawl-start '{}': {}", value, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_root() {
        assert!(validate_root("https://example.com/").is_ok());
        assert!(validate_root("http://127.0.0.1:8080").is_ok());

        assert!(validate_root("").is_err());
        assert!(validate_root("example.com").is_err());
        assert!(validate_root("ftp://example.com/").is_err());
        assert!(validate_root("mailto:someone@example.com").is_err());
    }

    #[test]
    fn test_parse_crawl_start() {
        assert_eq!(
            parse_crawl_start("2025-01-06").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 6).unwrap()
        );
        assert!(parse_crawl_start("06/01/2025").is_err());
        assert!(parse_crawl_start("2025-02-30").is_err());
    }

    #[test]
    fn test_crawler_bounds() {
        let mut crawler = CrawlerConfig::default();
        assert!(validate_crawler_config(&crawler).is_ok());

        crawler.max_concurrent_fetches = 0;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_concurrent_fetches = 33;
        assert!(validate_crawler_config(&crawler).is_err());

        crawler.max_concurrent_fetches = 32;
        crawler.request_timeout_secs = 0;
        assert!(validate_crawler_config(&crawler).is_err());
    }

    #[test]
    fn test_crawler_name_charset() {
        let mut ua = UserAgentConfig {
            crawler_name: "fawn-bot".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/bot".to_string(),
        };
        assert!(validate_user_agent_config(&ua).is_ok());

        ua.crawler_name = "fawn bot".to_string();
        assert!(validate_user_agent_config(&ua).is_err());

        ua.crawler_name = String::new();
        assert!(validate_user_agent_config(&ua).is_err());
    }

    fn site(root: &str, start: Option<&str>, frequency: Option<&str>) -> SiteConfig {
        SiteConfig {
            root: root.to_string(),
            respect_robots: true,
            crawl_start: start.map(str::to_string),
            crawl_frequency: frequency.map(str::to_string),
        }
    }

    #[test]
    fn test_sites_required() {
        assert!(validate_sites(&mut Vec::new()).is_err());
    }

    #[test]
    fn test_invalid_sites_are_dropped() {
        let mut sites = vec![
            site("https://good.example/", None, None),
            site("not a url", None, None),
            site("https://dated.example/", Some("soon"), None),
            site("https://weekly.example/", Some("2025-01-06"), Some("hourly")),
            site("https://also-good.example/", Some("2025-01-06"), Some("weekly")),
        ];

        validate_sites(&mut sites).unwrap();

        let roots: Vec<&str> = sites.iter().map(|s| s.root.as_str()).collect();
        assert_eq!(roots, vec!["https://good.example/", "https://also-good.example/"]);
    }

    #[test]
    fn test_all_sites_invalid_is_an_error() {
        let mut sites = vec![site("not a url", None, None), site("ftp://example.com/", None, None)];
        assert!(validate_sites(&mut sites).is_err());
    }
}
