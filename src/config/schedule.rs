use crate::config::types::{CrawlFrequency, SiteConfig};
use crate::config::validation::parse_crawl_start;
use crate::ConfigError;
use chrono::NaiveDate;

/// Checks whether a site is due for a crawl on `today`
///
/// A site without a `crawl-start` is always due. Otherwise it is due when
/// `today` is on or after the start date and the number of whole days
/// elapsed is a multiple of the frequency interval. A start date without a
/// frequency is treated as daily.
///
/// # Arguments
///
/// * `site` - The site configuration
/// * `today` - The calendar day to check
///
/// # Returns
///
/// * `Ok(bool)` - Whether the site should be crawled today
/// * `Err(ConfigError)` - The start date or frequency is malformed
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use fawnbot::config::{is_site_due, SiteConfig};
///
/// let site = SiteConfig {
///     root: "https://example.com/".to_string(),
///     respect_robots: true,
///     crawl_start: Some("2025-01-06".to_string()),
///     crawl_frequency: Some("weekly".to_string()),
/// };
///
/// let monday = NaiveDate::from_ymd_opt(2025, 1, 13).unwrap();
/// assert!(is_site_due(&site, monday).unwrap());
/// ```
pub fn is_site_due(site: &SiteConfig, today: NaiveDate) -> Result<bool, ConfigError> {
    let Some(start) = site.crawl_start.as_deref() else {
        return Ok(true);
    };

    let start = parse_crawl_start(start)?;
    let frequency = match site.crawl_frequency.as_deref() {
        Some(frequency) => frequency.parse::<CrawlFrequency>()?,
        None => CrawlFrequency::Daily,
    };

    let days_passed = (today - start).num_days();
    Ok(days_passed >= 0 && days_passed % frequency.interval_days() == 0)
}

/// Returns the sites due on `today`, in configuration order
///
/// A site whose schedule cannot be evaluated is logged and skipped.
pub fn due_sites(sites: &[SiteConfig], today: NaiveDate) -> Vec<SiteConfig> {
    sites
        .iter()
        .filter(|site| match is_site_due(site, today) {
            Ok(due) => {
                if !due {
                    tracing::debug!("{} is not due on {}", site.root, today);
                }
                due
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", site.root, e);
                false
            }
        })
        .cloned()
        .collect()
}
