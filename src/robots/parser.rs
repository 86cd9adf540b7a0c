//! Robots.txt parser and rule matcher
//!
//! Only prefix semantics are modeled: `Allow`/`Disallow` values are compared as
//! plain path prefixes, and the `*`/`$` wildcard extensions of the standard
//! are not interpreted. This is a known approximation.

use url::Url;

/// Upper bound applied to `Crawl-delay` values (one day)
pub const MAX_CRAWL_DELAY_SECS: u64 = 86_400;

/// Rules declared for one `User-agent` block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserAgentRule {
    /// Agent name as written in the file
    pub name: String,

    /// `Allow` values in file order
    pub allow: Vec<String>,

    /// `Disallow` values in file order
    pub disallow: Vec<String>,
}

impl UserAgentRule {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Whether this block applies to the crawler identified by `agent`
    ///
    /// `agent` must already be lower-cased. A block applies when its name is
    /// `*` or a case-insensitive substring of the crawler's identity token, so
    /// an empty `User-agent:` value applies to every crawler.
    fn applies_to(&self, agent: &str) -> bool {
        self.name == "*" || agent.contains(&self.name.to_lowercase())
    }
}

/// Site-wide robots.txt policy
///
/// Built once per site crawl and never mutated afterwards. The default value
/// is the empty policy, which blocks nothing and imposes no delay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsPolicy {
    /// Agent blocks in file order
    pub agents: Vec<UserAgentRule>,

    /// `Sitemap` URLs, not agent-scoped
    pub sitemaps: Vec<String>,

    /// `Crawl-delay` in whole seconds
    pub crawl_delay_seconds: u64,
}

impl RobotsPolicy {
    /// Parses robots.txt content
    ///
    /// The file is read line by line; blank lines and `#` comments are skipped
    /// and every other line is split on its first `:`. Directive keys are
    /// matched case-insensitively, values are kept verbatim (trimmed).
    ///
    /// * `user-agent` starts a new block, closing the previous one
    /// * `allow` / `disallow` append to the current block (ignored before the first agent)
    /// * `sitemap` appends to the policy-level list
    /// * `crawl-delay` sets the delay, capped at [`MAX_CRAWL_DELAY_SECS`]; malformed
    ///   values keep the previous value
    ///
    /// Unknown keys are ignored. Parsing never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use fawnbot::robots::RobotsPolicy;
    ///
    /// let policy = RobotsPolicy::parse("User-agent: *\nDisallow: /admin\nCrawl-delay: 2");
    /// assert_eq!(policy.crawl_delay_seconds, 2);
    /// assert!(policy.is_blocked("https://example.com/admin/users", "fawnbot"));
    /// ```
    pub fn parse(content: &str) -> Self {
        let mut policy = Self::default();
        let mut current: Option<UserAgentRule> = None;

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if let Some(done) = current.replace(UserAgentRule::new(value)) {
                        policy.agents.push(done);
                    }
                }
                "allow" => {
                    if let Some(rule) = current.as_mut() {
                        rule.allow.push(value.to_string());
                    }
                }
                "disallow" => {
                    if let Some(rule) = current.as_mut() {
                        rule.disallow.push(value.to_string());
                    }
                }
                "sitemap" => policy.sitemaps.push(value.to_string()),
                "crawl-delay" => {
                    if let Ok(delay) = value.parse::<u64>() {
                        policy.crawl_delay_seconds = delay.min(MAX_CRAWL_DELAY_SECS);
                    }
                }
                _ => {}
            }
        }

        if let Some(done) = current {
            policy.agents.push(done);
        }

        policy
    }

    /// Returns true if the policy holds no agent blocks
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Checks whether `url` is blocked for the crawler identified by `agent`
    ///
    /// Agent blocks are visited in file order. Within an applicable block,
    /// `Allow` prefixes are checked first and any match means "not blocked";
    /// otherwise a `Disallow` of exactly `/` or any matching prefix means
    /// "blocked". The first block with a decisive match wins. Matching is done
    /// against the lower-cased path (and query) of the URL; empty rule values
    /// never match.
    pub fn is_blocked(&self, url: &str, agent: &str) -> bool {
        if self.agents.is_empty() {
            return false;
        }

        let target = match_target(url);
        let agent = agent.to_lowercase();

        for rule in self.agents.iter().filter(|rule| rule.applies_to(&agent)) {
            if rule
                .allow
                .iter()
                .any(|prefix| !prefix.is_empty() && target.starts_with(prefix.as_str()))
            {
                return false;
            }

            if rule
                .disallow
                .iter()
                .any(|prefix| prefix == "/" || (!prefix.is_empty() && target.starts_with(prefix.as_str())))
            {
                return true;
            }
        }

        false
    }

    /// The politeness delay this policy asks for
    pub fn crawl_delay(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.crawl_delay_seconds)
    }
}

/// The lower-cased string robots rules are compared against
///
/// Absolute URLs are reduced to path plus query; anything that does not parse
/// is used as given.
fn match_target(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => {
            let mut target = parsed.path().to_string();
            if let Some(query) = parsed.query() {
                target.push('?');
                target.push_str(query);
            }
            target.to_lowercase()
        }
        Err(_) => url.to_lowercase(),
    }
}
