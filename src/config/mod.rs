//! Configuration module for Fawnbot
//!
//! This module handles loading, parsing, and validating the TOML configuration
//! file, and decides which sites are due for a crawl on a given day.
//!
//! # Example
//!
//! ```no_run
//! use fawnbot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("fawnbot.toml")).unwrap();
//! for site in &config.sites {
//!     println!("{} (respect robots: {})", site.root, site.respect_robots);
//! }
//! ```

mod parser;
mod schedule;
mod types;
mod validation;

pub use types::{
    Config, CrawlFrequency, CrawlerConfig, OutputConfig, SiteConfig, UserAgentConfig,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use schedule::{due_sites, is_site_due};
