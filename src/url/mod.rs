//! URL handling module for Fawnbot
//!
//! This module provides the string-level URL utilities the crawl engine relies
//! on: host extraction, root-relative resolution, www-preference normalization
//! and the same-host scope filter.

mod host;
mod scope;
mod www;

// Re-export main functions
pub use host::{extract_host, resolve_location, resolve_relative, robots_url};
pub use scope::HostScope;
pub use www::{detect_www_preference, normalize_www};
