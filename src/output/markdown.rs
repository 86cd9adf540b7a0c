//! Markdown summary generation
//!
//! Writes one human-readable report per site crawl: aggregate counters
//! followed by the pages worth a closer look.

use crate::output::traits::{ExportSink, OutputResult, SiteReport};
use crate::state::PageRecord;
use crate::url::extract_host;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes `{host}-{date}.md` reports into a directory
pub struct MarkdownExport {
    dir: PathBuf,
}

impl MarkdownExport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the report for `report`
    pub fn report_path(&self, report: &SiteReport<'_>) -> PathBuf {
        self.dir.join(format!(
            "{}-{}.md",
            host_slug(report.root),
            report.crawled_at.format("%Y-%m-%d")
        ))
    }
}

impl ExportSink for MarkdownExport {
    fn export(&self, report: &SiteReport<'_>) -> OutputResult<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.report_path(report);
        write_markdown_summary(report, &path)?;
        tracing::debug!("Wrote summary for {} to {}", report.root, path.display());
        Ok(())
    }
}

/// Writes the markdown summary of `report` to `output_path`
pub fn write_markdown_summary(report: &SiteReport<'_>, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(report);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a site report as markdown
///
/// # Arguments
///
/// * `report` - The finished crawl of one site
///
/// # Returns
///
/// A formatted markdown string
pub fn format_markdown_summary(report: &SiteReport<'_>) -> String {
    let a = report.analysis;
    let mut md = String::new();

    md.push_str(&format!("# Fawnbot Crawl Summary: {}\n\n", report.root));

    md.push_str("## Run Information\n\n");
    md.push_str(&format!("- **Root**: {}\n", report.root));
    md.push_str(&format!("- **Crawled**: {}\n", report.crawled_at.to_rfc3339()));
    md.push_str(&format!("- **Config Hash**: {}\n\n", report.config_hash));

    md.push_str("## Overview\n\n");
    md.push_str("| Metric | Count |\n");
    md.push_str("|--------|-------|\n");
    for (label, count) in [
        ("Total URLs", a.total_urls),
        ("2xx", a.status_2xx),
        ("3xx", a.status_3xx),
        ("4xx", a.status_4xx),
        ("5xx", a.status_5xx),
        ("Fetch failures", a.fetch_failures),
        ("Blocked by robots.txt", a.blocked_by_robots),
        ("Empty titles", a.empty_titles),
        ("Empty descriptions", a.empty_descriptions),
        ("Missing canonicals", a.missing_canonicals),
        ("Noindex", a.noindex),
        ("Orphans", a.orphans),
        ("Non-indexable canonicals", a.non_indexable_canonicals),
    ] {
        md.push_str(&format!("| {} | {} |\n", label, count));
    }
    md.push('\n');

    push_url_section(&mut md, report, "Orphan Pages", |r| r.is_orphan);
    push_url_section(&mut md, report, "Blocked by robots.txt", |r| r.blocked_by_robots);
    push_url_section(&mut md, report, "Error Responses", |r| r.status >= 400);

    let bad_canonicals: Vec<(&String, &PageRecord)> = report
        .result
        .iter()
        .filter(|(_, r)| !r.canonical.is_empty() && !r.is_canonical_indexable)
        .collect();
    if !bad_canonicals.is_empty() {
        md.push_str("## Non-indexable Canonicals\n\n");
        md.push_str("| URL | Canonical |\n");
        md.push_str("|-----|-----------|\n");
        for (url, record) in bad_canonicals {
            md.push_str(&format!("| {} | {} |\n", url, record.canonical));
        }
        md.push('\n');
    }

    md.push_str("---\n\n");
    md.push_str("*Generated by Fawnbot*\n");

    md
}

fn push_url_section(
    md: &mut String,
    report: &SiteReport<'_>,
    heading: &str,
    include: impl Fn(&PageRecord) -> bool,
) {
    let urls: Vec<(&String, &PageRecord)> = report.result.iter().filter(|(_, r)| include(r)).collect();
    if urls.is_empty() {
        return;
    }

    md.push_str(&format!("## {} ({})\n\n", heading, urls.len()));
    for (url, record) in urls {
        md.push_str(&format!("- {} (status {}, depth {})\n", url, record.status, record.depth));
    }
    md.push('\n');
}

/// File-name-safe form of the root's host
fn host_slug(root: &str) -> String {
    let slug: String = extract_host(root)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '-' })
        .collect();
    if slug.is_empty() {
        "site".to_string()
    } else {
        slug
    }
}
