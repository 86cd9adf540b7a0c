//! Console statistics for stored crawls

use crate::output::sqlite_output::StoredAnalysis;

/// Prints the latest stored analysis of every site to stdout
///
/// # Arguments
///
/// * `analyses` - One entry per site, as returned by `SqliteExport::latest_analyses`
pub fn print_analyses(analyses: &[StoredAnalysis]) {
    println!("=== Crawl Statistics ===\n");

    if analyses.is_empty() {
        println!("No crawls recorded yet.");
        return;
    }

    for stored in analyses {
        let a = &stored.analysis;
        println!("{} (crawled {})", stored.root, stored.crawled_at);
        println!("  Total URLs: {}", a.total_urls);
        println!(
            "  Status: {} 2xx, {} 3xx, {} 4xx, {} 5xx, {} failed",
            a.status_2xx, a.status_3xx, a.status_4xx, a.status_5xx, a.fetch_failures
        );
        println!("  Blocked by robots.txt: {}", a.blocked_by_robots);
        println!("  Empty titles: {}", a.empty_titles);
        println!("  Empty descriptions: {}", a.empty_descriptions);
        println!("  Missing canonicals: {}", a.missing_canonicals);
        println!("  Non-indexable canonicals: {}", a.non_indexable_canonicals);
        println!("  Noindex: {}", a.noindex);
        println!("  Orphans: {}", a.orphans);
        println!(
            "  Success rate: {:.1}%",
            success_rate(a.status_2xx, a.total_urls)
        );
        println!();
    }
}

fn success_rate(ok: usize, total: usize) -> f64 {
    if total > 0 {
        (ok as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
