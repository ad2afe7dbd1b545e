//! Classification statistics over a set of records
//!
//! This module provides functionality for summarising a dataset by offense
//! category and displaying the summary along with a crawl report.

use crate::classify::Category;
use crate::crawler::{CrawlReport, CrawlStage};
use crate::record::Record;
use std::collections::HashMap;

/// Dataset statistics summary
#[derive(Debug, Clone, Default)]
pub struct ClassificationStatistics {
    /// Total number of records
    pub total_records: usize,

    /// Count of records by category
    pub by_category: HashMap<Category, usize>,

    /// Records with a downloaded photo
    pub with_images: usize,

    /// Records with at least one offense
    pub with_offenses: usize,
}

impl ClassificationStatistics {
    /// Classifies every record and tallies the results
    pub fn from_records(records: &[Record]) -> Self {
        let mut stats = Self {
            total_records: records.len(),
            ..Default::default()
        };

        for record in records {
            *stats.by_category.entry(record.classification()).or_insert(0) += 1;
            if record.has_image() {
                stats.with_images += 1;
            }
            if !record.offenses.is_empty() {
                stats.with_offenses += 1;
            }
        }

        stats
    }

    pub fn count(&self, category: Category) -> usize {
        self.by_category.get(&category).copied().unwrap_or(0)
    }

    /// Categories by count descending, ties in rule order
    pub fn sorted(&self) -> Vec<(Category, usize)> {
        let mut counts: Vec<(Category, usize)> =
            self.by_category.iter().map(|(c, n)| (*c, *n)).collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}

/// Prints classification statistics to stdout in a formatted manner
pub fn print_statistics(stats: &ClassificationStatistics) {
    println!("=== Offense Classifications ===\n");

    println!("Overview:");
    println!("  Total records: {}", stats.total_records);
    println!("  With photo: {}", stats.with_images);
    println!("  With offenses: {}", stats.with_offenses);
    println!();

    println!("Records by Category:");
    for (category, count) in stats.sorted() {
        let percentage = if stats.total_records > 0 {
            (count as f64 / stats.total_records as f64) * 100.0
        } else {
            0.0
        };
        println!("  {}: {} ({:.1}%)", category, count, percentage);
    }
    println!();
}

/// Prints a crawl report to stdout
pub fn print_crawl_report(report: &CrawlReport) {
    println!("=== Crawl Report: {} County ===\n", report.county);

    println!("  Started: {}", report.started_at.to_rfc3339());
    println!("  Finished: {}", report.finished_at.to_rfc3339());
    println!("  Duration: {}s", report.duration_seconds());
    println!(
        "  Listing pages: {} fetched ({} discovered beyond page 1)",
        report.pages_fetched, report.pages_discovered
    );
    println!("  Detail pages: {}", report.detail_pages_fetched);
    println!("  Records: {}", report.records);
    println!("  Images saved: {}", report.images_saved);
    println!("  Time paced: {}ms", report.time_paced.as_millis());
    println!();

    if !report.failures.is_empty() {
        println!("Failures ({}):", report.failures.len());
        for stage in [CrawlStage::Listing, CrawlStage::Detail, CrawlStage::Image] {
            let count = report.failures_in(stage);
            if count > 0 {
                println!("  {}: {}", stage, count);
            }
        }
        println!();
    }
}
