//! Output module for persisting and summarising crawl results
//!
//! This module handles:
//! - Writing the JSON dataset consumed by report rendering
//! - Loading a persisted dataset back
//! - Classification statistics and crawl reports

mod dataset;
pub mod stats;

pub use dataset::{load_dataset, DatasetWriter};
pub use stats::{print_crawl_report, print_statistics, ClassificationStatistics};
