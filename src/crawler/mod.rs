//! Crawler module for registry fetching and orchestration
//!
//! This module contains the core crawling logic, including:
//! - The shared registry session (listing POSTs, detail and image GETs)
//! - Photo download into the per-county image directory
//! - Overall crawl coordination, pacing and failure containment

mod coordinator;
mod fetcher;
mod images;

pub use coordinator::{
    run_crawl, Accumulator, Coordinator, CrawlFailure, CrawlOutcome, CrawlReport, CrawlStage,
};
pub use fetcher::{build_http_client, FetchParams, PageFetcher};
pub use images::{full_size_image_path, image_file_name, ImageAcquirer, ImageError};

