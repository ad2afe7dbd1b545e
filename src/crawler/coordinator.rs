//! Crawler coordinator - main crawl orchestration logic
//!
//! The crawl is strictly sequential: listing page 1, then every page the
//! first page's navigation names, and for each listing row the photo and the
//! detail page. Every request completes before the next one starts, with
//! fixed pauses after listing and detail fetches.
//!
//! Failures of single pages or entries are recorded in the accumulator and
//! the crawl moves on. Only a failure to persist the dataset is fatal.

use crate::config::Config;
use crate::crawler::fetcher::{FetchParams, PageFetcher};
use crate::crawler::images::ImageAcquirer;
use crate::extract::{discover_pages, parse_detail, parse_listing, DetailRecord};
use crate::output::DatasetWriter;
use crate::record::{Record, SummaryRecord};
use crate::CrawlError;
use chrono::{DateTime, Utc};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Which step of the crawl a failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlStage {
    Listing,
    Detail,
    Image,
}

impl fmt::Display for CrawlStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Listing => "listing",
            Self::Detail => "detail",
            Self::Image => "image",
        };
        f.write_str(name)
    }
}

/// A contained failure: logged, recorded, and skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlFailure {
    pub stage: CrawlStage,
    /// Page number or entry identifier the failure concerns
    pub target: String,
    pub message: String,
}

/// Everything gathered so far in one crawl
///
/// Owned by the coordinator for the duration of a single crawl and handed to
/// each step, which returns it with its contribution added.
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<Record>,
    failures: Vec<CrawlFailure>,
    pages_fetched: usize,
    detail_pages_fetched: usize,
    images_saved: usize,
    time_paced: Duration,
}

impl Accumulator {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn failures(&self) -> &[CrawlFailure] {
        &self.failures
    }

    fn push_record(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Logs a failure and keeps it for the crawl report
    fn record_failure(&mut self, stage: CrawlStage, target: impl Into<String>, error: impl fmt::Display) {
        let failure = CrawlFailure {
            stage,
            target: target.into(),
            message: error.to_string(),
        };
        tracing::warn!(
            "Skipping {} {}: {}",
            failure.stage,
            failure.target,
            failure.message
        );
        self.failures.push(failure);
    }
}

/// Summary of one crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub county: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Listing pages named by page 1's navigation
    pub pages_discovered: usize,
    /// Listing pages fetched successfully, page 1 included
    pub pages_fetched: usize,
    pub detail_pages_fetched: usize,
    pub records: usize,
    pub images_saved: usize,
    /// Total pacing delay slept between requests
    pub time_paced: Duration,
    pub failures: Vec<CrawlFailure>,
}

impl CrawlReport {
    pub fn failures_in(&self, stage: CrawlStage) -> usize {
        self.failures.iter().filter(|f| f.stage == stage).count()
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// Records and report of a finished crawl
#[derive(Debug)]
pub struct CrawlOutcome {
    pub records: Vec<Record>,
    pub report: CrawlReport,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    county: String,
    fetcher: PageFetcher,
    images: ImageAcquirer,
    dataset_path: PathBuf,
    listing_delay: Duration,
    detail_delay: Duration,
}

impl Coordinator {
    /// Creates a coordinator for the configured county
    ///
    /// Builds the registry session. Output directories are expected to exist.
    pub fn new(config: &Config) -> Result<Self, CrawlError> {
        let county = config.registry.county.clone();
        let fetcher = PageFetcher::new(&config.registry, &config.crawler, &config.user_agent)?;

        Ok(Self {
            images: ImageAcquirer::new(config.output.county_images_dir(&county)),
            dataset_path: config.output.dataset_path(&county),
            listing_delay: Duration::from_millis(config.crawler.listing_delay_ms),
            detail_delay: Duration::from_millis(config.crawler.detail_delay_ms),
            county,
            fetcher,
        })
    }

    pub fn dataset_path(&self) -> &PathBuf {
        &self.dataset_path
    }

    /// Crawls and then writes the dataset
    ///
    /// The dataset is written even when every page or entry failed.
    pub async fn run(&self) -> Result<CrawlOutcome, CrawlError> {
        let outcome = self.crawl().await;

        DatasetWriter::new(&self.dataset_path).write(&outcome.records)?;
        tracing::info!(
            "Saved {} records to {}",
            outcome.records.len(),
            self.dataset_path.display()
        );

        Ok(outcome)
    }

    /// Crawls every listing page without persisting anything
    pub async fn crawl(&self) -> CrawlOutcome {
        let started_at = Utc::now();
        tracing::info!("Starting crawl of {} county", self.county);

        let mut acc = Accumulator::default();

        tracing::info!("Fetching page 1...");
        let pages = match self.fetcher.fetch(&FetchParams::Listing { page: None }).await {
            Ok(markup) => {
                acc.pages_fetched += 1;
                acc = self.process_listing(1, &markup, acc).await;
                discover_pages(&markup)
            }
            Err(e) => {
                acc.record_failure(CrawlStage::Listing, "page 1", e);
                Vec::new()
            }
        };
        let pages_discovered = pages.len();

        for page in pages {
            tracing::info!("Fetching page {}...", page);
            match self
                .fetcher
                .fetch(&FetchParams::Listing { page: Some(page) })
                .await
            {
                Ok(markup) => {
                    acc.pages_fetched += 1;
                    pace(self.listing_delay, &mut acc).await;
                    acc = self.process_listing(page, &markup, acc).await;
                }
                Err(e) => acc.record_failure(CrawlStage::Listing, format!("page {}", page), e),
            }
        }

        let report = CrawlReport {
            county: self.county.clone(),
            started_at,
            finished_at: Utc::now(),
            pages_discovered,
            pages_fetched: acc.pages_fetched,
            detail_pages_fetched: acc.detail_pages_fetched,
            records: acc.records.len(),
            images_saved: acc.images_saved,
            time_paced: acc.time_paced,
            failures: acc.failures,
        };

        tracing::info!(
            "Crawl completed: {} records from {} pages in {}s",
            report.records,
            report.pages_fetched,
            report.duration_seconds()
        );

        CrawlOutcome {
            records: acc.records,
            report,
        }
    }

    /// Processes every entry row of one listing page, in row order
    async fn process_listing(&self, page: u32, markup: &str, mut acc: Accumulator) -> Accumulator {
        let summaries = parse_listing(markup);
        tracing::info!("Page {}: {} entries", page, summaries.len());

        for summary in summaries {
            let record = self.process_entry(summary, &mut acc).await;
            tracing::info!("Processed: {}", record.summary.name);
            acc.push_record(record);
        }

        acc
    }

    /// Photo first, then detail page, merged into one record
    async fn process_entry(&self, summary: SummaryRecord, acc: &mut Accumulator) -> Record {
        let (image_url, local_image_path) = self.acquire_image(&summary, acc).await;

        let (profile_url, detail) = if summary.detail_url.is_empty() {
            (String::new(), DetailRecord::empty())
        } else {
            let profile_url = self
                .fetcher
                .resolve(&summary.detail_url)
                .map(|u| u.to_string())
                .unwrap_or_default();
            tracing::info!("Fetching details for {}...", summary.name);
            (profile_url, self.fetch_detail(&summary, acc).await)
        };

        Record {
            summary,
            profile_url,
            image_url,
            local_image_path,
            identification: detail.identification,
            offenses: detail.offenses,
        }
    }

    /// Full-size image URL and, if the download worked, the saved path
    async fn acquire_image(
        &self,
        summary: &SummaryRecord,
        acc: &mut Accumulator,
    ) -> (String, Option<String>) {
        if summary.thumbnail_url.is_empty() {
            return (String::new(), None);
        }

        let image_url = self
            .images
            .full_size_url(&self.fetcher, &summary.thumbnail_url)
            .map(|u| u.to_string())
            .unwrap_or_default();

        let local_path = match self
            .images
            .acquire(&self.fetcher, &summary.thumbnail_url, &summary.name, &summary.kno)
            .await
        {
            Ok(path) => {
                acc.images_saved += 1;
                Some(path.display().to_string())
            }
            Err(e) => {
                acc.record_failure(CrawlStage::Image, entry_label(summary), e);
                None
            }
        };

        (image_url, local_path)
    }

    /// Detail page contents, or nothing if the page could not be fetched
    async fn fetch_detail(&self, summary: &SummaryRecord, acc: &mut Accumulator) -> DetailRecord {
        match self
            .fetcher
            .fetch(&FetchParams::Url(summary.detail_url.clone()))
            .await
        {
            Ok(markup) => {
                acc.detail_pages_fetched += 1;
                let detail = parse_detail(&markup);
                pace(self.detail_delay, acc).await;
                detail
            }
            Err(e) => {
                acc.record_failure(CrawlStage::Detail, entry_label(summary), e);
                DetailRecord::empty()
            }
        }
    }
}

fn entry_label(summary: &SummaryRecord) -> String {
    if summary.kno.is_empty() {
        summary.name.clone()
    } else {
        format!("{} ({})", summary.name, summary.kno)
    }
}

/// Sleeps for one pacing interval and books it
async fn pace(delay: Duration, acc: &mut Accumulator) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
        acc.time_paced += delay;
    }
}

/// Runs the main crawl operation
///
/// # Example
///
/// ```no_run
/// use sor_crawler::config::load_config;
/// use sor_crawler::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("registry.toml"))?;
/// let outcome = run_crawl(&config).await?;
/// println!("{} records", outcome.records.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlOutcome, CrawlError> {
    let coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
