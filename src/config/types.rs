use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure for Sor-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub registry: RegistryConfig,
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
}

/// Registry endpoint and listing form configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    /// Base URL every relative link is resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Path of the listing endpoint, relative to the base URL
    #[serde(rename = "listing-path", default = "default_listing_path")]
    pub listing_path: String,

    /// County selector sent as `cnt`
    pub county: String,

    /// Radius flag sent as `rad`
    #[serde(default = "default_radius")]
    pub radius: String,

    /// Result-size cap sent as `sz`
    #[serde(rename = "result-size", default = "default_result_size")]
    pub result_size: String,

    /// Form mode sent as `form`
    #[serde(rename = "form-mode", default = "default_form_mode")]
    pub form_mode: String,

    /// Sort flag sent as `srt` alongside a page number
    #[serde(default = "default_sort")]
    pub sort: String,
}

impl RegistryConfig {
    /// Returns a copy targeting another county
    pub fn with_county(&self, county: &str) -> Self {
        Self {
            county: county.trim().to_uppercase(),
            ..self.clone()
        }
    }
}

/// Crawl pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Pause after each listing page fetched beyond the first (milliseconds)
    #[serde(rename = "listing-delay-ms", default = "default_listing_delay")]
    pub listing_delay_ms: u64,

    /// Pause after each successful detail page fetch (milliseconds)
    #[serde(rename = "detail-delay-ms", default = "default_detail_delay")]
    pub detail_delay_ms: u64,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            listing_delay_ms: default_listing_delay(),
            detail_delay_ms: default_detail_delay(),
            request_timeout_secs: default_timeout(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Format: CrawlerName/Version (+ContactURL; ContactEmail)
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the dataset file is written to
    #[serde(rename = "dataset-dir")]
    pub dataset_dir: String,

    /// Root directory for downloaded photos, one subdirectory per county
    #[serde(rename = "images-dir")]
    pub images_dir: String,
}

impl OutputConfig {
    /// Path of the dataset file for a county
    pub fn dataset_path(&self, county: &str) -> PathBuf {
        PathBuf::from(&self.dataset_dir)
            .join(format!("{}_county_offenders.json", county.to_lowercase()))
    }

    /// Image directory for a county
    pub fn county_images_dir(&self, county: &str) -> PathBuf {
        PathBuf::from(&self.images_dir).join(county.to_lowercase())
    }
}

fn default_listing_path() -> String {
    "SOR".to_string()
}

fn default_radius() -> String {
    "A".to_string()
}

fn default_result_size() -> String {
    "2814".to_string()
}

fn default_form_mode() -> String {
    "4".to_string()
}

fn default_sort() -> String {
    "1".to_string()
}

fn default_listing_delay() -> u64 {
    1000
}

fn default_detail_delay() -> u64 {
    500
}

fn default_timeout() -> u64 {
    10
}
