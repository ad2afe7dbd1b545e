//! Integration tests for the crawler
//!
//! These tests use wiremock to stand up a mock registry and run the full
//! crawl cycle end-to-end.

use pretty_assertions::assert_eq;
use sor_crawler::config::{Config, CrawlerConfig, OutputConfig, RegistryConfig, UserAgentConfig};
use sor_crawler::crawler::{run_crawl, Coordinator, CrawlStage};
use sor_crawler::output::load_dataset;
use sor_crawler::{Category, CrawlError, Offense};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

const LISTING_PAGE_1: &str = include_str!("fixtures/listing_page1.html");
const LISTING_PAGE_2: &str = include_str!("fixtures/listing_page2.html");
const DETAIL_FULL: &str = include_str!("fixtures/detail_full.html");
const DETAIL_NO_OFFENSES: &str = include_str!("fixtures/detail_no_offenses.html");

const PHOTO_BYTES: &[u8] = b"\xFF\xD8\xFF\xE0fake-jpeg";

/// Matches listing POSTs that carry no page number
struct FirstListingPage;

impl Match for FirstListingPage {
    fn matches(&self, request: &Request) -> bool {
        !String::from_utf8_lossy(&request.body).contains("page=")
    }
}

/// Creates a test configuration pointed at the mock registry
fn create_test_config(base_url: &str, dir: &Path) -> Config {
    Config {
        registry: RegistryConfig {
            base_url: format!("{}/sor_id/", base_url),
            listing_path: "SOR".to_string(),
            county: "BONNER".to_string(),
            radius: "A".to_string(),
            result_size: "2814".to_string(),
            form_mode: "4".to_string(),
            sort: "1".to_string(),
        },
        crawler: CrawlerConfig {
            listing_delay_ms: 0,
            detail_delay_ms: 0,
            request_timeout_secs: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            dataset_dir: dir.display().to_string(),
            images_dir: dir.join("images").display().to_string(),
        },
    }
}

/// Temp output directory with the county image directory in place
fn output_dir(config_county: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::create_dir_all(dir.path().join("images").join(config_county.to_lowercase())).unwrap();
    dir
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

async fn mount_listing(server: &MockServer, page_2: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .and(body_string_contains("cnt=BONNER"))
        .and(FirstListingPage)
        .respond_with(html(LISTING_PAGE_1))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .and(body_string_contains("page=2"))
        .and(body_string_contains("srt=1"))
        .respond_with(page_2)
        .expect(1)
        .mount(server)
        .await;

    // Page 3 is only linked from page 2's navigation and must never be fetched
    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .and(body_string_contains("page=3"))
        .respond_with(html(LISTING_PAGE_2))
        .expect(0)
        .mount(server)
        .await;
}

async fn mount_detail(server: &MockServer, id: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/sor_id/offender.aspx"))
        .and(query_param("id", id))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_photo(server: &MockServer, kno: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/sor_id/photos/{}.jpg", kno)))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_registry(server: &MockServer) {
    mount_listing(server, html(LISTING_PAGE_2)).await;

    mount_detail(server, "10001", html(DETAIL_FULL)).await;
    mount_detail(server, "10002", html(DETAIL_NO_OFFENSES)).await;
    mount_detail(server, "10003", ResponseTemplate::new(500)).await;
    mount_detail(server, "10004", html(DETAIL_NO_OFFENSES)).await;

    mount_photo(server, "10001", ResponseTemplate::new(200).set_body_bytes(PHOTO_BYTES)).await;
    mount_photo(server, "10002", ResponseTemplate::new(500)).await;
    mount_photo(server, "10004", ResponseTemplate::new(200).set_body_bytes(PHOTO_BYTES)).await;
}

#[tokio::test]
async fn test_full_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_registry(&server).await;

    let dir = output_dir("BONNER");
    let config = create_test_config(&base, dir.path());
    let coordinator = Coordinator::new(&config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    // Listing order, then row order
    let names: Vec<&str> = outcome
        .records
        .iter()
        .map(|r| r.summary.name.as_str())
        .collect();
    assert_eq!(
        names,
        vec!["ADAMS, ALAN", "BAKER, BETH", "CLARK, CARL", "DAVIS, DANA Ñ"]
    );

    let adams = &outcome.records[0];
    assert_eq!(
        adams.profile_url,
        format!("{}/sor_id/offender.aspx?id=10001", base)
    );
    assert_eq!(adams.image_url, format!("{}/sor_id/photos/10001.jpg", base));
    let adams_photo = adams.local_image_path.as_deref().unwrap();
    assert!(adams_photo.ends_with("10001_ADAMS__ALAN.jpg"));
    assert_eq!(std::fs::read(adams_photo).unwrap(), PHOTO_BYTES);
    assert_eq!(adams.identification.get("Height"), Some("5'10\""));
    assert_eq!(
        adams.offenses,
        vec![
            Offense::new(
                "18-1508",
                "LEWD CONDUCT WITH MINOR UNDER 16",
                "03/14/2001",
                "BONNER COUNTY, ID"
            ),
            Offense::new(
                "18-4116",
                "INDECENT EXPOSURE",
                "07/04/2010",
                "KOOTENAI COUNTY, ID"
            ),
        ]
    );
    assert_eq!(adams.classification(), Category::ChildSexualAssault);

    // Photo download failed: record kept, path absent, everything else filled
    let baker = &outcome.records[1];
    assert_eq!(baker.local_image_path, None);
    assert_eq!(baker.image_url, format!("{}/sor_id/photos/10002.jpg", base));
    assert_eq!(baker.summary.kno, "10002");
    assert_eq!(baker.summary.city, "PRIEST RIVER");
    assert_eq!(baker.identification.get("Sex"), Some("F"));

    // Detail fetch failed and no thumbnail: summary-only record
    let clark = &outcome.records[2];
    assert!(clark.identification.is_empty());
    assert!(clark.offenses.is_empty());
    assert_eq!(clark.image_url, "");
    assert_eq!(clark.local_image_path, None);
    assert_eq!(clark.classification(), Category::Unknown);

    let davis = &outcome.records[3];
    assert!(davis
        .local_image_path
        .as_deref()
        .unwrap()
        .ends_with("10004_DAVIS__DANA_Ñ.jpg"));
    assert!(davis.offenses.is_empty());

    let report = &outcome.report;
    assert_eq!(report.pages_discovered, 1);
    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.detail_pages_fetched, 3);
    assert_eq!(report.images_saved, 2);
    assert_eq!(report.records, 4);
    assert_eq!(report.failures_in(CrawlStage::Image), 1);
    assert_eq!(report.failures_in(CrawlStage::Detail), 1);
    assert_eq!(report.failures_in(CrawlStage::Listing), 0);

    // Persisted dataset matches what was crawled
    let dataset_path = dir.path().join("bonner_county_offenders.json");
    assert_eq!(coordinator.dataset_path(), &dataset_path);
    assert_eq!(load_dataset(&dataset_path).unwrap(), outcome.records);
}

#[tokio::test]
async fn test_pacing_after_listing_and_successful_detail_fetches() {
    let server = MockServer::start().await;
    mount_registry(&server).await;

    let dir = output_dir("BONNER");
    let mut config = create_test_config(&server.uri(), dir.path());
    config.crawler.listing_delay_ms = 40;
    config.crawler.detail_delay_ms = 25;

    let started = std::time::Instant::now();
    let outcome = Coordinator::new(&config).unwrap().crawl().await;
    let elapsed = started.elapsed();

    // One listing page beyond the first, three detail pages fetched; the
    // failed detail fetch for CLARK is not followed by a pause
    let expected = Duration::from_millis(40) + Duration::from_millis(25) * 3;
    assert_eq!(outcome.report.failures_in(CrawlStage::Detail), 1);
    assert_eq!(outcome.report.time_paced, expected);
    assert!(elapsed >= expected, "crawl took {:?}, expected at least {:?}", elapsed, expected);
}

#[tokio::test]
async fn test_zero_delays_skip_pacing() {
    let server = MockServer::start().await;
    mount_registry(&server).await;

    let dir = output_dir("BONNER");
    let config = create_test_config(&server.uri(), dir.path());
    let outcome = Coordinator::new(&config).unwrap().crawl().await;

    assert_eq!(outcome.report.time_paced, Duration::ZERO);
}

#[tokio::test]
async fn test_listing_page_failure_is_skipped() {
    let server = MockServer::start().await;
    mount_listing(&server, ResponseTemplate::new(503)).await;
    for id in ["10001", "10002", "10003"] {
        mount_detail(&server, id, html(DETAIL_NO_OFFENSES)).await;
        mount_photo(&server, id, ResponseTemplate::new(404)).await;
    }

    let dir = output_dir("BONNER");
    let config = create_test_config(&server.uri(), dir.path());
    let outcome = Coordinator::new(&config).unwrap().run().await.unwrap();

    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.report.pages_fetched, 1);
    assert_eq!(outcome.report.failures_in(CrawlStage::Listing), 1);
    assert!(outcome.records.iter().all(|r| r.local_image_path.is_none()));
}

#[tokio::test]
async fn test_first_page_failure_writes_empty_dataset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dir = output_dir("BONNER");
    let config = create_test_config(&server.uri(), dir.path());
    let outcome = Coordinator::new(&config).unwrap().run().await.unwrap();

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.report.pages_fetched, 0);
    assert_eq!(outcome.report.failures_in(CrawlStage::Listing), 1);

    let dataset = load_dataset(&dir.path().join("bonner_county_offenders.json")).unwrap();
    assert!(dataset.is_empty());
}

#[tokio::test]
async fn test_unwritable_dataset_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .respond_with(html("<html><body>No results</body></html>"))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");
    let config = create_test_config(&server.uri(), &missing);

    let result = Coordinator::new(&config).unwrap().run().await;
    assert!(matches!(result, Err(CrawlError::Persistence(_))));

    let result = run_crawl(&config).await;
    assert!(matches!(result, Err(CrawlError::Persistence(_))));
}

#[tokio::test]
async fn test_session_cookies_carried_between_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .and(FirstListingPage)
        .respond_with(html(LISTING_PAGE_1).insert_header("set-cookie", "SESSIONID=abc123; Path=/"))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/sor_id/SOR"))
        .and(body_string_contains("page=2"))
        .and(header("cookie", "SESSIONID=abc123"))
        .respond_with(html(LISTING_PAGE_2))
        .expect(1)
        .mount(&server)
        .await;

    let dir = output_dir("BONNER");
    let config = create_test_config(&server.uri(), dir.path());
    let outcome = Coordinator::new(&config).unwrap().crawl().await;

    assert_eq!(outcome.report.pages_fetched, 2);
    assert_eq!(outcome.records.len(), 4);
}
