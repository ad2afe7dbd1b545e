//! Page-number discovery from the listing navigation region

use super::rules::{PAGE_PARAMETER, PAGINATION_CLASS};
use lazy_static::lazy_static;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::BTreeSet;

const E: &str = "Invalid selector";
lazy_static! {
    static ref NAV_REGION: Selector =
        Selector::parse(&format!("div.{}", PAGINATION_CLASS)).expect(E);
    static ref LINK: Selector = Selector::parse("a[href]").expect(E);
    static ref PAGE_NUMBER: Regex =
        Regex::new(&format!(r"{}=(\d+)", PAGE_PARAMETER)).expect("Invalid page regex");
}

/// Extracts the listing pages to fetch after the first one
///
/// Only links inside the first navigation region count. The result is ascending,
/// duplicate-free and never contains page 1. Markup without a navigation
/// region yields an empty list.
///
/// # Example
///
/// ```
/// use sor_crawler::extract::discover_pages;
///
/// let html = r#"<div class="np"><a href="SOR?page=3">3</a><a href="SOR?page=2">2</a></div>"#;
/// assert_eq!(discover_pages(html), vec![2, 3]);
/// ```
pub fn discover_pages(markup: &str) -> Vec<u32> {
    let document = Html::parse_document(markup);
    let Some(region) = document.select(&NAV_REGION).next() else {
        tracing::debug!("No navigation region in listing page");
        return Vec::new();
    };

    let pages: BTreeSet<u32> = region
        .select(&LINK)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(page_number)
        .filter(|&page| page > 1)
        .collect();

    tracing::debug!("Discovered {} additional listing pages", pages.len());
    pages.into_iter().collect()
}

fn page_number(href: &str) -> Option<u32> {
    PAGE_NUMBER
        .captures(href)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
