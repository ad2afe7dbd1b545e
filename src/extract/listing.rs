//! Listing page parser
//!
//! Each entry row of the results table carries its fields in cells tagged by
//! an `id` marker. Fields are looked up by marker, not column position, so a
//! reordered table still parses.

use super::rules::{ListingField, IMAGE_CELL, LISTING_FIELDS, LISTING_TABLE_ID, NAME_CELL};
use super::text::cell_text;
use crate::record::SummaryRecord;
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref TABLE: Selector = Selector::parse(&format!("table#{}", LISTING_TABLE_ID)).expect(E);
    static ref ROW: Selector = Selector::parse("tr").expect(E);
    static ref TD: Selector = Selector::parse("td").expect(E);
    static ref TH: Selector = Selector::parse("th").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
    static ref IMG: Selector = Selector::parse("img").expect(E);
}

/// Extracts one summary record per entry row of a listing page
///
/// Header rows and rows without a linked name cell are skipped. A page
/// without the results table yields no records.
pub fn parse_listing(markup: &str) -> Vec<SummaryRecord> {
    let document = Html::parse_document(markup);

    let Some(table) = document.select(&TABLE).next() else {
        tracing::warn!("Listing table '{}' not found", LISTING_TABLE_ID);
        return Vec::new();
    };

    let records: Vec<SummaryRecord> = table
        .select(&ROW)
        .enumerate()
        .filter_map(|(index, row)| {
            let record = parse_row(row);
            if record.is_none() {
                tracing::trace!("Skipping listing row {}", index);
            }
            record
        })
        .collect();

    tracing::debug!("Parsed {} listing rows", records.len());
    records
}

/// Parses one row, or `None` if it is not an entry row
fn parse_row(row: ElementRef<'_>) -> Option<SummaryRecord> {
    if row.select(&TH).next().is_some() {
        return None;
    }

    let name_cell = marked_cell(row, NAME_CELL, 0)?;
    let name_link = name_cell.select(&A).next()?;

    let mut record = SummaryRecord {
        name: cell_text(name_link),
        detail_url: attr(name_link, "href"),
        thumbnail_url: marked_cell(row, IMAGE_CELL, 0)
            .and_then(|cell| cell.select(&IMG).next())
            .map(|img| attr(img, "src"))
            .unwrap_or_default(),
        ..Default::default()
    };

    for &(field, marker, occurrence) in LISTING_FIELDS {
        let value = marked_cell(row, marker, occurrence)
            .map(cell_text)
            .unwrap_or_default();
        match field {
            ListingField::Kno => record.kno = value,
            ListingField::Address => record.address = value,
            ListingField::City => record.city = value,
            ListingField::County => record.county = value,
            ListingField::Zip => record.zip = value,
            ListingField::Status => record.status = value,
        }
    }

    Some(record)
}

/// The `occurrence`-th cell in the row whose `id` is `marker`
fn marked_cell<'a>(row: ElementRef<'a>, marker: &str, occurrence: usize) -> Option<ElementRef<'a>> {
    row.select(&TD)
        .filter(|cell| cell.value().id() == Some(marker))
        .nth(occurrence)
}

fn attr(element: ElementRef<'_>, name: &str) -> String {
    element
        .value()
        .attr(name)
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}
