//! Detail page parser
//!
//! A detail page is a loose collection of tables. The one whose text carries
//! an offense marker phrase holds the offense history; every other table is
//! mined for two-cell `label: value` rows.

use super::rules::{
    is_blacklisted_label, is_offense_header, is_offense_table, reject_offense,
    IDENTIFICATION_ROW_CELLS, OFFENSE_ROW_CELLS,
};
use super::text::{full_text, table_rows};
use crate::record::{IdentificationAttributes, Offense};
use lazy_static::lazy_static;
use scraper::{Html, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref TABLE: Selector = Selector::parse("table").expect(E);
}

/// Everything extracted from one detail page
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetailRecord {
    pub identification: IdentificationAttributes,
    pub offenses: Vec<Offense>,
}

impl DetailRecord {
    /// The result used when a detail page could not be fetched
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Parses a detail page into identification attributes and offenses
///
/// Missing structure is not an error: a page without an offense table, or an
/// offense table without a recognisable header row, yields no offenses.
pub fn parse_detail(markup: &str) -> DetailRecord {
    let document = Html::parse_document(markup);
    let mut detail = DetailRecord::empty();

    for table in document.select(&TABLE) {
        let rows = table_rows(table);
        if is_offense_table(&full_text(table)) {
            collect_offenses(&rows, &mut detail.offenses);
        } else {
            collect_identification(&rows, &mut detail.identification);
        }
    }

    tracing::debug!(
        "Parsed detail page: {} identification attributes, {} offenses",
        detail.identification.len(),
        detail.offenses.len()
    );
    detail
}

/// Appends the valid, not-yet-seen offense rows following the header row
fn collect_offenses(rows: &[Vec<String>], offenses: &mut Vec<Offense>) {
    let Some(header) = rows.iter().position(|cells| is_offense_header(cells)) else {
        tracing::debug!("Offense table has no header row");
        return;
    };

    for cells in &rows[header + 1..] {
        if cells.len() != OFFENSE_ROW_CELLS {
            continue;
        }

        let offense = Offense::new(
            cells[0].as_str(),
            cells[1].as_str(),
            cells[2].as_str(),
            cells[3].as_str(),
        );

        if let Some(rejection) = reject_offense(&offense) {
            tracing::trace!("Dropping offense row {:?}: {:?}", offense.offense, rejection);
            continue;
        }

        if !offenses.contains(&offense) {
            offenses.push(offense);
        }
    }
}

/// Records `label -> value` pairs from two-cell rows
fn collect_identification(rows: &[Vec<String>], identification: &mut IdentificationAttributes) {
    for cells in rows {
        if cells.len() != IDENTIFICATION_ROW_CELLS {
            continue;
        }

        let label = cells[0].trim_end_matches(':');
        let value = cells[1].as_str();

        if label.is_empty() || value.is_empty() || is_blacklisted_label(label) {
            continue;
        }

        identification.insert(label, value);
    }
}
