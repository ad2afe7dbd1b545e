//! Markers and predicates used to recognise registry markup
//!
//! The registry pages carry no stable schema for the detail tables, so tables
//! and columns are recognised by the text they contain. Everything the
//! parsers match against lives here so the heuristics can be read and tested
//! apart from the traversal code.

use crate::record::Offense;

// ===== Listing page =====

/// `id` of the listing results table
pub const LISTING_TABLE_ID: &str = "data_tbl";

/// `id` of the name cell; rows without it (or without an anchor inside it)
/// are not entries
pub const NAME_CELL: &str = "nam_field";

/// `id` of the cell holding the thumbnail `<img>`
pub const IMAGE_CELL: &str = "off_img";

/// Listing fields addressed by cell marker rather than column position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingField {
    Kno,
    Address,
    City,
    County,
    Zip,
    Status,
}

/// Cell marker and occurrence index for each listing field
///
/// City and county share a marker; the county is its second occurrence.
pub const LISTING_FIELDS: &[(ListingField, &str, usize)] = &[
    (ListingField::Kno, "kno_field", 0),
    (ListingField::Address, "adr_field", 0),
    (ListingField::City, "cty_field", 0),
    (ListingField::County, "cty_field", 1),
    (ListingField::Zip, "zip_field", 0),
    (ListingField::Status, "stat_field", 0),
];

// ===== Pagination =====

/// Class of the navigation region on the first listing page
pub const PAGINATION_CLASS: &str = "np";

/// Query parameter carrying the page number in navigation links
pub const PAGE_PARAMETER: &str = "page";

// ===== Detail page =====

/// Phrases whose presence in a table's text marks it as the offense table
///
/// Compared case-insensitively.
pub const OFFENSE_TABLE_MARKERS: &[&str] = &["offenses requiring registration"];

/// Column-label predicates a header row must jointly satisfy
///
/// Each entry is one predicate: some cell in the row must contain one of its
/// fragments (lower-cased substring test).
pub const OFFENSE_HEADER_PREDICATES: &[&[&str]] = &[
    &["offense"],
    &["description"],
    &["date"],
    &["place", "conviction"],
];

/// Cells in an offense data row: code, description, date, place
pub const OFFENSE_ROW_CELLS: usize = 4;

/// Longest offense code accepted; longer codes are run-together cells
pub const MAX_OFFENSE_CODE_LEN: usize = 50;

/// Cells in an identification row: label, value
pub const IDENTIFICATION_ROW_CELLS: usize = 2;

/// Offense-table vocabulary that must not leak into identification labels
pub const IDENTIFICATION_LABEL_BLACKLIST: &[&str] = &[
    "offense",
    "description",
    "date",
    "place",
    "conviction",
    "requiring",
    "registration",
];

/// Why a candidate offense row was dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    EmptyCode,
    DescriptionInsideCode,
    CodeTooLong,
}

/// Offense row checks, evaluated in order; the first hit rejects the row
pub const OFFENSE_CHECKS: &[(Rejection, fn(&Offense) -> bool)] = &[
    (Rejection::EmptyCode, code_is_empty),
    (Rejection::DescriptionInsideCode, description_inside_code),
    (Rejection::CodeTooLong, code_too_long),
];

fn code_is_empty(offense: &Offense) -> bool {
    offense.offense.is_empty()
}

/// The description cell's text ran into the code cell
fn description_inside_code(offense: &Offense) -> bool {
    !offense.description.is_empty() && offense.offense.contains(offense.description.as_str())
}

fn code_too_long(offense: &Offense) -> bool {
    offense.offense.chars().count() > MAX_OFFENSE_CODE_LEN
}

pub fn is_offense_table(table_text: &str) -> bool {
    let text = table_text.to_lowercase();
    OFFENSE_TABLE_MARKERS
        .iter()
        .any(|marker| text.contains(marker))
}

/// True when every header predicate is met by at least one cell
pub fn is_offense_header(cells: &[String]) -> bool {
    let lowered: Vec<String> = cells.iter().map(|c| c.to_lowercase()).collect();
    OFFENSE_HEADER_PREDICATES.iter().all(|fragments| {
        lowered
            .iter()
            .any(|cell| fragments.iter().any(|f| cell.contains(f)))
    })
}

/// First check the offense fails, if any
pub fn reject_offense(offense: &Offense) -> Option<Rejection> {
    OFFENSE_CHECKS
        .iter()
        .find(|(_, check)| check(offense))
        .map(|(rejection, _)| *rejection)
}

pub fn is_blacklisted_label(label: &str) -> bool {
    let label = label.to_lowercase();
    IDENTIFICATION_LABEL_BLACKLIST
        .iter()
        .any(|word| label.contains(word))
}
