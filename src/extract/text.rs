//! Text helpers shared by the page parsers

use lazy_static::lazy_static;
use scraper::{ElementRef, Selector};

const E: &str = "Invalid selector";
lazy_static! {
    static ref ROW: Selector = Selector::parse("tr").expect(E);
    static ref CELL: Selector = Selector::parse("td, th").expect(E);
}

/// Text of an element with each text node trimmed and the pieces joined
/// without a separator
///
/// Adjacent cells in malformed markup can therefore run together; the
/// offense row checks rely on spotting exactly that.
pub fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Untrimmed text of an element and all its descendants
pub fn full_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Every row of a table (nested tables included) as a list of cell texts
pub fn table_rows(table: ElementRef<'_>) -> Vec<Vec<String>> {
    table
        .select(&ROW)
        .map(|row| row.select(&CELL).map(cell_text).collect())
        .collect()
}
