//! Extraction of structured records from registry markup
//!
//! This module contains the page parsers:
//! - Listing rows to summary records
//! - Listing navigation to the set of further page numbers
//! - Detail pages to identification attributes and offenses
//!
//! The parsers are pure functions of the markup; all network access lives in
//! the crawler module.

mod detail;
mod listing;
mod pagination;
pub mod rules;
mod text;

pub use detail::{parse_detail, DetailRecord};
pub use listing::parse_listing;
pub use pagination::discover_pages;
