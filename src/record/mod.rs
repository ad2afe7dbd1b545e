//! Record types produced by the crawl
//!
//! # Components
//!
//! - `SummaryRecord`: one row of a listing page
//! - `Offense`: one row of a detail page's offense table
//! - `IdentificationAttributes`: label/value pairs from the other detail tables
//! - `Record`: the merged entry persisted to the dataset

mod identification;

pub use identification::IdentificationAttributes;

use crate::classify::{classify, Category};
use serde::{Deserialize, Serialize};

/// One entry as it appears on a listing page
///
/// Missing cells are empty strings, never absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    /// The registry's own identifier ("KNO")
    pub kno: String,
    pub address: String,
    pub city: String,
    pub county: String,
    pub zip: String,
    pub status: String,
    /// Thumbnail reference as found in the listing (may be relative)
    #[serde(default)]
    pub thumbnail_url: String,
    /// Detail page reference as found in the listing (may be relative)
    #[serde(default)]
    pub detail_url: String,
}

/// A registration-triggering offense
///
/// Equality is structural over all four fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Offense {
    pub offense: String,
    pub description: String,
    pub date: String,
    pub location: String,
}

impl Offense {
    pub fn new(
        offense: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            offense: offense.into(),
            description: description.into(),
            date: date.into(),
            location: location.into(),
        }
    }
}

/// A fully crawled entry
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(flatten)]
    pub summary: SummaryRecord,

    /// Absolute detail page URL, empty when the listing had no link
    pub profile_url: String,

    /// Absolute full-size photo URL, empty when the listing had no thumbnail
    pub image_url: String,

    /// Where the photo was saved; `None` when the download failed
    pub local_image_path: Option<String>,

    #[serde(default)]
    pub identification: IdentificationAttributes,

    #[serde(default)]
    pub offenses: Vec<Offense>,
}

impl Record {
    /// Category derived from the offense history
    pub fn classification(&self) -> Category {
        classify(&self.offenses)
    }

    pub fn has_image(&self) -> bool {
        self.local_image_path.is_some()
    }
}
