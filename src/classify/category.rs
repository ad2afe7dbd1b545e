//! Offense classification categories
use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed set of labels summarizing an entry's offense history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Pornography / exploitation imagery
    #[serde(rename = "CP")]
    ChildPornography,

    /// Sexual assault with a minor indicator
    #[serde(rename = "CHILD SA")]
    ChildSexualAssault,

    #[serde(rename = "RAPE")]
    Rape,

    /// Sexual assault without a minor indicator
    #[serde(rename = "SA")]
    SexualAssault,

    #[serde(rename = "EXPLOIT")]
    Exploitation,

    #[serde(rename = "ASSAULT")]
    Assault,

    #[serde(rename = "EXPOSURE")]
    Exposure,

    #[serde(rename = "OTHER-SEX")]
    OtherSexual,

    #[serde(rename = "OTHER")]
    Other,

    /// No offenses recorded
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl Category {
    /// Every category in rule priority order
    pub const ALL: [Category; 10] = [
        Category::ChildPornography,
        Category::ChildSexualAssault,
        Category::Rape,
        Category::SexualAssault,
        Category::Exploitation,
        Category::Assault,
        Category::Exposure,
        Category::OtherSexual,
        Category::Other,
        Category::Unknown,
    ];

    /// The label printed on reports
    pub fn label(&self) -> &'static str {
        match self {
            Self::ChildPornography => "CP",
            Self::ChildSexualAssault => "CHILD SA",
            Self::Rape => "RAPE",
            Self::SexualAssault => "SA",
            Self::Exploitation => "EXPLOIT",
            Self::Assault => "ASSAULT",
            Self::Exposure => "EXPOSURE",
            Self::OtherSexual => "OTHER-SEX",
            Self::Other => "OTHER",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parses a report label back into a category
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
