//! Offense classification
//!
//! Maps an entry's free-text offense descriptions to one category using an
//! ordered keyword rule table. The result is derived on demand and never
//! stored on a record.

mod category;
pub mod rules;

pub use category::Category;
pub use rules::{Rule, RULES};

use crate::record::Offense;

/// Classifies an offense history
///
/// All descriptions are upper-cased and joined with spaces; rules are then
/// tried in priority order and the first match wins. An empty history is
/// `Unknown`; a history no rule matches is `Other`.
///
/// # Example
///
/// ```
/// use sor_crawler::{classify, Category, Offense};
///
/// let offenses = vec![Offense::new("18-6101", "RAPE OF CHILD", "", "")];
/// assert_eq!(classify(&offenses), Category::ChildSexualAssault);
/// ```
pub fn classify(offenses: &[Offense]) -> Category {
    if offenses.is_empty() {
        return Category::Unknown;
    }

    let combined = combined_descriptions(offenses);

    RULES
        .iter()
        .find(|rule| rule.matches(&combined))
        .map(|rule| rule.category)
        .unwrap_or(rules::FALLBACK)
}

/// Upper-cased descriptions joined into one search string
fn combined_descriptions(offenses: &[Offense]) -> String {
    offenses
        .iter()
        .map(|o| o.description.to_uppercase())
        .collect::<Vec<_>>()
        .join(" ")
}
