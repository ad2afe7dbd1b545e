//! Keyword tables and the ordered rule list for offense classification
//!
//! Every keyword is upper-case; matching is a plain substring test against
//! the upper-cased, space-joined offense descriptions of one entry.

use super::category::Category;

pub const PORNOGRAPHY: &[&str] = &[
    "CHILD PORN",
    "PORNOGRAPHY",
    "SEXUALLY EXPLICIT IMAGES",
    "DEPICTIONS OF MINOR",
    "OBSCENE MATTER",
    "CHILD PORNOGRAPHY",
];

/// Age markers and other signs the victim was a minor
///
/// Short fragments such as "U 16" can match inside unrelated text; that is
/// accepted behavior.
pub const MINOR_INDICATORS: &[&str] = &[
    "U/16",
    "UNDER 16",
    "U/14",
    "UNDER 14",
    "U/18",
    "UNDER 18",
    "MINOR",
    "CHILD",
    "JUVENILE",
    "U 16",
    "U 14",
    "U 18",
    "CHLD",
    "MINOR CHILD",
    "WITH A MINOR",
    "OF A MINOR",
    "CHILD MOLESTATION",
    "RAPE OF A CHILD",
    "RAPE OF CHILD",
    "16/17",
    "AGE 16/17",
    "PERSON UNDER",
    "PERSON U/",
    "INVOLVING A CHILD",
    "INVOLVING MINOR",
];

/// Assault-type keywords that make a minor indicator a child sexual assault
pub const CHILD_ASSAULT: &[&str] = &[
    "LEWD",
    "SEXUAL ABUSE",
    "SEX ABUSE",
    "SEXUAL ASSAULT",
    "SEXUAL BATTERY",
    "MOLESTATION",
    "MOLEST",
    "SODOMY",
    "ORAL COPULATION",
    "INDECENT LIBERTIES",
    "SEXUAL INTERCOURSE",
    "RAPE",
    "LASCIVIOUS",
    "UNLAWFUL SEXUAL",
];

pub const RAPE: &[&str] = &["RAPE"];

pub const SEXUAL_ASSAULT: &[&str] = &[
    "SEXUAL ASSAULT",
    "SEXUAL BATTERY",
    "SEXUAL INTERCOURSE WITHOUT CONSENT",
    "SODOMY",
    "ORAL COPULATION",
];

pub const EXPLOITATION: &[&str] = &[
    "EXPLOITATION",
    "ENTICEMENT",
    "COERCION",
    "COMMUNICATION WITH MINOR",
    "ENTICEMENT OF A MINOR",
];

pub const ASSAULT: &[&str] = &["KIDNAP", "ASSAULT WITH INTENT"];

pub const EXPOSURE: &[&str] = &["INDECENT EXPOSURE", "LEWDNESS"];

pub const OTHER_SEXUAL: &[&str] = &["SEXUAL", "SEX", "LEWD", "LASCIVIOUS"];

/// A keyword predicate over the combined offense text
///
/// Matches when every `require` group has at least one keyword present and
/// no `forbid` keyword is present.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub category: Category,
    pub require: &'static [&'static [&'static str]],
    pub forbid: &'static [&'static str],
}

impl Rule {
    pub fn matches(&self, combined: &str) -> bool {
        self.require
            .iter()
            .all(|group| contains_any(combined, group))
            && !contains_any(combined, self.forbid)
    }
}

/// Rules in priority order; the first match wins
pub const RULES: &[Rule] = &[
    Rule {
        category: Category::ChildPornography,
        require: &[PORNOGRAPHY],
        forbid: &[],
    },
    Rule {
        category: Category::ChildSexualAssault,
        require: &[MINOR_INDICATORS, CHILD_ASSAULT],
        forbid: &[],
    },
    Rule {
        category: Category::Rape,
        require: &[RAPE],
        forbid: MINOR_INDICATORS,
    },
    Rule {
        category: Category::SexualAssault,
        require: &[SEXUAL_ASSAULT],
        forbid: MINOR_INDICATORS,
    },
    Rule {
        category: Category::Exploitation,
        require: &[EXPLOITATION],
        forbid: &[],
    },
    Rule {
        category: Category::Assault,
        require: &[ASSAULT],
        forbid: &[],
    },
    Rule {
        category: Category::Exposure,
        require: &[EXPOSURE],
        forbid: &[],
    },
    Rule {
        category: Category::OtherSexual,
        require: &[OTHER_SEXUAL],
        forbid: &[],
    },
];

/// Category when no rule matches
pub const FALLBACK: Category = Category::Other;

pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(category: Category) -> &'static Rule {
        RULES.iter().find(|r| r.category == category).unwrap()
    }

    #[test]
    fn test_rules_are_in_priority_order() {
        let order: Vec<Category> = RULES.iter().map(|r| r.category).collect();
        assert_eq!(order, Category::ALL[..8].to_vec());
    }

    #[test]
    fn test_keywords_are_uppercase() {
        for list in [
            PORNOGRAPHY,
            MINOR_INDICATORS,
            CHILD_ASSAULT,
            RAPE,
            SEXUAL_ASSAULT,
            EXPLOITATION,
            ASSAULT,
            EXPOSURE,
            OTHER_SEXUAL,
        ] {
            for keyword in list {
                assert_eq!(*keyword, keyword.to_uppercase());
            }
        }
    }

    #[test]
    fn test_child_assault_needs_both_groups() {
        let child_sa = rule(Category::ChildSexualAssault);
        assert!(child_sa.matches("LEWD CONDUCT WITH MINOR"));
        assert!(!child_sa.matches("LEWD CONDUCT"));
        assert!(!child_sa.matches("INJURY TO CHILD"));
    }

    #[test]
    fn test_rape_forbids_minor_indicator() {
        let rape = rule(Category::Rape);
        assert!(rape.matches("RAPE"));
        assert!(!rape.matches("RAPE - VICTIM UNDER 18"));
    }

    #[test]
    fn test_sexual_assault_forbids_minor_indicator() {
        let sa = rule(Category::SexualAssault);
        assert!(sa.matches("SEXUAL BATTERY"));
        assert!(!sa.matches("SEXUAL BATTERY OF A MINOR CHILD 16/17"));
    }

    #[test]
    fn test_substring_match_without_word_boundaries() {
        // "SEX" inside "ESSEX" is accepted
        assert!(rule(Category::OtherSexual).matches("BURGLARY IN ESSEX"));
    }
}
