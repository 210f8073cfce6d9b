//! Keyword taxonomy for "what kind of clause is this".
//!
//! One taxonomy, consumed by both the explainer and the summarizer. Matching
//! is case-insensitive substring containment against the clause text; a
//! clause can fall into several categories, and lands in
//! [`ClauseCategory::Other`] only when no named category matched.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Document-level clause categories, in summary point order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseCategory {
    Termination,
    Payment,
    Confidentiality,
    Indemnification,
    Liability,
    DisputeResolution,
    NonCompete,
    IntellectualProperty,
    GoverningLaw,
    Amendment,
    ForceMajeure,
    Other,
}

impl ClauseCategory {
    /// Every category, in summary point order.
    pub const ALL: [ClauseCategory; 12] = [
        ClauseCategory::Termination,
        ClauseCategory::Payment,
        ClauseCategory::Confidentiality,
        ClauseCategory::Indemnification,
        ClauseCategory::Liability,
        ClauseCategory::DisputeResolution,
        ClauseCategory::NonCompete,
        ClauseCategory::IntellectualProperty,
        ClauseCategory::GoverningLaw,
        ClauseCategory::Amendment,
        ClauseCategory::ForceMajeure,
        ClauseCategory::Other,
    ];

    /// Substrings (lower-case) whose presence puts a clause in this category.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Termination => &["terminat"],
            Self::Payment => &["payment", "fee", "compensation"],
            Self::Confidentiality => &["confidential", "non-disclosure"],
            Self::Indemnification => &["indemn"],
            Self::Liability => &["liability", "liable"],
            Self::DisputeResolution => &["arbitration", "dispute"],
            Self::NonCompete => &[
                "non-compete",
                "noncompete",
                "non compete",
                "not compete",
                "not to compete",
            ],
            Self::IntellectualProperty => {
                &["intellectual property", "copyright", "patent", "trademark"]
            }
            Self::GoverningLaw => &["governing law", "governed by", "jurisdiction"],
            Self::Amendment => &["amend", "modif"],
            Self::ForceMajeure => &["force majeure", "act of god", "acts of god"],
            Self::Other => &[],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Termination => "termination",
            Self::Payment => "payment",
            Self::Confidentiality => "confidentiality",
            Self::Indemnification => "indemnification",
            Self::Liability => "liability",
            Self::DisputeResolution => "dispute_resolution",
            Self::NonCompete => "non_compete",
            Self::IntellectualProperty => "intellectual_property",
            Self::GoverningLaw => "governing_law",
            Self::Amendment => "amendment",
            Self::ForceMajeure => "force_majeure",
            Self::Other => "other",
        }
    }

    /// Human-readable heading.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Termination => "Termination",
            Self::Payment => "Payment",
            Self::Confidentiality => "Confidentiality",
            Self::Indemnification => "Indemnification",
            Self::Liability => "Liability",
            Self::DisputeResolution => "Dispute Resolution",
            Self::NonCompete => "Non-Compete",
            Self::IntellectualProperty => "Intellectual Property",
            Self::GoverningLaw => "Governing Law",
            Self::Amendment => "Amendment",
            Self::ForceMajeure => "Force Majeure",
            Self::Other => "Additional Terms",
        }
    }

    fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    fn matches(&self, lowered: &str) -> bool {
        self.keywords().iter().any(|kw| lowered.contains(kw))
    }
}

impl fmt::Display for ClauseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of categories. Iterates in [`ClauseCategory::ALL`] order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<ClauseCategory>", into = "Vec<ClauseCategory>")]
pub struct CategorySet {
    bits: u16,
}

impl CategorySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: ClauseCategory) {
        self.bits |= category.bit();
    }

    pub fn contains(&self, category: ClauseCategory) -> bool {
        self.bits & category.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn len(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn iter(&self) -> impl Iterator<Item = ClauseCategory> + '_ {
        ClauseCategory::ALL
            .into_iter()
            .filter(move |c| self.contains(*c))
    }
}

impl From<Vec<ClauseCategory>> for CategorySet {
    fn from(categories: Vec<ClauseCategory>) -> Self {
        let mut set = Self::new();
        for c in categories {
            set.insert(c);
        }
        set
    }
}

impl From<CategorySet> for Vec<ClauseCategory> {
    fn from(set: CategorySet) -> Self {
        set.iter().collect()
    }
}

/// Categorize a clause by keyword presence.
///
/// Never empty: a clause with no named match is [`ClauseCategory::Other`].
pub fn categorize(text: &str) -> CategorySet {
    let lowered = text.to_lowercase();
    let mut set = CategorySet::new();
    for category in ClauseCategory::ALL {
        if category.matches(&lowered) {
            set.insert(category);
        }
    }
    if set.is_empty() {
        set.insert(ClauseCategory::Other);
    }
    set
}

/// Clause features worth explaining that are not document categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClauseMarker {
    Waiver,
    Severability,
    EntireAgreement,
}

impl ClauseMarker {
    pub const ALL: [ClauseMarker; 3] = [
        ClauseMarker::Waiver,
        ClauseMarker::Severability,
        ClauseMarker::EntireAgreement,
    ];

    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Self::Waiver => &["waive"],
            Self::Severability => &["severab"],
            Self::EntireAgreement => &["entire agreement", "entire understanding"],
        }
    }
}

/// Markers present in a clause, in [`ClauseMarker::ALL`] order.
pub fn markers(text: &str) -> Vec<ClauseMarker> {
    let lowered = text.to_lowercase();
    ClauseMarker::ALL
        .into_iter()
        .filter(|m| m.keywords().iter().any(|kw| lowered.contains(kw)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn termination_and_payment_together() {
        let set = categorize("Upon termination, all unpaid fees become due.");
        assert!(set.contains(ClauseCategory::Termination));
        assert!(set.contains(ClauseCategory::Payment));
        assert!(!set.contains(ClauseCategory::Other));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn case_insensitive() {
        let set = categorize("GOVERNED BY THE LAWS OF DELAWARE");
        assert!(set.contains(ClauseCategory::GoverningLaw));
    }

    #[test]
    fn other_only_when_nothing_matched() {
        let set = categorize("The parties met on a Tuesday.");
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![ClauseCategory::Other]);
    }

    #[test]
    fn empty_text_is_other() {
        assert!(categorize("").contains(ClauseCategory::Other));
    }

    #[test]
    fn stem_matches_inflections() {
        assert!(categorize("Either party may terminate.").contains(ClauseCategory::Termination));
        assert!(categorize("You shall indemnify us.").contains(ClauseCategory::Indemnification));
        assert!(categorize("This may be modified.").contains(ClauseCategory::Amendment));
    }

    #[test]
    fn not_to_compete_is_non_compete() {
        let set =
            categorize("You agree not to compete with the company for 1 year after termination.");
        assert!(set.contains(ClauseCategory::NonCompete));
        assert!(set.contains(ClauseCategory::Termination));
        assert!(!categorize("A competent court decides.").contains(ClauseCategory::NonCompete));
    }

    #[test]
    fn iteration_follows_summary_order() {
        let set = categorize("Force majeure excuses payment. Termination follows.");
        let order: Vec<_> = set.iter().collect();
        assert_eq!(
            order,
            vec![
                ClauseCategory::Termination,
                ClauseCategory::Payment,
                ClauseCategory::ForceMajeure
            ]
        );
    }

    #[test]
    fn category_set_json_is_a_list() {
        let set = categorize("Confidential information and intellectual property.");
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["confidentiality","intellectual_property"]"#);
        let parsed: CategorySet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, set);
    }

    #[test]
    fn markers_detected_in_order() {
        let found = markers("This is the entire agreement. No waiver is valid. Severability applies.");
        assert_eq!(
            found,
            vec![
                ClauseMarker::Waiver,
                ClauseMarker::Severability,
                ClauseMarker::EntireAgreement
            ]
        );
        assert!(markers("Payment is due.").is_empty());
    }
}
