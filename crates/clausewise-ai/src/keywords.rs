//! Tiered risk keyword matching.
//!
//! Matching is case-insensitive substring containment, so "terminate" also
//! hits "terminated" and "term" hits "termination".

use clausewise_core::RiskLevel;
use clausewise_core::config::KeywordTiers;

/// Keyword lists with lower-cased copies kept for matching.
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    tiers: KeywordTiers,
    lowered: [Vec<String>; 3],
}

/// Keywords found in one clause, grouped by tier, each in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TierMatches {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

impl KeywordMatcher {
    pub fn new(tiers: KeywordTiers) -> Self {
        let lower = |words: &[String]| words.iter().map(|w| w.to_lowercase()).collect();
        let lowered = [lower(&tiers.low), lower(&tiers.medium), lower(&tiers.high)];
        Self { tiers, lowered }
    }

    pub fn tiers(&self) -> &KeywordTiers {
        &self.tiers
    }

    pub fn find(&self, text: &str) -> TierMatches {
        let text = text.to_lowercase();
        let hits = |level: RiskLevel, original: &[String]| -> Vec<String> {
            self.lowered[level.index()]
                .iter()
                .zip(original)
                .filter(|(kw, _)| !kw.is_empty() && text.contains(kw.as_str()))
                .map(|(_, kw)| kw.clone())
                .collect()
        };
        TierMatches {
            high: hits(RiskLevel::High, &self.tiers.high),
            medium: hits(RiskLevel::Medium, &self.tiers.medium),
            low: hits(RiskLevel::Low, &self.tiers.low),
        }
    }
}

impl Default for KeywordMatcher {
    fn default() -> Self {
        Self::new(KeywordTiers::default())
    }
}

impl TierMatches {
    /// Highest tier with at least one hit; `Low` when nothing matched.
    pub fn risk(&self) -> RiskLevel {
        if !self.high.is_empty() {
            RiskLevel::High
        } else if !self.medium.is_empty() {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn for_level(&self, level: RiskLevel) -> &[String] {
        match level {
            RiskLevel::High => &self.high,
            RiskLevel::Medium => &self.medium,
            RiskLevel::Low => &self.low,
        }
    }

    /// All hits, high tier first, then medium, then low.
    pub fn flatten(&self) -> Vec<String> {
        self.high
            .iter()
            .chain(&self.medium)
            .chain(&self.low)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nothing_matched_is_low() {
        let matches = KeywordMatcher::default().find("The sky is blue.");
        assert_eq!(matches, TierMatches::default());
        assert_eq!(matches.risk(), RiskLevel::Low);
    }

    #[test]
    fn substring_and_case_insensitive() {
        let matches = KeywordMatcher::default().find("Either party may TERMINATE early.");
        assert_eq!(matches.medium, vec!["terminate"]);
        // "terminate" contains "term".
        assert_eq!(matches.low, vec!["term"]);
        assert_eq!(matches.risk(), RiskLevel::Medium);
    }

    #[test]
    fn flatten_follows_tier_then_list_order() {
        let text = "The termination without notice clause imposes a penalty; \
                    payment is non-refundable.";
        let matches = KeywordMatcher::default().find(text);
        assert_eq!(
            matches.flatten(),
            vec![
                "termination without notice",
                "penalty",
                "non-refundable",
                "termination",
                "notice",
                "payment",
                "term",
            ]
        );
        assert_eq!(matches.risk(), RiskLevel::High);
    }

    #[test]
    fn custom_tiers_keep_original_spelling() {
        let matcher = KeywordMatcher::new(KeywordTiers {
            high: vec!["Class Action".into()],
            medium: vec![],
            low: vec![],
        });
        let matches = matcher.find("no class action suits");
        assert_eq!(matches.high, vec!["Class Action"]);
    }

    #[test]
    fn empty_keyword_never_matches() {
        let matcher = KeywordMatcher::new(KeywordTiers {
            high: vec![String::new()],
            medium: vec![],
            low: vec![],
        });
        assert_eq!(matcher.find("anything").risk(), RiskLevel::Low);
    }
}
