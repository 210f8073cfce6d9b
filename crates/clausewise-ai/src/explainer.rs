//! Plain-English explanations of individual clauses.
//!
//! Explanations are built from templated sentences, one per indicator found
//! in the clause (termination, confidentiality, waiver, ...), with concrete
//! details such as notice periods or amounts filled in where the clause
//! states them. A clause with no indicator is restated with its jargon
//! simplified. Every path produces at least one sentence.

use clausewise_core::config::ExplainerConfig;
use clausewise_core::details::{extract_amount, extract_duration, extract_jurisdiction};
use clausewise_core::{ClauseCategory, ClauseMarker, LegalContext, categorize, markers};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::plain::simplify;

/// Closing sentence when nothing more specific can be said.
pub const CATCH_ALL: &str = "This clause contains legal language. For a precise understanding, \
consider consulting with a legal professional.";

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+\s+").expect("valid sentence regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Indicator {
    Category(ClauseCategory),
    Marker(ClauseMarker),
}

/// Order in which indicator sentences appear in an explanation.
const INDICATOR_ORDER: [Indicator; 14] = [
    Indicator::Category(ClauseCategory::Termination),
    Indicator::Category(ClauseCategory::Confidentiality),
    Indicator::Category(ClauseCategory::Indemnification),
    Indicator::Category(ClauseCategory::Payment),
    Indicator::Category(ClauseCategory::DisputeResolution),
    Indicator::Category(ClauseCategory::Liability),
    Indicator::Marker(ClauseMarker::Waiver),
    Indicator::Category(ClauseCategory::NonCompete),
    Indicator::Category(ClauseCategory::IntellectualProperty),
    Indicator::Category(ClauseCategory::GoverningLaw),
    Indicator::Category(ClauseCategory::Amendment),
    Indicator::Category(ClauseCategory::ForceMajeure),
    Indicator::Marker(ClauseMarker::Severability),
    Indicator::Marker(ClauseMarker::EntireAgreement),
];

/// Rule-based clause explainer.
#[derive(Debug, Clone, Default)]
pub struct Explainer {
    config: ExplainerConfig,
}

impl Explainer {
    pub fn new(config: ExplainerConfig) -> Self {
        Self { config }
    }

    /// Explain one clause. Never empty, never fails.
    ///
    /// `context` is accepted for parity with the generative explainer; the
    /// rule templates do not depend on it.
    pub fn explain(&self, clause_text: &str, _context: Option<&LegalContext>) -> String {
        let mut sentences = indicator_sentences(clause_text);
        if sentences.is_empty() {
            sentences = self.restate(clause_text);
        }
        if sentences.is_empty() {
            sentences.push(CATCH_ALL.to_string());
        }
        sentences.join(" ")
    }

    /// Restatement for a clause no indicator matched.
    fn restate(&self, clause_text: &str) -> Vec<String> {
        let text = clause_text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        if text.chars().count() < self.config.short_clause_chars {
            let mut chars = text.chars();
            let head: String = chars.by_ref().take(self.config.preview_chars).collect();
            let ellipsis = if chars.next().is_some() { "..." } else { "" };
            return vec![format!("This clause states: {}{ellipsis}", simplify(&head))];
        }

        SENTENCE_END
            .split(text)
            .map(str::trim)
            .filter(|s| {
                let n = s.chars().count();
                n > self.config.key_point_min_chars && n < self.config.key_point_max_chars
            })
            .take(self.config.max_key_points)
            .map(|s| {
                let s = s.trim_end_matches(['.', '!', '?']);
                format!("Key point: {}.", simplify(s))
            })
            .collect()
    }
}

/// One templated sentence per indicator present, in [`INDICATOR_ORDER`].
fn indicator_sentences(text: &str) -> Vec<String> {
    let categories = categorize(text);
    let found_markers = markers(text);
    let lowered = text.to_lowercase();

    INDICATOR_ORDER
        .iter()
        .filter(|indicator| match indicator {
            Indicator::Category(c) => categories.contains(*c),
            Indicator::Marker(m) => found_markers.contains(m),
        })
        .map(|indicator| match *indicator {
            Indicator::Category(c) => category_sentence(c, text, &lowered),
            Indicator::Marker(m) => marker_sentence(m).to_string(),
        })
        .collect()
}

fn category_sentence(category: ClauseCategory, text: &str, lowered: &str) -> String {
    match category {
        ClauseCategory::Termination => {
            let lead = "This clause explains how the agreement can be ended.";
            if lowered.contains("without notice") {
                format!("{lead} It can be ended without any advance notice.")
            } else if let Some(period) = extract_duration(text) {
                format!("{lead} Advance notice of {period} is required before ending it.")
            } else {
                lead.to_string()
            }
        }
        ClauseCategory::Confidentiality => match extract_duration(text) {
            Some(period) => format!(
                "You must keep certain information private and not share it with others for {period}."
            ),
            None => "You must keep certain information private and not share it with others."
                .to_string(),
        },
        ClauseCategory::Indemnification => "One party agrees to cover the other party's losses, \
             damages, or legal costs arising from certain claims."
            .to_string(),
        ClauseCategory::Payment => match extract_amount(text) {
            Some(amount) => format!("It sets out a payment obligation of {amount}."),
            None => "It describes fees or other payments that must be made.".to_string(),
        },
        ClauseCategory::DisputeResolution => {
            if lowered.contains("arbitration") {
                "Disagreements must be settled through arbitration instead of a court case."
                    .to_string()
            } else {
                "It describes how disagreements between the parties will be handled.".to_string()
            }
        }
        ClauseCategory::Liability => {
            if lowered.contains("limit") {
                "It limits how much one party can be held responsible for losses or damages."
                    .to_string()
            } else {
                "It assigns responsibility for losses or damages between the parties.".to_string()
            }
        }
        ClauseCategory::NonCompete => match extract_duration(text) {
            Some(period) => {
                format!("You cannot work for or start a competing business for {period}.")
            }
            None => "You cannot work for or start a competing business for a period of time."
                .to_string(),
        },
        ClauseCategory::IntellectualProperty => {
            "It addresses who owns inventions, creative work, and other intellectual property."
                .to_string()
        }
        ClauseCategory::GoverningLaw => match extract_jurisdiction(text) {
            Some(place) => format!(
                "Any legal questions about the agreement will be decided under the laws of {place}."
            ),
            None => "It states which jurisdiction's laws apply to the agreement.".to_string(),
        },
        ClauseCategory::Amendment => {
            "It explains how the agreement can be changed after signing.".to_string()
        }
        ClauseCategory::ForceMajeure => "Neither party is responsible for failures caused by \
             events beyond their control, such as natural disasters."
            .to_string(),
        ClauseCategory::Other => String::new(),
    }
}

fn marker_sentence(marker: ClauseMarker) -> &'static str {
    match marker {
        ClauseMarker::Waiver => {
            "By agreeing to this, you may be giving up rights you would otherwise have."
        }
        ClauseMarker::Severability => {
            "If one part of the agreement is found invalid, the rest of it still applies."
        }
        ClauseMarker::EntireAgreement => {
            "This document is the complete agreement and replaces any earlier promises or discussions."
        }
    }
}
