//! Document-level summaries.
//!
//! Clauses are grouped by category and each non-empty category becomes one
//! labelled prose point, after a leading "Document Overview". A trailing
//! "Risk Considerations" point appears whenever indemnification or liability
//! clauses are present. Details quoted in a point (notice periods, amounts,
//! jurisdictions) are deduplicated across the category's clauses.

use clausewise_core::details::{extract_amount, extract_duration, extract_jurisdiction};
use clausewise_core::{ClauseCategory, DocumentSummary, categorize};

pub const OVERVIEW_LABEL: &str = "Document Overview";
pub const RISK_LABEL: &str = "Risk Considerations";

const RISK_TEXT: &str = "This document contains indemnification or liability provisions that \
can expose a party to significant financial obligations. Review these clauses carefully and \
consider seeking legal advice before signing.";

#[derive(Debug, Clone, Copy, Default)]
pub struct Summarizer;

impl Summarizer {
    /// Rendered summary text; see [`DocumentSummary::to_text`].
    pub fn summarize<T: AsRef<str>>(&self, clauses: &[T]) -> String {
        self.summarize_points(clauses).to_text()
    }

    /// Structured summary. Empty input yields an empty summary.
    pub fn summarize_points<T: AsRef<str>>(&self, clauses: &[T]) -> DocumentSummary {
        let mut summary = DocumentSummary::default();
        if clauses.is_empty() {
            return summary;
        }

        let mut groups: Vec<Vec<&str>> = vec![Vec::new(); ClauseCategory::ALL.len()];
        for clause in clauses {
            let text = clause.as_ref();
            for category in categorize(text).iter() {
                groups[category as usize].push(text);
            }
        }

        let covered: Vec<&str> = ClauseCategory::ALL
            .iter()
            .filter(|c| **c != ClauseCategory::Other && !groups[**c as usize].is_empty())
            .map(|c| c.label())
            .collect();
        summary.push(OVERVIEW_LABEL, overview(clauses.len(), &covered));

        for category in ClauseCategory::ALL {
            let texts = &groups[category as usize];
            if !texts.is_empty() {
                summary.push(category.label(), describe(category, texts));
            }
        }

        let risky = [ClauseCategory::Indemnification, ClauseCategory::Liability]
            .iter()
            .any(|c| !groups[*c as usize].is_empty());
        if risky {
            summary.push(RISK_LABEL, RISK_TEXT);
        }

        summary
    }
}

fn overview(count: usize, covered: &[&str]) -> String {
    let lead = format!("This document contains {}.", clauses_phrase(count));
    if covered.is_empty() {
        lead
    } else {
        format!("{lead} Key areas covered: {}.", covered.join(", "))
    }
}

fn describe(category: ClauseCategory, texts: &[&str]) -> String {
    let n = clauses_phrase(texts.len());
    let any = |needle: &str| texts.iter().any(|t| t.to_lowercase().contains(needle));
    let durations = distinct(texts.iter().filter_map(|t| extract_duration(t)));

    match category {
        ClauseCategory::Termination => {
            let mut s = format!("The agreement includes {n} describing how it can be ended.");
            if !durations.is_empty() {
                s.push_str(&format!(" Notice periods mentioned: {}.", durations.join(", ")));
            }
            if any("without notice") {
                s.push_str(" Some terms allow ending the agreement without notice.");
            }
            s
        }
        ClauseCategory::Payment => {
            let amounts = distinct(texts.iter().filter_map(|t| extract_amount(t)));
            let mut s = format!("Payment obligations are set out in {n}.");
            if !amounts.is_empty() {
                s.push_str(&format!(" Amounts mentioned: {}.", amounts.join(", ")));
            }
            s
        }
        ClauseCategory::Confidentiality => {
            let mut s = "Certain information must be kept confidential.".to_string();
            if !durations.is_empty() {
                s.push_str(&format!(
                    " Confidentiality periods mentioned: {}.",
                    durations.join(", ")
                ));
            }
            s
        }
        ClauseCategory::Indemnification => format!(
            "Under {n}, one party agrees to cover the other's losses, damages, or legal costs."
        ),
        ClauseCategory::Liability => {
            if any("limit") {
                format!("Responsibility for losses or damages is limited in {n}.")
            } else {
                format!("Responsibility for losses or damages is allocated in {n}.")
            }
        }
        ClauseCategory::DisputeResolution => {
            if any("arbitration") {
                "Disputes are to be resolved through arbitration rather than in court."
                    .to_string()
            } else {
                "The document describes how disputes between the parties are handled.".to_string()
            }
        }
        ClauseCategory::NonCompete => {
            if durations.is_empty() {
                "Competing with the other party is restricted.".to_string()
            } else {
                format!(
                    "Competing with the other party is restricted for {}.",
                    durations.join(", ")
                )
            }
        }
        ClauseCategory::IntellectualProperty => {
            format!("Ownership of intellectual property is addressed in {n}.")
        }
        ClauseCategory::GoverningLaw => {
            let places = distinct(texts.iter().filter_map(|t| extract_jurisdiction(t)));
            if places.is_empty() {
                "The document specifies which laws apply.".to_string()
            } else {
                format!(
                    "The agreement is governed by the laws of {}.",
                    places.join(" and ")
                )
            }
        }
        ClauseCategory::Amendment => {
            "The document explains how it can be changed or modified.".to_string()
        }
        ClauseCategory::ForceMajeure => {
            "Parties are excused from their obligations when events beyond their control occur."
                .to_string()
        }
        ClauseCategory::Other => {
            let verb = if texts.len() == 1 { "covers" } else { "cover" };
            format!("{n} {verb} general terms outside the categories above.")
        }
    }
}

fn clauses_phrase(n: usize) -> String {
    if n == 1 {
        "1 clause".to_string()
    } else {
        format!("{n} clauses")
    }
}

/// First-seen order, duplicates dropped.
fn distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
