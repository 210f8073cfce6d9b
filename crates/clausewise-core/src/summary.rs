//! Structured document summaries.

use serde::{Deserialize, Serialize};

/// Separator placed between summary points in the rendered text.
pub const POINT_SEPARATOR: &str = "\n\n";

/// Returned verbatim when a document has no clauses.
pub const EMPTY_DOCUMENT_SUMMARY: &str = "No clauses were found in this document, so no summary \
could be produced. Please check that the document contains readable text and try again.";

/// A labelled prose point ("Termination" → "The agreement can be ended...").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPoint {
    pub label: String,
    pub text: String,
}

impl SummaryPoint {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        format!("{}: {}", self.label, self.text)
    }
}

/// Ordered summary points. The first point is always the document overview.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub points: Vec<SummaryPoint>,
}

impl DocumentSummary {
    pub fn push(&mut self, label: impl Into<String>, text: impl Into<String>) {
        self.points.push(SummaryPoint::new(label, text));
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.points.iter().map(|p| p.label.as_str())
    }

    pub fn get(&self, label: &str) -> Option<&SummaryPoint> {
        self.points.iter().find(|p| p.label == label)
    }

    /// Render as one string, points joined by [`POINT_SEPARATOR`].
    ///
    /// An empty summary renders as [`EMPTY_DOCUMENT_SUMMARY`].
    pub fn to_text(&self) -> String {
        if self.points.is_empty() {
            return EMPTY_DOCUMENT_SUMMARY.to_string();
        }
        self.points
            .iter()
            .map(SummaryPoint::render)
            .collect::<Vec<_>>()
            .join(POINT_SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_points_with_blank_lines() {
        let mut summary = DocumentSummary::default();
        summary.push("Document Overview", "This document contains 2 clauses.");
        summary.push("Payment", "Amounts mentioned: $500.");
        assert_eq!(
            summary.to_text(),
            "Document Overview: This document contains 2 clauses.\n\nPayment: Amounts mentioned: $500."
        );
    }

    #[test]
    fn empty_summary_renders_fallback() {
        assert_eq!(DocumentSummary::default().to_text(), EMPTY_DOCUMENT_SUMMARY);
    }

    #[test]
    fn lookup_by_label() {
        let mut summary = DocumentSummary::default();
        summary.push("Liability", "Limits apply.");
        assert_eq!(summary.get("Liability").unwrap().text, "Limits apply.");
        assert!(summary.get("Payment").is_none());
        assert_eq!(summary.labels().collect::<Vec<_>>(), vec!["Liability"]);
    }
}
