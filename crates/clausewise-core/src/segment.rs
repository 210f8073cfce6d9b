//! Clause segmentation of raw extracted document text.
//!
//! Four structural patterns are scanned in a fixed order, each over the full
//! text:
//!
//! 1. Numbered sections: `1. TERM.`
//! 2. Section headers: `Section 1. Term.`
//! 3. Lettered items: `(a) The supplier shall deliver.`
//! 4. Article headers: `ARTICLE IV. DEFINITIONS.`
//!
//! Every match becomes a clause, extended with a raw-character window of the
//! text that follows it. Matches are not deduplicated across patterns, so a
//! span hit by two patterns yields two clauses. Positions are assigned in scan
//! order (pattern by pattern), not by match offset.
//!
//! Only when no pattern matches at all does the text fall back to blank-line
//! paragraph splitting.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::clause::Clause;
use crate::config::SegmenterConfig;

static STRUCTURAL_PATTERNS: Lazy<[(&str, Regex); 4]> = Lazy::new(|| {
    [
        (
            "numbered",
            Regex::new(r"\d+\.\s+[A-Z][^.]+\.").expect("valid numbered regex"),
        ),
        (
            "section",
            Regex::new(r"Section\s+\d+\.\s+[^.]+\.").expect("valid section regex"),
        ),
        (
            "lettered",
            Regex::new(r"\([a-z]\)\s+[^.]+\.").expect("valid lettered regex"),
        ),
        (
            "article",
            Regex::new(r"ARTICLE\s+[IVX]+\.\s+[^.]+\.").expect("valid article regex"),
        ),
    ]
});

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("valid paragraph regex"));

/// Pattern-based clause segmenter.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    config: SegmenterConfig,
}

impl Segmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Split `text` into ordered clauses. Never fails; empty text yields none.
    pub fn segment(&self, text: &str) -> Vec<Clause> {
        let mut clauses = Vec::new();

        for (name, pattern) in STRUCTURAL_PATTERNS.iter() {
            let before = clauses.len();
            for m in pattern.find_iter(text) {
                let trailing = take_chars(&text[m.end()..], self.config.context_window);
                let mut body = String::with_capacity(m.len() + 1 + trailing.len());
                body.push_str(m.as_str());
                if !trailing.is_empty() {
                    body.push(' ');
                    body.push_str(trailing);
                }
                let position = clauses.len();
                clauses.push(Clause::new(
                    body.trim(),
                    self.config.default_page,
                    position,
                ));
            }
            debug!(pattern = name, matches = clauses.len() - before, "structural scan");
        }

        if clauses.is_empty() {
            return self.paragraphs(text);
        }
        clauses
    }

    /// Blank-line paragraph fallback.
    ///
    /// Positions are the paragraph's index before filtering, so skipped short
    /// paragraphs leave gaps.
    fn paragraphs(&self, text: &str) -> Vec<Clause> {
        let clauses: Vec<Clause> = PARAGRAPH_BREAK
            .split(text)
            .enumerate()
            .filter_map(|(i, para)| {
                let para = para.trim();
                (para.chars().count() > self.config.min_paragraph_chars)
                    .then(|| Clause::new(para, self.config.default_page, i))
            })
            .collect();
        debug!(clauses = clauses.len(), "paragraph fallback");
        clauses
    }
}

/// Segment with the default configuration.
pub fn segment(text: &str) -> Vec<Clause> {
    Segmenter::default().segment(text)
}

/// Prefix of `s` holding at most `n` characters.
fn take_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
