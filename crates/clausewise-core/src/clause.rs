//! Clause records produced by the segmenter.

use serde::{Deserialize, Serialize};

/// A discrete unit of a legal document.
///
/// `position` is unique within a document and is the ordering key for every
/// downstream stage. `page_number` is best-effort: flat text extraction loses
/// page boundaries, so the segmenter assigns a constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub text: String,
    pub page_number: u32,
    pub position: usize,
}

impl Clause {
    pub fn new(text: impl Into<String>, page_number: u32, position: usize) -> Self {
        Self {
            text: text.into(),
            page_number,
            position,
        }
    }

    /// First `max_chars` characters of the clause, with an ellipsis when cut.
    pub fn preview(&self, max_chars: usize) -> String {
        let mut chars = self.text.chars();
        let head: String = chars.by_ref().take(max_chars).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

impl AsRef<str> for Clause {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
