//! Optional legal context supplied by an external retrieval collaborator.

use serde::{Deserialize, Serialize};

/// Characters of clause text used as the retrieval query.
pub const QUERY_CHARS: usize = 200;

/// Snippets relevant to a clause, paired with where they came from.
///
/// `sources[i]` describes the provenance of `relevant_info[i]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalContext {
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default)]
    pub relevant_info: Vec<String>,
}

impl LegalContext {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, source: impl Into<String>, info: impl Into<String>) {
        self.sources.push(source.into());
        self.relevant_info.push(info.into());
    }

    pub fn is_empty(&self) -> bool {
        self.relevant_info.is_empty()
    }

    /// `(source, info)` pairs. A missing source reads as "Unknown source".
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.relevant_info.iter().enumerate().map(|(i, info)| {
            let source = self
                .sources
                .get(i)
                .map(String::as_str)
                .unwrap_or("Unknown source");
            (source, info.as_str())
        })
    }
}

/// Looks up context for a clause.
///
/// Implementations return an empty context rather than failing when nothing
/// relevant exists or their backing store is unavailable.
pub trait ContextRetriever: Send + Sync {
    fn retrieve(&self, clause_text: &str) -> LegalContext;
}

/// Retriever that never has anything to offer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoContext;

impl ContextRetriever for NoContext {
    fn retrieve(&self, _clause_text: &str) -> LegalContext {
        LegalContext::empty()
    }
}

/// Retriever that returns the same context for every clause.
#[derive(Debug, Clone, Default)]
pub struct StaticContext {
    context: LegalContext,
}

impl StaticContext {
    pub fn new(context: LegalContext) -> Self {
        Self { context }
    }
}

impl ContextRetriever for StaticContext {
    fn retrieve(&self, _clause_text: &str) -> LegalContext {
        self.context.clone()
    }
}

/// The retrieval query for a clause: its first [`QUERY_CHARS`] characters.
pub fn retrieval_query(clause_text: &str) -> &str {
    match clause_text.char_indices().nth(QUERY_CHARS) {
        Some((idx, _)) => &clause_text[..idx],
        None => clause_text,
    }
}
