//! PDF text extraction.
//!
//! `pdf-extract` handles most documents with better spacing; `lopdf` reads
//! page by page and copes with some files the former rejects.

use std::panic;
use std::path::Path;

use tracing::debug;

use crate::{ExtractionError, TextExtractor, extension};

fn is_pdf(path: &Path) -> bool {
    extension(path).is_some_and(|ext| ext == "pdf")
}

/// Whole-document extraction via `pdf-extract`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfExtractText;

impl TextExtractor for PdfExtractText {
    fn name(&self) -> &'static str {
        "pdf-extract"
    }

    fn accepts(&self, path: &Path) -> bool {
        is_pdf(path)
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        // pdf-extract panics on some malformed inputs.
        match panic::catch_unwind(|| pdf_extract::extract_text(path)) {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
            Err(_) => Err(ExtractionError::Pdf("parser panicked".to_string())),
        }
    }
}

/// Page-by-page extraction via `lopdf`. Pages are joined with newlines.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfText;

impl TextExtractor for LopdfText {
    fn name(&self) -> &'static str {
        "lopdf"
    }

    fn accepts(&self, path: &Path) -> bool {
        is_pdf(path)
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        let doc = lopdf::Document::load(path).map_err(|e| ExtractionError::Pdf(e.to_string()))?;
        let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
        debug!(pages = pages.len(), "lopdf loaded document");

        let mut text = String::new();
        for page in pages {
            let page_text = doc
                .extract_text(&[page])
                .map_err(|e| ExtractionError::Pdf(format!("page {page}: {e}")))?;
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(&page_text);
        }
        Ok(text)
    }
}
