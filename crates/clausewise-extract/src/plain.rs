use std::path::Path;

use crate::{ExtractionError, TextExtractor, extension};

const EXTENSIONS: [&str; 3] = ["txt", "md", "text"];

/// UTF-8 text files, read as-is.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainText;

impl TextExtractor for PlainText {
    fn name(&self) -> &'static str {
        "plain-text"
    }

    fn accepts(&self, path: &Path) -> bool {
        extension(path).is_some_and(|ext| EXTENSIONS.contains(&ext.as_str()))
    }

    fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        Ok(std::fs::read_to_string(path)?)
    }
}
