//! Raw text extraction from document files.
//!
//! Strategies are tried once each, in order; the first success wins. Text
//! that comes back empty is still a success.

mod error;
mod plain;
#[cfg(feature = "pdf")]
mod pdf;

pub use error::ExtractionError;
pub use plain::PlainText;
#[cfg(feature = "pdf")]
pub use pdf::{LopdfText, PdfExtractText};

use std::path::Path;

use tracing::{debug, info, warn};

/// One way of turning a file into text.
pub trait TextExtractor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether this strategy handles files like `path` at all.
    fn accepts(&self, path: &Path) -> bool;

    fn extract(&self, path: &Path) -> Result<String, ExtractionError>;
}

/// Ordered list of strategies.
pub struct ExtractorChain {
    strategies: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorChain {
    pub fn new(strategies: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { strategies }
    }

    /// PDF strategies (with the `pdf` feature), then plain text.
    pub fn standard() -> Self {
        let mut strategies: Vec<Box<dyn TextExtractor>> = Vec::new();
        #[cfg(feature = "pdf")]
        {
            strategies.push(Box::new(PdfExtractText));
            strategies.push(Box::new(LopdfText));
        }
        strategies.push(Box::new(PlainText));
        Self::new(strategies)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, path: &Path) -> Result<String, ExtractionError> {
        if !path.exists() {
            return Err(ExtractionError::NotFound(path.to_path_buf()));
        }

        let mut attempts = Vec::new();
        for strategy in &self.strategies {
            if !strategy.accepts(path) {
                debug!(strategy = strategy.name(), "strategy does not apply");
                continue;
            }
            match strategy.extract(path) {
                Ok(text) => {
                    info!(
                        strategy = strategy.name(),
                        chars = text.chars().count(),
                        path = %path.display(),
                        "extracted text"
                    );
                    return Ok(text);
                }
                Err(e) => {
                    warn!(strategy = strategy.name(), error = %e, "extraction strategy failed");
                    attempts.push(format!("{}: {e}", strategy.name()));
                }
            }
        }

        if attempts.is_empty() {
            return Err(ExtractionError::Unsupported(path.to_path_buf()));
        }
        Err(ExtractionError::AllStrategiesFailed {
            path: path.to_path_buf(),
            attempts,
        })
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::standard()
    }
}

/// Extract with [`ExtractorChain::standard`].
pub fn extract_text(path: &Path) -> Result<String, ExtractionError> {
    ExtractorChain::standard().extract(path)
}

/// Lower-cased file extension, if any.
pub(crate) fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Failing(&'static str);

    impl TextExtractor for Failing {
        fn name(&self) -> &'static str {
            self.0
        }
        fn accepts(&self, _path: &Path) -> bool {
            true
        }
        fn extract(&self, _path: &Path) -> Result<String, ExtractionError> {
            Err(ExtractionError::Io(std::io::Error::other("boom")))
        }
    }

    fn text_file(suffix: &str, content: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn missing_file_is_not_found() {
        let err = extract_text(Path::new("/nonexistent/contract.pdf")).unwrap_err();
        assert!(matches!(err, ExtractionError::NotFound(_)));
    }

    #[test]
    fn plain_text_file() {
        let file = text_file(".txt", b"1. TERM. One year.");
        assert_eq!(extract_text(file.path()).unwrap(), "1. TERM. One year.");
    }

    #[test]
    fn empty_file_is_success() {
        let file = text_file(".md", b"");
        assert_eq!(extract_text(file.path()).unwrap(), "");
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let file = text_file(".docx", b"PK");
        let err = extract_text(file.path()).unwrap_err();
        assert!(matches!(err, ExtractionError::Unsupported(_)), "{err}");
    }

    #[test]
    fn invalid_utf8_fails_every_strategy() {
        let file = text_file(".txt", &[0xff, 0xfe, 0x00, 0x80]);
        match extract_text(file.path()).unwrap_err() {
            ExtractionError::AllStrategiesFailed { attempts, .. } => {
                assert_eq!(attempts.len(), 1);
                assert!(attempts[0].starts_with("plain-text: "));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn first_success_wins_after_failures() {
        let chain = ExtractorChain::new(vec![
            Box::new(Failing("first")),
            Box::new(PlainText),
            Box::new(Failing("never-reached")),
        ]);
        let file = text_file(".txt", b"hello");
        assert_eq!(chain.extract(file.path()).unwrap(), "hello");
    }

    #[test]
    fn all_failures_are_listed_in_order() {
        let chain = ExtractorChain::new(vec![Box::new(Failing("a")), Box::new(Failing("b"))]);
        let file = text_file(".txt", b"hello");
        let err = chain.extract(file.path()).unwrap_err();
        match &err {
            ExtractionError::AllStrategiesFailed { attempts, .. } => {
                assert_eq!(attempts, &vec!["a: io error: boom", "b: io error: boom"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("a: io error: boom; b: io error: boom"));
    }

    #[test]
    fn standard_chain_ends_with_plain_text() {
        let names = ExtractorChain::standard().names();
        assert_eq!(names.last(), Some(&"plain-text"));
        #[cfg(feature = "pdf")]
        assert_eq!(names, vec!["pdf-extract", "lopdf", "plain-text"]);
    }
}
