//! Analyzer configuration.
//!
//! Every field has a default matching the built-in behaviour, so an empty
//! TOML file (or no file at all) is a valid configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Whether the caller is running a normal analysis or a setup/bootstrap run.
///
/// In `Bootstrap` no model is loaded and the classifier answers with a fixed
/// placeholder assessment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    #[default]
    Normal,
    Bootstrap,
}

/// Top-level configuration passed to analyzer constructors.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    #[serde(default)]
    pub segmenter: SegmenterConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub explainer: ExplainerConfig,

    /// Local model server for generative explanations. Absent = rules only.
    #[serde(default)]
    pub llm: Option<LlmConfig>,
}

impl AnalyzerConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::info!(path = %path.display(), "loaded analyzer config");
        Ok(config)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmenterConfig {
    /// Characters of trailing text appended to each structural match.
    pub context_window: usize,
    /// Fallback paragraphs must be strictly longer than this (after trimming).
    pub min_paragraph_chars: usize,
    /// Page number assigned to every clause; flat text has no page map.
    pub default_page: u32,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            context_window: 500,
            min_paragraph_chars: 50,
            default_page: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Directory holding `model.onnx` and `tokenizer.json` for the
    /// pre-trained risk model. Only used with the `onnx` feature.
    pub model_dir: Option<PathBuf>,
    /// Token truncation length for the pre-trained model.
    pub max_length: usize,
    pub keywords: KeywordTiers,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_dir: None,
            max_length: 512,
            keywords: KeywordTiers::default(),
        }
    }
}

/// Risk keyword lists, one per tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordTiers {
    pub high: Vec<String>,
    pub medium: Vec<String>,
    pub low: Vec<String>,
}

const HIGH_RISK_KEYWORDS: &[&str] = &[
    "waive",
    "waiver",
    "indemnify",
    "indemnification",
    "liability",
    "unlimited liability",
    "termination without notice",
    "unilateral",
    "non-negotiable",
    "forfeit",
    "penalty",
    "mandatory arbitration",
    "class action waiver",
    "non-refundable",
];

const MEDIUM_RISK_KEYWORDS: &[&str] = &[
    "terminate",
    "termination",
    "confidential",
    "confidentiality",
    "non-compete",
    "non-solicitation",
    "intellectual property",
    "assignment",
    "governing law",
    "jurisdiction",
    "arbitration",
];

const LOW_RISK_KEYWORDS: &[&str] = &[
    "notice",
    "payment",
    "term",
    "renewal",
    "amendment",
    "modification",
    "communication",
    "severability",
    "entire agreement",
];

impl Default for KeywordTiers {
    fn default() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            high: owned(HIGH_RISK_KEYWORDS),
            medium: owned(MEDIUM_RISK_KEYWORDS),
            low: owned(LOW_RISK_KEYWORDS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplainerConfig {
    /// Unmatched clauses shorter than this get a one-line restatement.
    pub short_clause_chars: usize,
    /// Characters of the clause quoted in the restatement.
    pub preview_chars: usize,
    /// Sentences quoted as key points for longer unmatched clauses.
    pub max_key_points: usize,
    /// Key-point sentences must be strictly longer than this...
    pub key_point_min_chars: usize,
    /// ...and strictly shorter than this.
    pub key_point_max_chars: usize,
}

impl Default for ExplainerConfig {
    fn default() -> Self {
        Self {
            short_clause_chars: 200,
            preview_chars: 150,
            max_key_points: 3,
            key_point_min_chars: 20,
            key_point_max_chars: 200,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model server base URL, e.g. `http://localhost:11434`.
    pub base_url: String,
    pub model: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_toml_is_default() {
        let config = AnalyzerConfig::from_toml_str("").unwrap();
        assert_eq!(config.segmenter.context_window, 500);
        assert_eq!(config.segmenter.min_paragraph_chars, 50);
        assert_eq!(config.classifier.max_length, 512);
        assert!(config.classifier.model_dir.is_none());
        assert_eq!(config.explainer.short_clause_chars, 200);
        assert!(config.llm.is_none());
    }

    #[test]
    fn default_keyword_tiers() {
        let tiers = KeywordTiers::default();
        assert_eq!(tiers.high.len(), 14);
        assert_eq!(tiers.medium.len(), 11);
        assert_eq!(tiers.low.len(), 9);
        assert!(tiers.high.contains(&"indemnify".to_string()));
        assert!(tiers.low.contains(&"entire agreement".to_string()));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            [segmenter]
            context_window = 200

            [classifier]
            model_dir = "models/risk"
            "#,
        )
        .unwrap();
        assert_eq!(config.segmenter.context_window, 200);
        assert_eq!(config.segmenter.default_page, 1);
        assert_eq!(
            config.classifier.model_dir.as_deref(),
            Some(Path::new("models/risk"))
        );
        assert_eq!(config.classifier.keywords, KeywordTiers::default());
    }

    #[test]
    fn llm_section_defaults() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            [llm]
            base_url = "http://localhost:11434"
            model = "llama3"
            "#,
        )
        .unwrap();
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "llama3");
        assert_eq!(llm.timeout_secs, 120);
        assert!((llm.temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn custom_keywords() {
        let config = AnalyzerConfig::from_toml_str(
            r#"
            [classifier.keywords]
            high = ["forfeit"]
            medium = []
            low = ["notice"]
            "#,
        )
        .unwrap();
        assert_eq!(config.classifier.keywords.high, vec!["forfeit"]);
        assert!(config.classifier.keywords.medium.is_empty());
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = AnalyzerConfig::from_toml_str("[segmenter\ncontext_window = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[explainer]\nmax_key_points = 5").unwrap();
        let config = AnalyzerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(config.explainer.max_key_points, 5);
        assert_eq!(config.explainer.preview_chars, 150);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AnalyzerConfig::from_toml_file(Path::new("/nonexistent/clausewise.toml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
