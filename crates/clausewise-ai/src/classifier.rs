//! Clause risk classification.
//!
//! Two signals are combined per clause: the keyword tiers and a statistical
//! model's opinion. Keywords can only raise the model's verdict, never lower
//! it:
//!
//! | keyword tier | model  | final            |
//! |--------------|--------|------------------|
//! | high         | any    | high             |
//! | medium       | low    | medium           |
//! | otherwise    | `m`    | `m`              |
//!
//! The model is pluggable through [`RiskScorer`]. The built-in
//! [`SeedModel`] is always available; with the `onnx` feature a pre-trained
//! sequence classifier can be loaded from `classifier.model_dir`, falling back
//! to the seed model if loading fails.

use clausewise_core::config::ClassifierConfig;
use clausewise_core::{OperatingMode, RiskAssessment, RiskLevel};
use tracing::{debug, info};

use crate::keywords::{KeywordMatcher, TierMatches};
use crate::seed_model::SeedModel;

/// A model's verdict: its arg-max class and that class's probability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOpinion {
    pub level: RiskLevel,
    pub confidence: f32,
}

/// Statistical risk model.
///
/// Implementations must be total: a text that cannot be scored still yields
/// an opinion.
pub trait RiskScorer: Send + Sync {
    fn name(&self) -> &'static str;
    fn score(&self, text: &str) -> ModelOpinion;
}

enum Backend {
    /// Bootstrap mode: nothing loaded, every clause gets the placeholder.
    Placeholder,
    Scored(Box<dyn RiskScorer>),
}

/// Keyword tiers plus a statistical model.
pub struct RiskClassifier {
    keywords: KeywordMatcher,
    backend: Backend,
}

impl RiskClassifier {
    pub fn new(keywords: KeywordMatcher, scorer: Box<dyn RiskScorer>) -> Self {
        Self {
            keywords,
            backend: Backend::Scored(scorer),
        }
    }

    /// Build from configuration. Never fails: a model that cannot be loaded
    /// is replaced by the seed model.
    pub fn from_config(config: &ClassifierConfig, mode: OperatingMode) -> Self {
        let keywords = KeywordMatcher::new(config.keywords.clone());
        if mode == OperatingMode::Bootstrap {
            info!("bootstrap mode: risk model not loaded");
            return Self {
                keywords,
                backend: Backend::Placeholder,
            };
        }
        let scorer = select_scorer(config);
        info!(scorer = scorer.name(), "risk classifier ready");
        Self::new(keywords, scorer)
    }

    /// Name of the active model, or `"placeholder"` in bootstrap mode.
    pub fn scorer_name(&self) -> &'static str {
        match &self.backend {
            Backend::Placeholder => "placeholder",
            Backend::Scored(scorer) => scorer.name(),
        }
    }

    /// Classify one clause. Total over all strings, including empty text.
    pub fn classify(&self, text: &str) -> RiskAssessment {
        let scorer = match &self.backend {
            Backend::Placeholder => return RiskAssessment::placeholder(),
            Backend::Scored(scorer) => scorer,
        };

        let matches = self.keywords.find(text);
        let opinion = scorer.score(text);
        let risk_level = combine(matches.risk(), opinion.level);
        debug!(
            keyword_risk = %matches.risk(),
            model_risk = %opinion.level,
            final_risk = %risk_level,
            "classified clause"
        );

        RiskAssessment {
            risk_level,
            confidence: opinion.confidence.clamp(0.0, 1.0),
            keywords: matches.flatten(),
            explanation: explain(risk_level, &matches),
        }
    }
}

impl Default for RiskClassifier {
    fn default() -> Self {
        Self::new(KeywordMatcher::default(), Box::new(SeedModel::train()))
    }
}

/// Escalate the model's verdict by the keyword tier.
pub fn combine(keyword_risk: RiskLevel, model_risk: RiskLevel) -> RiskLevel {
    match (keyword_risk, model_risk) {
        (RiskLevel::High, _) => RiskLevel::High,
        (RiskLevel::Medium, RiskLevel::Low) => RiskLevel::Medium,
        (_, model) => model,
    }
}

/// Explanation sentence for the final tier, listing that tier's matched terms.
fn explain(level: RiskLevel, matches: &TierMatches) -> String {
    let (lead, terms_label) = match level {
        RiskLevel::High => (
            "This clause contains high-risk elements that may be unfavorable.",
            "High-risk terms found",
        ),
        RiskLevel::Medium => (
            "This clause contains medium-risk elements that warrant attention.",
            "Medium-risk terms found",
        ),
        RiskLevel::Low => (
            "This clause appears to be standard with low risk.",
            "Common legal terms found",
        ),
    };

    let terms = matches.for_level(level);
    if terms.is_empty() {
        lead.to_string()
    } else {
        format!("{lead} {terms_label}: {}.", terms.join(", "))
    }
}

#[cfg(feature = "onnx")]
fn select_scorer(config: &ClassifierConfig) -> Box<dyn RiskScorer> {
    if let Some(dir) = &config.model_dir {
        match crate::onnx::OnnxScorer::load(dir, config.max_length) {
            Ok(scorer) => return Box::new(scorer),
            Err(e) => tracing::warn!(
                error = %e,
                model_dir = %dir.display(),
                "failed to load risk model, using seed model"
            ),
        }
    }
    Box::new(SeedModel::train())
}

#[cfg(not(feature = "onnx"))]
fn select_scorer(config: &ClassifierConfig) -> Box<dyn RiskScorer> {
    if let Some(dir) = &config.model_dir {
        tracing::warn!(
            model_dir = %dir.display(),
            "model_dir ignored: built without the onnx feature"
        );
    }
    Box::new(SeedModel::train())
}
