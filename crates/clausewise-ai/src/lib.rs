//! Clause analysis: risk classification, plain-English explanations, and
//! document summaries.

pub mod analyzer;
pub mod classifier;
pub mod explainer;
pub mod keywords;
pub mod plain;
pub mod seed_model;
pub mod summarizer;

#[cfg(feature = "llm")]
pub mod llm;
#[cfg(feature = "onnx")]
mod onnx;

pub use analyzer::{Analyzer, ClauseAnalysis, DocumentReport, risk_score};
pub use classifier::{ModelOpinion, RiskClassifier, RiskScorer, combine};
pub use explainer::Explainer;
pub use keywords::{KeywordMatcher, TierMatches};
pub use seed_model::SeedModel;
pub use summarizer::Summarizer;

#[cfg(feature = "llm")]
pub use llm::{GenerativeExplainer, LlmClient, LlmError};
#[cfg(feature = "onnx")]
pub use onnx::OnnxScorer;
