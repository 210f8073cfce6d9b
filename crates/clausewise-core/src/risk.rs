//! Risk tiers and per-clause risk assessments.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Risk tier assigned to a clause.
///
/// Variants are declared least to most severe so that `Ord` follows
/// severity: escalation is `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// All tiers, least severe first.
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Low, RiskLevel::Medium, RiskLevel::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    /// Numeric weight used for the document-level risk score.
    pub fn score(&self) -> f32 {
        match self {
            Self::Low => 0.0,
            Self::Medium => 1.0,
            Self::High => 2.0,
        }
    }

    /// Index into `[low, medium, high]` ordered outputs.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict for a single clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    /// Probability of the statistical model's arg-max class, in `[0, 1]`.
    pub confidence: f32,
    /// Matched keywords in tier scan order: high, medium, low.
    pub keywords: Vec<String>,
    pub explanation: String,
}

impl RiskAssessment {
    /// Fixed assessment returned while running in bootstrap mode.
    pub fn placeholder() -> Self {
        Self {
            risk_level: RiskLevel::Low,
            confidence: 1.0,
            keywords: Vec::new(),
            explanation: "This is a placeholder assessment produced during bootstrap.".to_string(),
        }
    }
}
