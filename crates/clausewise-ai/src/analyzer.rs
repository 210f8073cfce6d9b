//! Full-document analysis: segment, classify, explain, summarize.

use chrono::{DateTime, Utc};
use clausewise_core::context::retrieval_query;
use clausewise_core::{
    AnalyzerConfig, CategorySet, Clause, ContextRetriever, DocumentSummary, LegalContext,
    OperatingMode, RiskAssessment, RiskLevel, Segmenter, categorize,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::classifier::RiskClassifier;
use crate::explainer::Explainer;
use crate::summarizer::Summarizer;

/// Everything known about one clause.
#[derive(Debug, Clone, Serialize)]
pub struct ClauseAnalysis {
    pub clause: Clause,
    pub categories: CategorySet,
    pub assessment: RiskAssessment,
    pub explanation: String,
    /// Context retrieved for this clause; empty when none was found.
    #[serde(skip_serializing_if = "LegalContext::is_empty")]
    pub context: LegalContext,
}

impl ClauseAnalysis {
    /// Retrieved context, `None` when empty.
    pub fn context(&self) -> Option<&LegalContext> {
        (!self.context.is_empty()).then_some(&self.context)
    }
}

/// Analysis of a whole document, clauses in position order.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentReport {
    pub clauses: Vec<ClauseAnalysis>,
    pub summary: DocumentSummary,
    /// Mean clause risk with low = 0, medium = 1, high = 2.
    pub risk_score: f32,
    pub analyzed_at: DateTime<Utc>,
}

impl DocumentReport {
    pub fn summary_text(&self) -> String {
        self.summary.to_text()
    }

    /// Number of clauses at each tier, `[low, medium, high]`.
    pub fn risk_counts(&self) -> [usize; 3] {
        let mut counts = [0; 3];
        for analysis in &self.clauses {
            counts[analysis.assessment.risk_level.index()] += 1;
        }
        counts
    }

    pub fn high_risk(&self) -> impl Iterator<Item = &ClauseAnalysis> {
        self.clauses
            .iter()
            .filter(|a| a.assessment.risk_level == RiskLevel::High)
    }
}

/// The four analysis stages behind one configuration.
pub struct Analyzer {
    segmenter: Segmenter,
    classifier: RiskClassifier,
    explainer: Explainer,
    summarizer: Summarizer,
}

impl Analyzer {
    pub fn new(
        segmenter: Segmenter,
        classifier: RiskClassifier,
        explainer: Explainer,
        summarizer: Summarizer,
    ) -> Self {
        Self {
            segmenter,
            classifier,
            explainer,
            summarizer,
        }
    }

    pub fn from_config(config: &AnalyzerConfig, mode: OperatingMode) -> Self {
        Self::new(
            Segmenter::new(config.segmenter.clone()),
            RiskClassifier::from_config(&config.classifier, mode),
            Explainer::new(config.explainer.clone()),
            Summarizer,
        )
    }

    pub fn classifier(&self) -> &RiskClassifier {
        &self.classifier
    }

    pub fn explainer(&self) -> &Explainer {
        &self.explainer
    }

    pub fn segment(&self, text: &str) -> Vec<Clause> {
        self.segmenter.segment(text)
    }

    pub fn classify(&self, text: &str) -> RiskAssessment {
        self.classifier.classify(text)
    }

    pub fn explain(&self, text: &str, context: Option<&LegalContext>) -> String {
        self.explainer.explain(text, context)
    }

    pub fn summarize<T: AsRef<str>>(&self, clauses: &[T]) -> String {
        self.summarizer.summarize(clauses)
    }

    /// Classify and explain one clause, looking up context first.
    pub fn analyze_clause(&self, clause: Clause, retriever: &dyn ContextRetriever) -> ClauseAnalysis {
        let context = retriever.retrieve(retrieval_query(&clause.text));

        let assessment = self.classifier.classify(&clause.text);
        let explanation = self
            .explainer
            .explain(&clause.text, (!context.is_empty()).then_some(&context));
        debug!(
            position = clause.position,
            risk = %assessment.risk_level,
            "analyzed clause"
        );

        ClauseAnalysis {
            categories: categorize(&clause.text),
            clause,
            assessment,
            explanation,
            context,
        }
    }

    /// Analyze a document sequentially.
    pub fn analyze(&self, text: &str, retriever: &dyn ContextRetriever) -> DocumentReport {
        let clauses = self.segment(text);
        info!(clauses = clauses.len(), "segmented document");
        let analyses = clauses
            .into_iter()
            .map(|clause| self.analyze_clause(clause, retriever))
            .collect();
        self.report(analyses)
    }

    /// Assemble a report from per-clause results produced in any order.
    pub fn report(&self, analyses: Vec<ClauseAnalysis>) -> DocumentReport {
        self.report_at(analyses, Utc::now())
    }

    pub fn report_at(&self, mut analyses: Vec<ClauseAnalysis>, at: DateTime<Utc>) -> DocumentReport {
        analyses.sort_by_key(|a| a.clause.position);
        let texts: Vec<&str> = analyses.iter().map(|a| a.clause.text.as_str()).collect();
        let summary = self.summarizer.summarize_points(&texts);
        let risk_score = risk_score(analyses.iter().map(|a| a.assessment.risk_level));
        info!(clauses = analyses.len(), risk_score, "document analyzed");

        DocumentReport {
            clauses: analyses,
            summary,
            risk_score,
            analyzed_at: at,
        }
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::from_config(&AnalyzerConfig::default(), OperatingMode::Normal)
    }
}

/// Mean of [`RiskLevel::score`]; 0.0 for no clauses.
pub fn risk_score(levels: impl IntoIterator<Item = RiskLevel>) -> f32 {
    let (sum, n) = levels
        .into_iter()
        .fold((0.0f32, 0usize), |(sum, n), level| (sum + level.score(), n + 1));
    if n == 0 { 0.0 } else { sum / n as f32 }
}
