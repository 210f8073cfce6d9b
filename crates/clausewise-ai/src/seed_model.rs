//! Built-in statistical risk model.
//!
//! TF-IDF features (smoothed idf, L2-normalised rows) feeding a multinomial
//! naive Bayes classifier with Laplace smoothing, fitted at construction on a
//! fixed set of fifteen labelled sentences. Fifteen examples cannot produce a
//! strong model; even on its own training sentences confidence stays under
//! 0.6. It gives the classifier a second opinion next to the keyword tiers
//! when no pre-trained model is configured.

use std::collections::{BTreeSet, HashMap};

use clausewise_core::RiskLevel;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::classifier::{ModelOpinion, RiskScorer};

/// Labelled training sentences, five per tier.
pub const SEED_CORPUS: [(&str, RiskLevel); 15] = [
    (
        "The user waives all rights to pursue legal action against the company.",
        RiskLevel::High,
    ),
    (
        "You agree to indemnify and hold harmless the company from any claims.",
        RiskLevel::High,
    ),
    (
        "The company reserves the right to terminate service without notice.",
        RiskLevel::High,
    ),
    (
        "You forfeit all payments made if you cancel the service.",
        RiskLevel::High,
    ),
    (
        "You waive your right to participate in a class action lawsuit.",
        RiskLevel::High,
    ),
    (
        "Either party may terminate this agreement with 30 days notice.",
        RiskLevel::Medium,
    ),
    (
        "You agree to keep all information confidential for a period of 5 years.",
        RiskLevel::Medium,
    ),
    (
        "This agreement is governed by the laws of the state of California.",
        RiskLevel::Medium,
    ),
    (
        "Any disputes shall be resolved through binding arbitration.",
        RiskLevel::Medium,
    ),
    (
        "You agree not to compete with the company for 1 year after termination.",
        RiskLevel::Medium,
    ),
    (
        "Payments are due on the first of each month.",
        RiskLevel::Low,
    ),
    ("The term of this agreement is 12 months.", RiskLevel::Low),
    (
        "Notices must be sent in writing to the address provided.",
        RiskLevel::Low,
    ),
    (
        "This agreement constitutes the entire understanding between the parties.",
        RiskLevel::Low,
    ),
    (
        "If any provision is found invalid, the remainder shall remain in effect.",
        RiskLevel::Low,
    ),
];

/// Additive (Laplace) smoothing for the naive Bayes feature counts.
const ALPHA: f64 = 1.0;

/// Word tokens of two or more characters.
static TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").expect("valid token regex"));

/// TF-IDF + multinomial naive Bayes, indexed by [`RiskLevel::index`].
#[derive(Debug, Clone)]
pub struct SeedModel {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    class_log_prior: [f64; 3],
    feature_log_prob: [Vec<f64>; 3],
}

impl SeedModel {
    /// Fit on [`SEED_CORPUS`].
    pub fn train() -> Self {
        Self::fit(&SEED_CORPUS)
    }

    pub fn fit(examples: &[(&str, RiskLevel)]) -> Self {
        let docs: Vec<Vec<String>> = examples.iter().map(|(text, _)| tokenize(text)).collect();

        let terms: BTreeSet<&str> = docs.iter().flatten().map(String::as_str).collect();
        let vocabulary: HashMap<String, usize> = terms
            .into_iter()
            .enumerate()
            .map(|(i, term)| (term.to_string(), i))
            .collect();
        let n_features = vocabulary.len();

        let mut df = vec![0usize; n_features];
        for doc in &docs {
            let seen: BTreeSet<usize> = doc.iter().map(|t| vocabulary[t]).collect();
            for j in seen {
                df[j] += 1;
            }
        }
        let n_docs = docs.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n_docs) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let mut model = Self {
            vocabulary,
            idf,
            class_log_prior: [0.0; 3],
            feature_log_prob: [vec![], vec![], vec![]],
        };

        let mut class_count = [0usize; 3];
        let mut feature_count = [
            vec![0.0f64; n_features],
            vec![0.0f64; n_features],
            vec![0.0f64; n_features],
        ];
        for (doc, (_, level)) in docs.iter().zip(examples) {
            let c = level.index();
            class_count[c] += 1;
            for (j, w) in model.vectorize_tokens(doc) {
                feature_count[c][j] += w;
            }
        }

        let total: usize = class_count.iter().sum();
        for c in 0..3 {
            model.class_log_prior[c] = if total == 0 {
                (1.0f64 / 3.0).ln()
            } else if class_count[c] == 0 {
                f64::NEG_INFINITY
            } else {
                (class_count[c] as f64 / total as f64).ln()
            };

            let smoothed_total: f64 =
                feature_count[c].iter().sum::<f64>() + ALPHA * n_features as f64;
            model.feature_log_prob[c] = feature_count[c]
                .iter()
                .map(|&count| ((count + ALPHA) / smoothed_total).ln())
                .collect();
        }

        model
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Class probabilities in `[low, medium, high]` order. Sums to 1.
    pub fn predict_proba(&self, text: &str) -> [f64; 3] {
        let features = self.vectorize_tokens(&tokenize(text));

        let mut joint = self.class_log_prior;
        for (c, log_likelihood) in joint.iter_mut().enumerate() {
            for &(j, w) in &features {
                *log_likelihood += w * self.feature_log_prob[c][j];
            }
        }

        let max = joint.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let mut exp = joint.map(|v| (v - max).exp());
        let sum: f64 = exp.iter().sum();
        for p in &mut exp {
            *p /= sum;
        }
        exp
    }

    pub fn predict(&self, text: &str) -> ModelOpinion {
        let proba = self.predict_proba(text);
        // Strict `>` keeps the earliest (least severe) class on ties.
        let mut best = 0;
        for c in 1..3 {
            if proba[c] > proba[best] {
                best = c;
            }
        }
        ModelOpinion {
            level: RiskLevel::ALL[best],
            confidence: proba[best] as f32,
        }
    }

    /// Sparse L2-normalised TF-IDF vector. Out-of-vocabulary tokens are dropped.
    fn vectorize_tokens(&self, tokens: &[String]) -> Vec<(usize, f64)> {
        let mut tf: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&j) = self.vocabulary.get(token) {
                *tf.entry(j).or_default() += 1.0;
            }
        }

        let mut features: Vec<(usize, f64)> = tf
            .into_iter()
            .map(|(j, count)| (j, count * self.idf[j]))
            .collect();
        features.sort_unstable_by_key(|&(j, _)| j);

        let norm = features.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in &mut features {
                *w /= norm;
            }
        }
        features
    }
}

impl RiskScorer for SeedModel {
    fn name(&self) -> &'static str {
        "seed-model"
    }

    fn score(&self, text: &str) -> ModelOpinion {
        self.predict(text)
    }
}

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizer_drops_single_characters() {
        assert_eq!(
            tokenize("A 30-day notice, I agree."),
            vec!["30", "day", "notice", "agree"]
        );
    }

    #[test]
    fn vocabulary_covers_corpus() {
        let model = SeedModel::train();
        assert!(model.vocabulary.contains_key("indemnify"));
        assert!(model.vocabulary.contains_key("arbitration"));
        assert!(!model.vocabulary.contains_key("a"));
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = SeedModel::train();
        for text in [
            "You agree to indemnify the company.",
            "Payment is due monthly.",
            "completely unrelated words",
        ] {
            let proba = model.predict_proba(text);
            let sum: f64 = proba.iter().sum();
            assert!((sum - 1.0).abs() < 1e-9, "{text}: {proba:?}");
            assert!(proba.iter().all(|p| (0.0..=1.0).contains(p)));
        }
    }

    #[test]
    fn unknown_text_falls_back_to_uniform_low() {
        let model = SeedModel::train();
        for text in ["", "zzz qqq"] {
            let opinion = model.predict(text);
            assert_eq!(opinion.level, RiskLevel::Low);
            assert!((opinion.confidence - 1.0 / 3.0).abs() < 1e-6);
        }
    }

    #[test]
    fn recovers_distinctive_training_sentences() {
        let model = SeedModel::train();
        assert_eq!(
            model.predict("You agree to indemnify and hold harmless the company from any claims.").level,
            RiskLevel::High
        );
        assert_eq!(
            model.predict("Any disputes shall be resolved through binding arbitration.").level,
            RiskLevel::Medium
        );
        assert_eq!(
            model.predict("Notices must be sent in writing to the address provided.").level,
            RiskLevel::Low
        );
    }

    #[test]
    fn deterministic() {
        let a = SeedModel::train();
        let b = SeedModel::train();
        let text = "The company may terminate without notice.";
        assert_eq!(a.predict_proba(text), b.predict_proba(text));
    }

    #[test]
    fn missing_class_never_predicted() {
        let model = SeedModel::fit(&[
            ("pay the fee", RiskLevel::Low),
            ("waive every right", RiskLevel::High),
        ]);
        let proba = model.predict_proba("pay the fee");
        assert_eq!(proba[RiskLevel::Medium.index()], 0.0);
        assert_eq!(model.predict("pay the fee").level, RiskLevel::Low);
    }
}
