//! Analysis pipeline: segment, then classify and explain clauses concurrently.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use clausewise_ai::{Analyzer, DocumentReport, GenerativeExplainer};
use clausewise_core::ContextRetriever;
use futures::StreamExt;
use futures::stream::FuturesUnordered;

pub struct AnalyzeStats {
    pub total_clauses: usize,
    pub elapsed_secs: f64,
}

/// Run the full pipeline over extracted document text.
///
/// Per-clause work runs on the blocking pool in whatever order it finishes;
/// the report is reassembled in clause position order.
pub async fn run_analysis(
    analyzer: Arc<Analyzer>,
    text: String,
    retriever: Arc<dyn ContextRetriever>,
    generative: Option<&GenerativeExplainer>,
) -> anyhow::Result<(DocumentReport, AnalyzeStats)> {
    let start = Instant::now();

    // 1. Segment.
    let clauses = analyzer.segment(&text);
    let total_clauses = clauses.len();
    eprintln!("  Segmented {total_clauses} clauses");

    // 2. Classify + explain each clause.
    let mut pending: FuturesUnordered<_> = clauses
        .into_iter()
        .map(|clause| {
            let analyzer = Arc::clone(&analyzer);
            let retriever = Arc::clone(&retriever);
            tokio::task::spawn_blocking(move || analyzer.analyze_clause(clause, retriever.as_ref()))
        })
        .collect();

    let mut analyses = Vec::with_capacity(total_clauses);
    while let Some(result) = pending.next().await {
        analyses.push(result.context("clause analysis task failed")?);
        eprint!(
            "\r  Analyzed {}/{total_clauses} ({:.1}%)",
            analyses.len(),
            analyses.len() as f64 / total_clauses as f64 * 100.0
        );
    }
    if total_clauses > 0 {
        eprintln!();
    }

    // 3. Replace rule-based explanations with generated ones.
    if let Some(generative) = generative {
        eprintln!("  Generating explanations...");
        for analysis in &mut analyses {
            let explanation = generative
                .explain(&analysis.clause.text, analysis.context())
                .await;
            analysis.explanation = explanation;
        }
    }

    // 4. Order by position and summarize.
    let report = analyzer.report(analyses);

    Ok((
        report,
        AnalyzeStats {
            total_clauses,
            elapsed_secs: start.elapsed().as_secs_f64(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use clausewise_ai::{Explainer, LlmClient};
    use clausewise_core::config::LlmConfig;
    use clausewise_core::{AnalyzerConfig, LegalContext, NoContext, OperatingMode};

    /// Counts lookups and always returns one snippet.
    #[derive(Default)]
    struct CountingRetriever {
        calls: AtomicUsize,
    }

    impl ContextRetriever for CountingRetriever {
        fn retrieve(&self, _clause_text: &str) -> LegalContext {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut ctx = LegalContext::empty();
            ctx.push("glossary", "Terminate: bring to an end.");
            ctx
        }
    }

    #[tokio::test]
    async fn report_is_in_position_order() {
        let analyzer = Arc::new(Analyzer::from_config(
            &AnalyzerConfig::default(),
            OperatingMode::Normal,
        ));
        let text = "1. TERM. One year.\n2. PAYMENT. $500 monthly.\n3. LAW. Governed by the laws of Ohio.\n\
                    (a) The supplier delivers goods.\n(b) The buyer pays invoices."
            .to_string();
        let (report, stats) = run_analysis(analyzer, text, Arc::new(NoContext), None)
            .await
            .unwrap();
        assert_eq!(stats.total_clauses, 5);
        let positions: Vec<_> = report.clauses.iter().map(|a| a.clause.position).collect();
        assert_eq!(positions, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn empty_text_yields_empty_report() {
        let analyzer = Arc::new(Analyzer::default());
        let (report, stats) = run_analysis(analyzer, String::new(), Arc::new(NoContext), None)
            .await
            .unwrap();
        assert_eq!(stats.total_clauses, 0);
        assert!(report.clauses.is_empty());
        assert_eq!(report.risk_score, 0.0);
    }

    #[tokio::test]
    async fn context_is_retrieved_once_per_clause_with_generation() {
        let analyzer = Arc::new(Analyzer::default());
        let retriever = Arc::new(CountingRetriever::default());
        // Nothing listens on port 9, so every generated explanation falls back to the rules.
        let client = LlmClient::new(&LlmConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            model: "llama3".to_string(),
            timeout_secs: 2,
            temperature: 0.2,
        })
        .unwrap();
        let generative = GenerativeExplainer::new(client, Explainer::default());
        let text = "1. TERM. One year.\n2. PAYMENT. $500 monthly.".to_string();

        let (report, stats) = run_analysis(
            analyzer,
            text,
            Arc::clone(&retriever) as Arc<dyn ContextRetriever>,
            Some(&generative),
        )
        .await
        .unwrap();
        assert_eq!(stats.total_clauses, 2);
        assert_eq!(retriever.calls.load(Ordering::SeqCst), 2);
        assert!(report.clauses.iter().all(|a| a.context().is_some()));
    }
}
