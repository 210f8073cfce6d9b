//! Human-readable card display for clauses, assessments, and reports.

use std::path::Path;

use chrono::SecondsFormat;
use clausewise_ai::DocumentReport;
use clausewise_core::{Clause, RiskAssessment, RiskLevel};

const PREVIEW_CHARS: usize = 80;
const MAX_KEYWORDS: usize = 10;

// ── Public API ──

/// One line per clause: position, page, preview.
pub fn print_clauses(clauses: &[Clause]) {
    if clauses.is_empty() {
        println!("(no clauses found)");
        return;
    }
    for clause in clauses {
        println!(
            "  {:>4}  p{:<3} {}",
            clause.position,
            clause.page_number,
            single_line(&clause.preview(PREVIEW_CHARS))
        );
    }
    println!();
    println!("{} clauses", clauses.len());
}

pub fn print_assessment(assessment: &RiskAssessment) {
    print_section(
        "Assessment",
        &[
            ("risk_level", assessment.risk_level.to_string()),
            ("confidence", format!("{:.3}", assessment.confidence)),
            ("keywords", keyword_list(&assessment.keywords)),
            ("explanation", assessment.explanation.clone()),
        ],
    );
}

/// Full report as a vertical card: overview, clauses, summary.
pub fn print_report(path: &Path, report: &DocumentReport) {
    println!("=== {} ===", path.display());
    println!();

    let [low, medium, high] = report.risk_counts();
    print_section(
        "Overview",
        &[
            ("clauses", report.clauses.len().to_string()),
            ("risk_score", format!("{:.2} / 2.00", report.risk_score)),
            ("high", high.to_string()),
            ("medium", medium.to_string()),
            ("low", low.to_string()),
            (
                "analyzed_at",
                report
                    .analyzed_at
                    .to_rfc3339_opts(SecondsFormat::Secs, true),
            ),
        ],
    );

    if !report.clauses.is_empty() {
        println!("Clauses");
        for analysis in &report.clauses {
            let a = &analysis.assessment;
            println!(
                "  [{:>3}] {:<6} {:.2}  {}",
                analysis.clause.position,
                risk_tag(a.risk_level),
                a.confidence,
                single_line(&analysis.clause.preview(PREVIEW_CHARS))
            );
            if !a.keywords.is_empty() {
                println!("        keywords: {}", keyword_list(&a.keywords));
            }
            println!("        {}", analysis.explanation);
        }
        println!();
    }

    println!("Summary");
    for line in report.summary_text().lines() {
        if line.is_empty() {
            println!();
        } else {
            println!("  {line}");
        }
    }
}

// ── Section rendering ──

fn print_section(header: &str, rows: &[(&str, String)]) {
    if rows.iter().all(|(_, value)| value.is_empty()) {
        return;
    }
    println!("{header}");
    for (name, value) in rows {
        if value.is_empty() {
            continue;
        }
        println!("  {:<26} {}", name, value);
    }
    println!();
}

// ── Helpers ──

fn risk_tag(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "HIGH",
        RiskLevel::Medium => "MEDIUM",
        RiskLevel::Low => "low",
    }
}

fn keyword_list(keywords: &[String]) -> String {
    let shown: Vec<&str> = keywords
        .iter()
        .take(MAX_KEYWORDS)
        .map(String::as_str)
        .collect();
    let mut out = shown.join(", ");
    if keywords.len() > MAX_KEYWORDS {
        out.push_str(&format!(" ... and {} more", keywords.len() - MAX_KEYWORDS));
    }
    out
}

/// Collapse newlines and runs of whitespace so previews fit on one line.
fn single_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_collapses_whitespace() {
        assert_eq!(single_line("1. TERM.\n  One   year."), "1. TERM. One year.");
    }

    #[test]
    fn keyword_list_truncates() {
        let many: Vec<String> = (0..12).map(|i| format!("k{i}")).collect();
        let out = keyword_list(&many);
        assert!(out.starts_with("k0, k1"));
        assert!(out.ends_with("... and 2 more"));
        assert_eq!(keyword_list(&[]), "");
    }
}
