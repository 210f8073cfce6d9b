mod analyze;
mod display;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use clausewise_ai::{Analyzer, Explainer, GenerativeExplainer, LlmClient, RiskClassifier, Summarizer};
use clausewise_core::{
    AnalyzerConfig, ContextRetriever, LegalContext, NoContext, OperatingMode, Segmenter,
    StaticContext,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "clausewise", version, about = "Clause-level analysis of legal documents")]
struct Cli {
    /// Analyzer configuration file (TOML).
    #[arg(long, global = true, env = "CLAUSEWISE_CONFIG")]
    config: Option<PathBuf>,

    /// Do not load any model; risk assessments are placeholders.
    #[arg(long, global = true)]
    bootstrap: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split a document into clauses.
    Segment {
        file: PathBuf,
        #[arg(long)]
        json: bool,
    },
    /// Assess the risk of a single clause.
    Classify {
        text: String,
        #[arg(long)]
        json: bool,
    },
    /// Explain a single clause in plain English.
    Explain {
        text: String,
        /// Legal context snippets (JSON: {"sources": [...], "relevant_info": [...]}).
        #[arg(long)]
        context: Option<PathBuf>,
    },
    /// Summarize a document.
    Summarize { file: PathBuf },
    /// Segment, classify, explain, and summarize a document.
    Analyze {
        file: PathBuf,
        #[arg(long)]
        json: bool,
        #[arg(long)]
        context: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("clausewise v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::from_toml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let mode = if cli.bootstrap {
        OperatingMode::Bootstrap
    } else {
        OperatingMode::Normal
    };

    match cli.command {
        Command::Segment { file, json } => {
            let text = read_document(&file).await?;
            let clauses = Segmenter::new(config.segmenter).segment(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&clauses)?);
            } else {
                display::print_clauses(&clauses);
            }
        }
        Command::Classify { text, json } => {
            let classifier = RiskClassifier::from_config(&config.classifier, mode);
            let assessment = classifier.classify(&text);
            if json {
                println!("{}", serde_json::to_string_pretty(&assessment)?);
            } else {
                display::print_assessment(&assessment);
            }
        }
        Command::Explain { text, context } => {
            let context = load_context(context.as_deref())?;
            let explanation = match generative_explainer(&config, mode)? {
                Some(generative) => generative.explain(&text, context.as_ref()).await,
                None => Explainer::new(config.explainer).explain(&text, context.as_ref()),
            };
            println!("{explanation}");
        }
        Command::Summarize { file } => {
            let text = read_document(&file).await?;
            let clauses = Segmenter::new(config.segmenter.clone()).segment(&text);
            if let Some(generative) = generative_explainer(&config, mode)? {
                println!("{}\n", generative.summarize_overview(&clauses).await);
            }
            println!("{}", Summarizer.summarize(&clauses));
        }
        Command::Analyze {
            file,
            json,
            context,
        } => {
            let retriever: Arc<dyn ContextRetriever> = match load_context(context.as_deref())? {
                Some(ctx) => Arc::new(StaticContext::new(ctx)),
                None => Arc::new(NoContext),
            };
            let generative = generative_explainer(&config, mode)?;
            let analyzer = Arc::new(Analyzer::from_config(&config, mode));

            eprintln!("Analyzing {}...", file.display());
            let text = read_document(&file).await?;
            let (report, stats) =
                analyze::run_analysis(analyzer, text, retriever, generative.as_ref()).await?;
            eprintln!(
                "  {} clauses in {:.2}s",
                stats.total_clauses, stats.elapsed_secs
            );

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                display::print_report(&file, &report);
            }
        }
    }

    Ok(())
}

/// Extract document text on the blocking pool.
async fn read_document(path: &Path) -> anyhow::Result<String> {
    let owned = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || clausewise_extract::extract_text(&owned))
        .await
        .context("extraction task failed")?
        .with_context(|| format!("extracting text from {}", path.display()))?;
    Ok(text)
}

fn load_context(path: Option<&Path>) -> anyhow::Result<Option<LegalContext>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading context {}", path.display()))?;
    let context: LegalContext = serde_json::from_str(&raw)
        .with_context(|| format!("parsing context {}", path.display()))?;
    Ok(Some(context))
}

/// Generative explainer when `[llm]` is configured. Bootstrap runs stay
/// rule-based.
fn generative_explainer(
    config: &AnalyzerConfig,
    mode: OperatingMode,
) -> anyhow::Result<Option<GenerativeExplainer>> {
    let Some(llm) = &config.llm else {
        return Ok(None);
    };
    if mode == OperatingMode::Bootstrap {
        return Ok(None);
    }
    let client = LlmClient::new(llm).context("building model server client")?;
    tracing::info!(model = client.model(), "generative explanations enabled");
    Ok(Some(GenerativeExplainer::new(
        client,
        Explainer::new(config.explainer.clone()),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::io::Write;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["clausewise", "classify", "some text", "--bootstrap"]).unwrap();
        assert!(cli.bootstrap);
        assert!(matches!(cli.command, Command::Classify { json: false, .. }));
    }

    #[test]
    fn context_file_is_parsed() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"sources": ["glossary"], "relevant_info": ["Indemnify: compensate."]}}"#
        )
        .unwrap();
        let ctx = load_context(Some(file.path())).unwrap().unwrap();
        assert_eq!(ctx.relevant_info, vec!["Indemnify: compensate."]);
        assert!(load_context(None).unwrap().is_none());
    }

    #[test]
    fn no_llm_section_means_rules_only() {
        let config = AnalyzerConfig::default();
        assert!(
            generative_explainer(&config, OperatingMode::Normal)
                .unwrap()
                .is_none()
        );
    }
}
