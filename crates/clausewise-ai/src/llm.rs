//! Generative explanations through a local model server (Ollama chat API).
//!
//! Every generative call has a rule-based fallback: if the server is
//! unreachable, errors, or returns nothing, the caller still gets the
//! [`Explainer`] / [`Summarizer`] output.

use std::time::Duration;

use clausewise_core::config::LlmConfig;
use clausewise_core::{Clause, LegalContext};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::explainer::Explainer;
use crate::summarizer::Summarizer;

/// Clauses quoted in the overview prompt.
const OVERVIEW_SAMPLE_CLAUSES: usize = 5;
/// Characters quoted per sampled clause.
const OVERVIEW_SAMPLE_CHARS: usize = 100;

const EXPLAIN_SYSTEM: &str = "You explain legal clauses to people without legal training. \
Answer in plain, everyday English. Be brief but complete, define any legal term you cannot \
avoid, and focus on what the clause means in practice for the reader.";

const OVERVIEW_SYSTEM: &str = "You summarize legal documents for people without legal \
training. From a sample of the document's clauses, say what kind of document it is and what \
it is for, in a few plain sentences.";

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("model server returned {status}: {body}")]
    Server { status: u16, body: String },
    #[error("model returned an empty response")]
    Empty,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Non-streaming chat client.
pub struct LlmClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    temperature: f32,
}

impl LlmClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    /// One system + user exchange. Returns the trimmed reply.
    pub async fn chat(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            stream: false,
            options: ChatOptions {
                temperature: self.temperature,
            },
        };

        let url = self.chat_url();
        info!(url = %url, model = %self.model, "calling model server");
        let resp = self.client.post(&url).json(&request).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let reply: ChatResponse = resp.json().await?;
        let content = reply.message.content.trim();
        if content.is_empty() {
            return Err(LlmError::Empty);
        }
        Ok(content.to_string())
    }
}

/// User prompt for explaining one clause.
pub fn explain_prompt(clause_text: &str, context: Option<&LegalContext>) -> String {
    let mut prompt = format!("Legal clause:\n{clause_text}\n");
    if let Some(ctx) = context.filter(|c| !c.is_empty()) {
        prompt.push_str("\nRELEVANT LEGAL CONTEXT:\n");
        for info in &ctx.relevant_info {
            prompt.push_str(&format!("- {info}\n"));
        }
    }
    prompt.push_str("\nExplain this clause in plain English.");
    prompt
}

/// User prompt for a document overview, quoting the first few clauses.
pub fn overview_prompt(clauses: &[Clause]) -> String {
    let sample: Vec<String> = clauses
        .iter()
        .take(OVERVIEW_SAMPLE_CLAUSES)
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.preview(OVERVIEW_SAMPLE_CHARS)))
        .collect();
    format!(
        "Sample of the document's clauses:\n{}\n\nSummarize this document.",
        sample.join("\n")
    )
}

/// Explainer that asks the model first and falls back to the rules.
pub struct GenerativeExplainer {
    client: LlmClient,
    rules: Explainer,
    summarizer: Summarizer,
}

impl GenerativeExplainer {
    pub fn new(client: LlmClient, rules: Explainer) -> Self {
        Self {
            client,
            rules,
            summarizer: Summarizer,
        }
    }

    pub async fn explain(&self, clause_text: &str, context: Option<&LegalContext>) -> String {
        let prompt = explain_prompt(clause_text, context);
        match self.client.chat(EXPLAIN_SYSTEM, &prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "generative explanation failed, using rules");
                self.rules.explain(clause_text, context)
            }
        }
    }

    /// Free-form overview of the document. Falls back to the rule-based
    /// summary text.
    pub async fn summarize_overview(&self, clauses: &[Clause]) -> String {
        if clauses.is_empty() {
            return self.summarizer.summarize(clauses);
        }
        match self.client.chat(OVERVIEW_SYSTEM, &overview_prompt(clauses)).await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "generative overview failed, using rules");
                self.summarizer.summarize(clauses)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> LlmConfig {
        LlmConfig {
            base_url: base_url.to_string(),
            model: "llama3".to_string(),
            timeout_secs: 2,
            temperature: 0.2,
        }
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = LlmClient::new(&config("http://localhost:11434/")).unwrap();
        assert_eq!(client.chat_url(), "http://localhost:11434/api/chat");
        assert_eq!(client.model(), "llama3");
    }

    #[test]
    fn explain_prompt_without_context() {
        let prompt = explain_prompt("You shall indemnify us.", None);
        assert!(prompt.starts_with("Legal clause:\nYou shall indemnify us.\n"));
        assert!(!prompt.contains("RELEVANT LEGAL CONTEXT"));
    }

    #[test]
    fn explain_prompt_lists_context() {
        let mut ctx = LegalContext::empty();
        ctx.push("glossary", "Indemnify: compensate for loss.");
        ctx.push("glossary", "Hold harmless: no claims against.");
        let prompt = explain_prompt("You shall indemnify us.", Some(&ctx));
        assert!(prompt.contains(
            "RELEVANT LEGAL CONTEXT:\n- Indemnify: compensate for loss.\n- Hold harmless: no claims against.\n"
        ));
    }

    #[test]
    fn empty_context_is_omitted() {
        let ctx = LegalContext::empty();
        assert_eq!(explain_prompt("x", Some(&ctx)), explain_prompt("x", None));
    }

    #[test]
    fn overview_prompt_samples_first_clauses() {
        let clauses: Vec<Clause> = (0..7)
            .map(|i| Clause::new(format!("Clause number {i}. {}", "z".repeat(120)), 1, i))
            .collect();
        let prompt = overview_prompt(&clauses);
        assert!(prompt.contains("1. Clause number 0."));
        assert!(prompt.contains("5. Clause number 4."));
        assert!(!prompt.contains("Clause number 5"));
        assert!(prompt.contains("..."));
    }

    #[tokio::test]
    async fn unreachable_server_falls_back_to_rules() {
        // Port 9 (discard) is not an HTTP server.
        let client = LlmClient::new(&config("http://127.0.0.1:9")).unwrap();
        let explainer = GenerativeExplainer::new(client, Explainer::default());
        let text = "Either party may terminate this agreement with 30 days notice.";
        let out = explainer.explain(text, None).await;
        assert_eq!(out, Explainer::default().explain(text, None));
    }

    #[tokio::test]
    async fn overview_of_nothing_is_rule_summary() {
        let client = LlmClient::new(&config("http://127.0.0.1:9")).unwrap();
        let explainer = GenerativeExplainer::new(client, Explainer::default());
        assert_eq!(
            explainer.summarize_overview(&[]).await,
            clausewise_core::summary::EMPTY_DOCUMENT_SUMMARY
        );
    }
}
