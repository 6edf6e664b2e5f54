//! Manual query routing
//!
//! A classifier agent labels each free-text query, then plain code (not
//! model-side tool calling) dispatches to the matching specialist. Works
//! with models that cannot call tools at all.

pub mod label;
pub mod math;

pub use label::RoutingLabel;

use crate::agent::Agent;
use crate::error::Result;
use crate::llm::LlmClient;
use std::sync::Arc;
use tracing::info;

/// Classification-only system prompt; the classifier must never answer
pub const CLASSIFIER_SYSTEM_PROMPT: &str = "\
You are TeachAssist, a query router. Your only job is to classify the user query into ONE label.

Return exactly ONE of these labels (single word, uppercase):
MATH
ENGLISH
LANGUAGE
COMPSCI
GENERAL

Rules:
- MATH: equations, arithmetic, algebra, calculus, geometry, statistics, word problems
- ENGLISH: grammar, writing, comprehension, literature, rewriting, tone, summaries
- LANGUAGE: translation between languages, meaning in another language, bilingual phrasing
- COMPSCI: programming, code, debugging, algorithms, data structures, terminal, software engineering
- GENERAL: anything else

Do NOT answer the user. Only output the label.";

const ENGLISH_SYSTEM_PROMPT: &str = "\
You are an English assistant.
Fix grammar, improve clarity, and keep the original meaning.
When asked to fix grammar, return:
1) Corrected sentence
2) One-line explanation (short)
Do NOT call any tools. Return only text.";

const LANGUAGE_SYSTEM_PROMPT: &str = "\
You are a translation assistant.
Translate accurately. If the user asks for a specific target language, do it.
If formality matters, provide both informal and formal versions briefly.
Do NOT call any tools. Return only text.";

const COMPSCI_SYSTEM_PROMPT: &str = "\
You are a computer science assistant.
You write correct, clean code and explain briefly.
Do NOT call any tools. Return only text.";

const GENERAL_SYSTEM_PROMPT: &str = "\
You are a helpful general assistant.
Answer clearly and concisely.
Do NOT call any tools. Return only text.";

/// Orchestrator: classifier plus the four model-backed specialists.
/// The math specialist is deterministic and needs no agent.
pub struct Router {
    classifier: Agent,
    english: Agent,
    language: Agent,
    compsci: Agent,
    general: Agent,
}

impl Router {
    /// Build a router whose agents all share one LLM client
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self {
            classifier: Agent::new(
                "classifier",
                Arc::clone(&client),
                CLASSIFIER_SYSTEM_PROMPT,
            ),
            english: Agent::new("english", Arc::clone(&client), ENGLISH_SYSTEM_PROMPT),
            language: Agent::new("language", Arc::clone(&client), LANGUAGE_SYSTEM_PROMPT),
            compsci: Agent::new("compsci", Arc::clone(&client), COMPSCI_SYSTEM_PROMPT),
            general: Agent::new("general", client, GENERAL_SYSTEM_PROMPT),
        }
    }

    /// Classify a query into a routing label
    pub async fn classify(&self, query: &str) -> Result<RoutingLabel> {
        let raw = self.classifier.ask(query).await?;
        Ok(RoutingLabel::normalize(&raw))
    }

    /// Dispatch a query to the specialist for `label`.
    ///
    /// Specialist failures are converted into friendly error strings; the
    /// dispatcher itself never fails.
    pub async fn dispatch(&self, label: RoutingLabel, query: &str) -> String {
        info!("Routed to {} Assistant", label.assistant_name());
        match label {
            RoutingLabel::Math => math::math_assistant(query),
            RoutingLabel::English => self
                .english
                .ask(query)
                .await
                .unwrap_or_else(|e| format!("Error processing your English language query: {}", e)),
            RoutingLabel::Language => self
                .language
                .ask(query)
                .await
                .unwrap_or_else(|e| format!("Error processing your language query: {}", e)),
            RoutingLabel::CompSci => self
                .compsci
                .ask(query)
                .await
                .unwrap_or_else(|e| {
                    format!("Error processing your computer science query: {}", e)
                }),
            RoutingLabel::General => self
                .general
                .ask(query)
                .await
                .unwrap_or_else(|e| format!("Error processing your general query: {}", e)),
        }
    }

    /// Classify then dispatch in one step
    pub async fn route(&self, query: &str) -> Result<(RoutingLabel, String)> {
        let label = self.classify(query).await?;
        let answer = self.dispatch(label, query).await;
        Ok((label, answer))
    }
}
