//! Scenario generation: prompt construction, the completion call and
//! parsing of the model's answer into scenario drafts.

mod client;
pub mod parser;
pub mod prompts;

use async_trait::async_trait;
use tracing::info;

pub use client::AnthropicClient;
pub use parser::{ParseError, parse_scenarios};

use crate::error::AppError;
use crate::models::{Platform, ScenarioDraft};

/// A text completion backend.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Send one system/user prompt pair and return the model's text answer.
    async fn complete(&self, system: &str, user: &str) -> Result<String, CompletionError>;
}

/// Completion backend errors.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("ANTHROPIC_API_KEY is not configured")]
    MissingApiKey,

    #[error("Completion request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Completion API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("No text content in completion response")]
    NoTextContent,
}

impl From<CompletionError> for AppError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::MissingApiKey => AppError::Configuration(err.to_string()),
            other => AppError::Generation(other.to_string()),
        }
    }
}

impl From<ParseError> for AppError {
    fn from(err: ParseError) -> Self {
        AppError::Generation(format!("Failed to parse LLM response: {}", err))
    }
}

/// Ask the provider for scenarios covering a PRD and parse them.
///
/// Nothing is persisted here; a failure leaves stored scenarios untouched.
pub async fn generate_scenarios(
    provider: &dyn CompletionProvider,
    prd_content: &str,
    platform: Platform,
) -> Result<Vec<ScenarioDraft>, AppError> {
    let system = prompts::system_prompt();
    let user = prompts::user_prompt(prd_content, platform);

    info!(
        platform = %platform,
        prd_chars = prd_content.chars().count(),
        "Requesting scenario generation"
    );

    let raw = provider.complete(&system, &user).await?;
    let drafts = parse_scenarios(&raw)?;

    info!(scenarios = drafts.len(), "Parsed generated scenarios");
    Ok(drafts)
}
