//! The turn engine.
//!
//! A turn takes the user's message, streams a model response grounded in
//! the current dataset context, and degrades in a fixed order: quota
//! exhaustion gets heuristic suggestions, transient failures get one
//! non-streaming retry, configuration problems get a clear failure text.

use std::sync::Arc;

use breedbox_core::breed::ContextRow;
use breedbox_core::chat::{ChatClient, ChatMessage};
use breedbox_core::error::{ChatError, DataError};
use breedbox_core::executor::{QueryExecutor, TableNames};
use breedbox_explorer::{build_context, render_context_text, CompiledFilters};
use serde::Serialize;
use tracing::{debug, warn};

use crate::heuristic;
use crate::prompt::SYSTEM_PROMPT;
use crate::session::FinderSession;

/// Notice shown alongside heuristic suggestions.
pub const QUOTA_NOTICE: &str = "Model quota exceeded. Showing heuristic suggestions instead.";

/// The dataset grounding for one turn: the raw rows (for the heuristic)
/// and their rendered text form (for the model).
pub struct TurnContext {
    pub rows: Vec<ContextRow>,
    pub text: String,
}

impl TurnContext {
    pub fn from_rows(rows: Vec<ContextRow>) -> Self {
        let text = render_context_text(&rows);
        Self { rows, text }
    }

    /// Query the warehouse for the rows matching the compiled filters.
    pub async fn load(
        executor: &dyn QueryExecutor,
        tables: &TableNames,
        filters: &CompiledFilters,
    ) -> Result<Self, DataError> {
        let rows = build_context(executor, tables, filters).await?;
        Ok(Self::from_rows(rows))
    }
}

/// How a turn ended and what text it produced.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// The model streamed a response.
    Streamed { text: String },
    /// The quota ran out; heuristic suggestions instead.
    Fallback { text: String, notice: String },
    /// Streaming failed but a non-streaming retry succeeded.
    Retried { text: String },
    /// No response could be produced.
    Failed { text: String },
}

impl TurnOutcome {
    pub fn text(&self) -> &str {
        match self {
            Self::Streamed { text }
            | Self::Fallback { text, .. }
            | Self::Retried { text }
            | Self::Failed { text } => text,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Streamed { .. } => "streamed",
            Self::Fallback { .. } => "fallback",
            Self::Retried { .. } => "retried",
            Self::Failed { .. } => "failed",
        }
    }
}

/// Drives turns against a chat backend.
pub struct FinderEngine {
    chat: Arc<dyn ChatClient>,
}

impl FinderEngine {
    pub fn new(chat: Arc<dyn ChatClient>) -> Self {
        Self { chat }
    }

    /// Run one turn. Fragments are delivered to `on_fragment` as they
    /// arrive; the full text comes back in the outcome. The user turn is
    /// always recorded; the assistant turn only when one was produced.
    pub async fn run_turn(
        &self,
        session: &mut FinderSession,
        context: &TurnContext,
        user_text: &str,
        mut on_fragment: impl FnMut(&str),
    ) -> TurnOutcome {
        session.push_user(user_text);

        let mut messages = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::system(context.text.clone()),
        ];
        messages.extend_from_slice(session.history());

        let outcome = match self.chat.stream(&messages).await {
            Ok(mut fragments) => {
                let mut text = String::new();
                let mut failure = None;
                while let Some(item) = fragments.recv().await {
                    match item {
                        Ok(fragment) => {
                            on_fragment(&fragment);
                            text.push_str(&fragment);
                        }
                        Err(e) => {
                            // Partial text is discarded; the recovery path
                            // produces a complete response on its own.
                            failure = Some(e);
                            break;
                        }
                    }
                }
                match failure {
                    None => TurnOutcome::Streamed { text },
                    Some(e) => self.recover(e, &messages, context, user_text).await,
                }
            }
            Err(e) => self.recover(e, &messages, context, user_text).await,
        };

        match &outcome {
            TurnOutcome::Streamed { text }
            | TurnOutcome::Fallback { text, .. }
            | TurnOutcome::Retried { text } => session.push_assistant(text.clone()),
            TurnOutcome::Failed { .. } => {}
        }
        debug!(outcome = outcome.label(), "Finder turn complete");
        outcome
    }

    async fn recover(
        &self,
        error: ChatError,
        messages: &[ChatMessage],
        context: &TurnContext,
        user_text: &str,
    ) -> TurnOutcome {
        match error {
            ChatError::QuotaExceeded => {
                warn!("Model quota exceeded, falling back to heuristic suggestions");
                TurnOutcome::Fallback {
                    text: heuristic::suggest(&context.rows, user_text),
                    notice: QUOTA_NOTICE.to_string(),
                }
            }
            ChatError::NotConfigured(reason) => TurnOutcome::Failed {
                text: format!(
                    "The assistant is not configured: {reason}. Set OPENAI_API_KEY or \
                     add an [llm] api_key to the config file."
                ),
            },
            ChatError::Unavailable(reason) => TurnOutcome::Failed {
                text: format!("The assistant backend is unavailable: {reason}."),
            },
            ChatError::Transient(reason) => {
                warn!("Streaming failed ({reason}), retrying without streaming");
                match self.chat.complete(messages).await {
                    Ok(text) => TurnOutcome::Retried { text },
                    Err(e) => TurnOutcome::Failed {
                        text: format!("Failed to get a response from the model: {e}"),
                    },
                }
            }
        }
    }
}
