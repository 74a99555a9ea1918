//! LLM chat backends for Breedbox.
//!
//! One real backend (OpenAI-compatible) plus a null backend that stands in
//! when no credentials exist, so the assistant engine always holds a
//! client and surfaces configuration problems through its normal outcome
//! path instead of at construction time.

use std::sync::Arc;

use breedbox_config::LlmConfig;
use breedbox_core::chat::ChatClient;
use breedbox_core::error::ChatError;
use tracing::warn;

pub mod openai;
pub mod unconfigured;

pub use openai::OpenAiChatClient;
pub use unconfigured::UnconfiguredChat;

/// Build the configured chat client, or the unconfigured stub when the
/// config carries no usable key.
pub fn client_from_config(config: &LlmConfig) -> Arc<dyn ChatClient> {
    match OpenAiChatClient::from_config(config) {
        Ok(client) => Arc::new(client),
        Err(ChatError::NotConfigured(reason)) => {
            warn!("Chat backend not configured: {reason}");
            Arc::new(UnconfiguredChat::new(reason))
        }
        Err(e) => {
            warn!("Chat backend unusable: {e}");
            Arc::new(UnconfiguredChat::new(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_builds_the_stub() {
        let config = LlmConfig::default();
        let client = client_from_config(&config);
        assert_eq!(client.name(), "unconfigured");
    }

    #[test]
    fn present_key_builds_the_real_client() {
        let config = LlmConfig {
            api_key: Some("sk-test".into()),
            ..LlmConfig::default()
        };
        let client = client_from_config(&config);
        assert_eq!(client.name(), "openai");
    }
}
