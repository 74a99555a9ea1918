//! Null chat backend used when no API credentials are configured.

use async_trait::async_trait;
use breedbox_core::chat::{ChatClient, ChatMessage};
use breedbox_core::error::ChatError;

/// Stands in for a real backend so the assistant engine can report the
/// configuration problem as a normal turn outcome.
pub struct UnconfiguredChat {
    reason: String,
}

impl UnconfiguredChat {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ChatClient for UnconfiguredChat {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
        Err(ChatError::NotConfigured(self.reason.clone()))
    }
}
