//! Chat messages and the chat-backend trait.
//!
//! These are the value objects that flow through an assistant turn:
//! the engine assembles [`ChatMessage`]s, a [`ChatClient`] turns them into
//! a response, either complete or as a stream of text fragments.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::ChatError;

/// The role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// Grounding and instructions
    System,
    /// The end user
    User,
    /// The model
    Assistant,
}

/// A single role-tagged message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: String,

    /// Who sent this message
    pub role: ChatRole,

    /// The text content
    pub content: String,

    /// Timestamp
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create a new system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Create a new user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create a new assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }
}

/// A stream of response text fragments.
///
/// The channel closes when the response is complete; an `Err` item ends
/// the stream early and no further items follow it.
pub type FragmentStream = mpsc::Receiver<Result<String, ChatError>>;

/// The chat-backend trait.
///
/// Every LLM backend implements this. The assistant engine calls
/// `complete()` or `stream()` without knowing which backend is in use.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// A human-readable name for this backend (e.g., "openai").
    fn name(&self) -> &str;

    /// Send the messages and get the complete response text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;

    /// Send the messages and get a stream of response fragments.
    ///
    /// Default implementation calls `complete()` and delivers the result
    /// as a single fragment, for backends without native streaming.
    async fn stream(&self, messages: &[ChatMessage]) -> Result<FragmentStream, ChatError> {
        let text = self.complete(messages).await?;
        let (tx, rx) = mpsc::channel(1);
        let _ = tx.send(Ok(text)).await;
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OneShot;

    #[async_trait]
    impl ChatClient for OneShot {
        fn name(&self) -> &str {
            "oneshot"
        }

        async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, ChatError> {
            Ok("whole response".into())
        }
    }

    #[test]
    fn constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, ChatRole::System);
        assert_eq!(ChatMessage::user("u").role, ChatRole::User);
        assert_eq!(ChatMessage::assistant("a").role, ChatRole::Assistant);
    }

    #[test]
    fn messages_get_unique_ids() {
        let a = ChatMessage::user("hello");
        let b = ChatMessage::user("hello");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn roles_serialize_lowercase() {
        let json = serde_json::to_string(&ChatRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[tokio::test]
    async fn default_stream_yields_one_fragment_then_closes() {
        let client = OneShot;
        let mut rx = client.stream(&[ChatMessage::user("hi")]).await.unwrap();
        let first = rx.recv().await.unwrap().unwrap();
        assert_eq!(first, "whole response");
        assert!(rx.recv().await.is_none());
    }
}
