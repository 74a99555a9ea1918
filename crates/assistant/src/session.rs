//! Conversation session state.

use breedbox_core::chat::{ChatMessage, ChatRole};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// One conversation with the breed finder.
///
/// Holds only user and assistant turns. System messages (prompt, dataset
/// context) are rebuilt per turn and never stored, so the context always
/// reflects the current filters.
pub struct FinderSession {
    /// Unique session ID
    pub id: String,

    /// When this session was created
    pub created_at: DateTime<Utc>,

    /// When this session last changed
    pub updated_at: DateTime<Utc>,

    history: Vec<ChatMessage>,
}

impl FinderSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            history: Vec::new(),
        }
    }

    /// The stored user/assistant turns, oldest first.
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.push(ChatMessage::assistant(content));
    }

    /// Drop all turns but keep the session ID.
    pub fn reset(&mut self) {
        self.history.clear();
        self.updated_at = Utc::now();
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    fn push(&mut self, message: ChatMessage) {
        debug_assert!(message.role != ChatRole::System);
        self.history.push(message);
        self.updated_at = Utc::now();
    }
}

impl Default for FinderSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_with_an_id() {
        let session = FinderSession::new();
        assert!(session.is_empty());
        assert!(!session.id.is_empty());
    }

    #[test]
    fn turns_accumulate_in_order() {
        let mut session = FinderSession::new();
        session.push_user("first");
        session.push_assistant("second");
        session.push_user("third");

        let roles: Vec<ChatRole> = session.history().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![ChatRole::User, ChatRole::Assistant, ChatRole::User]);
        assert_eq!(session.history()[2].content, "third");
    }

    #[test]
    fn reset_clears_turns_but_keeps_identity() {
        let mut session = FinderSession::new();
        let id = session.id.clone();
        session.push_user("hello");
        session.reset();
        assert!(session.is_empty());
        assert_eq!(session.id, id);
    }
}
