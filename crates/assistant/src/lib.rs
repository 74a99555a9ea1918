//! The conversational breed finder.
//!
//! Holds the session history, assembles each turn's messages (system
//! prompt, dataset grounding context, prior turns), drives the chat
//! backend, and degrades to a deterministic dataset heuristic when the
//! model's quota runs out.

pub mod engine;
pub mod heuristic;
pub mod prompt;
pub mod session;

pub use engine::{FinderEngine, TurnContext, TurnOutcome, QUOTA_NOTICE};
pub use prompt::{CONVERSATION_STARTERS, SYSTEM_PROMPT};
pub use session::FinderSession;
