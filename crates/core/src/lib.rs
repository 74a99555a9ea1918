//! # Breedbox Core
//!
//! Domain types, traits, and error definitions for the Breedbox dog-breed
//! dataset explorer. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The two external seams of the system are defined as traits here:
//! [`QueryExecutor`] for warehouse access and [`ChatClient`] for LLM
//! backends. Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod breed;
pub mod chat;
pub mod error;
pub mod executor;
pub mod filter;
pub mod table;

// Re-export key types at crate root for ergonomics
pub use breed::{Breed, ContextRow, TemperamentRecord};
pub use chat::{ChatClient, ChatMessage, ChatRole, FragmentStream};
pub use error::{ChatError, DataError};
pub use executor::{QueryExecutor, TableNames};
pub use filter::{FilterSelection, WeightBounds};
pub use table::{Row, Table, Value};
