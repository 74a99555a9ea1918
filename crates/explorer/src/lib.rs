//! Filter compilation, grounding-context assembly, and dataset insights.
//!
//! Everything here talks to the warehouse through the
//! [`breedbox_core::QueryExecutor`] trait and renders SQL against injected
//! table names. No connection handling, no caching policy.

pub mod context;
pub mod filters;
pub mod insights;
pub mod predicate;

pub use context::{
    build_context, render_context_text, EMPTY_CONTEXT_TEXT, MAX_CONTEXT_ROWS, MAX_RENDERED_ROWS,
};
pub use filters::{compile, CompiledFilters, FilterCatalog};
pub use insights::{
    lifespan_leaders, size_distribution, trait_frequency, LifespanLeader, SizeBucket, TraitCount,
};
pub use predicate::{quote_literal, Condition, Predicate};
