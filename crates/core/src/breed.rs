//! Breed domain records.
//!
//! [`Breed`] and [`TemperamentRecord`] mirror the two warehouse dimensions.
//! [`ContextRow`] is the flattened breed + temperament join handed to the
//! LLM grounding step and the heuristic scorer.

use serde::{Deserialize, Serialize};

/// One row of the breeds dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Breed {
    pub breed_id: i64,
    pub breed_name: String,
    pub breed_group: Option<String>,
    pub size_category: Option<String>,
    pub avg_weight_kg: Option<f64>,
    pub avg_life_span_years: Option<f64>,
}

/// One row of the temperament dimension, keyed by breed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperamentRecord {
    pub breed_id: i64,
    pub family_suitability: Option<String>,
    /// Ordered trait names; stored comma-joined in the warehouse.
    pub traits: Vec<String>,
}

impl TemperamentRecord {
    pub fn total_traits(&self) -> usize {
        self.traits.len()
    }

    pub fn joined_traits(&self) -> String {
        self.traits.join(", ")
    }
}

/// One flattened breed + temperament row used as grounding input.
///
/// String fields are coalesced to `""` when the row is built; numeric
/// fields stay optional. Rows are ephemeral and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextRow {
    pub breed_name: String,
    pub breed_group: String,
    pub size_category: String,
    pub avg_weight_kg: Option<f64>,
    pub avg_life_span_years: Option<f64>,
    pub family_suitability: String,
    pub temperament_traits: String,
}
