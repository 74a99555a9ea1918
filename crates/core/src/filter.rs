//! Filter selections and weight-bound derivation.
//!
//! A [`FilterSelection`] is the raw user input; the SQL it compiles into
//! lives in the explorer crate. [`WeightBounds`] captures the observed
//! weight interval of the dataset and keeps requested ranges inside it.

use serde::{Deserialize, Serialize};

/// Raw user-selected filter values.
///
/// Empty vectors mean "no restriction" for that field. The weight range is
/// inclusive and expected to be pre-clamped via [`WeightBounds::clamp`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub breed_groups: Vec<String>,
    pub size_categories: Vec<String>,
    pub family_suitability: Vec<String>,
    pub weight_range: (f64, f64),
}

impl FilterSelection {
    /// An unrestricted selection spanning the observed weight bounds.
    pub fn unrestricted(bounds: &WeightBounds) -> Self {
        Self {
            weight_range: (bounds.low, bounds.high),
            ..Default::default()
        }
    }
}

/// Observed weight interval of the breeds dimension.
///
/// Invariant: `low <= high` and `low >= 0`, whatever the inputs were.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    pub low: f64,
    pub high: f64,
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self { low: 0.0, high: 100.0 }
    }
}

impl WeightBounds {
    /// Derive bounds from observed min/max weights.
    ///
    /// A missing minimum defaults to 0 and a missing maximum to 100.
    /// Inverted bounds swap, and a zero-width interval widens by one unit
    /// each way, floored at 0.
    pub fn from_observed(min: Option<f64>, max: Option<f64>) -> Self {
        let mut low = min.filter(|v| v.is_finite()).unwrap_or(0.0);
        let mut high = max.filter(|v| v.is_finite()).unwrap_or(100.0);

        if low > high {
            std::mem::swap(&mut low, &mut high);
        }
        if low == high {
            low = (low - 1.0).max(0.0);
            high += 1.0;
        }

        Self { low, high }
    }

    /// Clamp a requested range into these bounds.
    ///
    /// Non-finite endpoints fall back to the observed bounds, the same
    /// treatment derivation gives missing stats. Endpoints are ordered,
    /// clamped into `[0, max(high, 1)]`, and a degenerate result re-widens
    /// the same way derivation does.
    pub fn clamp(&self, low: f64, high: f64) -> (f64, f64) {
        let ceiling = self.high.max(1.0);
        let low = if low.is_finite() { low } else { self.low };
        let high = if high.is_finite() { high } else { self.high };
        let (mut low, mut high) = if low <= high { (low, high) } else { (high, low) };

        low = low.clamp(0.0, ceiling);
        high = high.clamp(0.0, ceiling);
        if low == high {
            low = (low - 1.0).max(0.0);
            high += 1.0;
        }

        (low, high)
    }
}
