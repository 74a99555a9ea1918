//! Deterministic fallback suggestions.
//!
//! When the model quota is exhausted, a turn still has to produce
//! something useful. This module extracts a coarse intent from the user's
//! message and ranks the grounding rows against it. Same rows, same
//! message, same output.

use breedbox_core::breed::ContextRow;

/// Response when the current filters match nothing.
pub const EMPTY_DATASET_TEXT: &str =
    "I cannot suggest breeds because the dataset for the current filters is empty.";

const MAX_SUGGESTIONS: usize = 5;

const SMALL_HINTS: [&str; 4] = ["toy", "tiny", "small", "apartment"];
const LARGE_HINTS: [&str; 3] = ["big", "large", "giant"];
const ACTIVITY_HINTS: [&str; 8] = [
    "active", "run", "running", "hike", "hiking", "energetic", "sport", "agile",
];
const CALM_HINTS: [&str; 6] = ["calm", "relaxed", "low energy", "quiet", "easygoing", "laid-back"];
const FAMILY_HINTS: [&str; 4] = ["family", "kids", "children", "child"];
const GUARD_HINTS: [&str; 5] = ["guard", "protect", "watchdog", "protective", "alert"];

const ACTIVE_TRAITS: [&str; 3] = ["energetic", "active", "athletic"];
const CALM_TRAITS: [&str; 4] = ["calm", "gentle", "laid back", "quiet"];
const GUARD_TRAITS: [&str; 3] = ["protective", "alert", "confident"];

/// What the user's message asks for, as far as keyword matching can tell.
#[derive(Debug, Default, PartialEq, Eq)]
struct Intent {
    size_preference: Option<&'static str>,
    wants_active: bool,
    wants_calm: bool,
    wants_family: bool,
    wants_guard: bool,
    apartment: bool,
}

impl Intent {
    fn detect(text: &str) -> Self {
        let lower = text.to_lowercase();
        let size_preference = if SMALL_HINTS.iter().any(|h| lower.contains(h)) {
            Some("small")
        } else if lower.contains("medium") {
            Some("medium")
        } else if LARGE_HINTS.iter().any(|h| lower.contains(h)) {
            Some("large")
        } else {
            None
        };
        Self {
            size_preference,
            wants_active: ACTIVITY_HINTS.iter().any(|h| lower.contains(h)),
            wants_calm: CALM_HINTS.iter().any(|h| lower.contains(h)),
            wants_family: FAMILY_HINTS.iter().any(|h| lower.contains(h)),
            wants_guard: GUARD_HINTS.iter().any(|h| lower.contains(h)),
            apartment: lower.contains("apartment"),
        }
    }
}

fn score_row(intent: &Intent, row: &ContextRow) -> i32 {
    let size = row.size_category.to_lowercase();
    let traits = row.temperament_traits.to_lowercase();
    let mut score = 0;

    if let Some(pref) = intent.size_preference {
        if size.contains(pref) {
            score += 3;
        }
    }
    if intent.apartment && (size == "small" || size == "medium") {
        score += 2;
    }
    if intent.apartment && row.avg_weight_kg.is_some_and(|w| w <= 15.0) {
        score += 2;
    }
    if intent.wants_family {
        let family = row.family_suitability.to_lowercase();
        if family == "high" {
            score += 3;
        } else if family == "medium" {
            score += 2;
        }
    }
    if intent.wants_active && ACTIVE_TRAITS.iter().any(|t| traits.contains(t)) {
        score += 2;
    }
    if intent.wants_calm && CALM_TRAITS.iter().any(|t| traits.contains(t)) {
        score += 2;
    }
    if intent.wants_guard && GUARD_TRAITS.iter().any(|t| traits.contains(t)) {
        score += 2;
    }
    if row.avg_life_span_years.is_some_and(|y| y >= 12.0) {
        score += 1;
    }
    score
}

/// Rank the grounding rows against the user's message and render the top
/// matches. Rows that score zero are only used when nothing scores.
pub fn suggest(rows: &[ContextRow], user_text: &str) -> String {
    if rows.is_empty() {
        return EMPTY_DATASET_TEXT.to_string();
    }

    let intent = Intent::detect(user_text);
    let mut scored: Vec<(i32, &ContextRow)> =
        rows.iter().map(|row| (score_row(&intent, row), row)).collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.breed_name.cmp(&b.1.breed_name)));

    let any_matched = scored.first().is_some_and(|(score, _)| *score > 0);
    let top = scored
        .iter()
        .filter(|(score, _)| !any_matched || *score > 0)
        .take(MAX_SUGGESTIONS);

    let mut lines = vec![
        "I couldn't use the AI model due to quota limits. Based on your description, \
         here are heuristic suggestions grounded in the dataset:"
            .to_string(),
        String::new(),
    ];
    for (_, row) in top {
        lines.push(format!(
            "- {}: size={}, weight≈{}kg, lifespan≈{}y, family={}; temperament: {}",
            row.breed_name,
            row.size_category,
            fmt_opt(row.avg_weight_kg),
            fmt_opt(row.avg_life_span_years),
            row.family_suitability,
            row.temperament_traits,
        ));
    }
    lines.push(String::new());
    lines.push(
        "If you'd like, refine your preferences (home size, time for exercise, \
         shedding tolerance)."
            .to_string(),
    );
    lines.join("\n")
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
