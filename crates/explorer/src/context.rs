//! Grounding context assembly.
//!
//! Builds the bounded breed + temperament join for the current filters and
//! renders it as the line-oriented text block handed to the LLM as a
//! system message. Row text is the only dataset the model is allowed to
//! answer from.

use breedbox_core::breed::ContextRow;
use breedbox_core::error::DataError;
use breedbox_core::executor::{QueryExecutor, TableNames};
use breedbox_core::table::Row;
use tracing::debug;

use crate::filters::CompiledFilters;

/// Hard cap on rows pulled from the warehouse per context build.
pub const MAX_CONTEXT_ROWS: usize = 300;

/// Data lines actually rendered into the prompt text.
pub const MAX_RENDERED_ROWS: usize = 80;

/// Fixed text for an empty filtered set.
pub const EMPTY_CONTEXT_TEXT: &str = "No rows matched the current filters.";

/// Fetch the flattened grounding rows for the current filters.
///
/// Rows come back sorted by breed name with string fields coalesced to
/// `""`, capped at [`MAX_CONTEXT_ROWS`].
pub async fn build_context(
    executor: &dyn QueryExecutor,
    tables: &TableNames,
    filters: &CompiledFilters,
) -> Result<Vec<ContextRow>, DataError> {
    let sql = context_query(tables, filters);
    let result = executor.run_query(&sql).await?;
    let rows: Vec<ContextRow> = result.rows.iter().map(ingest_row).collect();
    debug!(rows = rows.len(), "Grounding context built");
    Ok(rows)
}

/// The bounded join query.
///
/// String nulls coalesce in SQL; numeric fields stay nullable for the
/// typed ingestion step. The temperament predicate renders against the
/// `t` alias used inside the CTE.
fn context_query(tables: &TableNames, filters: &CompiledFilters) -> String {
    format!(
        r#"
        with base as (
            select b.breed_id, b.breed_name, b.breed_group, b.size_category,
                   b.avg_weight_kg, b.avg_life_span_years
            from {breeds} b
            where {breed_predicate}
        ), temp as (
            select t.breed_id,
                   t.family_suitability,
                   t.traits as temperament_traits
            from {temperament} t
            where 1=1 {temperament_fragment}
        )
        select b.breed_name,
               coalesce(b.breed_group, '') as breed_group,
               coalesce(b.size_category, '') as size_category,
               b.avg_weight_kg,
               b.avg_life_span_years,
               coalesce(temp.family_suitability, '') as family_suitability,
               coalesce(temp.temperament_traits, '') as temperament_traits
        from base b
        left join temp on temp.breed_id = b.breed_id
        order by b.breed_name
        limit {limit}
        "#,
        breeds = tables.breeds,
        temperament = tables.temperament,
        breed_predicate = filters.breeds.render("b"),
        temperament_fragment = filters.temperament.render_fragment("t"),
        limit = MAX_CONTEXT_ROWS,
    )
}

/// Coalesce one tabular row into a fixed-shape [`ContextRow`].
fn ingest_row(row: &Row) -> ContextRow {
    ContextRow {
        breed_name: row.text("breed_name").unwrap_or_default().to_string(),
        breed_group: row.text("breed_group").unwrap_or_default().to_string(),
        size_category: row.text("size_category").unwrap_or_default().to_string(),
        avg_weight_kg: row.real("avg_weight_kg"),
        avg_life_span_years: row.real("avg_life_span_years"),
        family_suitability: row.text("family_suitability").unwrap_or_default().to_string(),
        temperament_traits: row.text("temperament_traits").unwrap_or_default().to_string(),
    }
}

/// Render rows as the grounding text block.
///
/// Two header lines, at most [`MAX_RENDERED_ROWS`] data lines, and a
/// truncation notice when rows were held back.
pub fn render_context_text(rows: &[ContextRow]) -> String {
    if rows.is_empty() {
        return EMPTY_CONTEXT_TEXT.to_string();
    }

    let mut lines = vec![
        "Dataset excerpt for grounding (do not hallucinate beyond this):".to_string(),
        "Columns: breed | group | size | avg_weight_kg | avg_lifespan_years | family_suitability | temperament_traits"
            .to_string(),
    ];

    for row in rows.iter().take(MAX_RENDERED_ROWS) {
        lines.push(format!(
            "- breed: {}; group: {}; size: {}; avg_weight_kg: {}; avg_lifespan_years: {}; family_suitability: {}; temperament_traits: {}",
            row.breed_name,
            row.breed_group,
            row.size_category,
            fmt_opt(row.avg_weight_kg),
            fmt_opt(row.avg_life_span_years),
            row.family_suitability,
            row.temperament_traits,
        ));
    }

    if rows.len() > MAX_RENDERED_ROWS {
        lines.push(format!(
            "… and {} more rows not shown",
            rows.len() - MAX_RENDERED_ROWS
        ));
    }

    lines.join("\n")
}

/// Missing numerics render as empty, matching the coalesced string fields.
fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
