//! Filter option discovery and predicate compilation.

use breedbox_core::error::DataError;
use breedbox_core::executor::{QueryExecutor, TableNames};
use breedbox_core::filter::{FilterSelection, WeightBounds};
use tracing::debug;

use crate::predicate::Predicate;

/// Everything a front end needs to populate its filter widgets.
#[derive(Debug, Clone, Default)]
pub struct FilterCatalog {
    pub breed_groups: Vec<String>,
    pub size_categories: Vec<String>,
    pub family_suitability: Vec<String>,
    pub weight_bounds: WeightBounds,
}

impl FilterCatalog {
    /// Discover selectable options and the observed weight bounds.
    ///
    /// Empty tables yield empty option sets and the default bounds;
    /// executor failures propagate untouched.
    pub async fn load(
        executor: &dyn QueryExecutor,
        tables: &TableNames,
    ) -> Result<Self, DataError> {
        let breed_groups = distinct_options(executor, &tables.breeds, "breed_group").await?;
        let size_categories = distinct_options(executor, &tables.breeds, "size_category").await?;
        let family_suitability =
            distinct_options(executor, &tables.temperament, "family_suitability").await?;
        let weight_bounds = observed_weight_bounds(executor, &tables.breeds).await?;

        debug!(
            groups = breed_groups.len(),
            sizes = size_categories.len(),
            families = family_suitability.len(),
            "Filter catalog loaded"
        );

        Ok(Self {
            breed_groups,
            size_categories,
            family_suitability,
            weight_bounds,
        })
    }

    /// An unrestricted selection spanning the observed bounds.
    pub fn unrestricted(&self) -> FilterSelection {
        FilterSelection::unrestricted(&self.weight_bounds)
    }
}

/// Distinct non-null, non-empty values of one column, ascending.
async fn distinct_options(
    executor: &dyn QueryExecutor,
    table: &str,
    column: &str,
) -> Result<Vec<String>, DataError> {
    let sql = format!(
        "select distinct {column} from {table} \
         where {column} is not null and {column} != '' \
         order by {column}"
    );
    Ok(executor.run_query(&sql).await?.first_column_text())
}

/// Observed min/max of non-null weights.
async fn observed_weight_bounds(
    executor: &dyn QueryExecutor,
    table: &str,
) -> Result<WeightBounds, DataError> {
    let sql = format!(
        "select min(avg_weight_kg) as min_w, max(avg_weight_kg) as max_w \
         from {table} where avg_weight_kg is not null"
    );
    let result = executor.run_query(&sql).await?;
    let (min, max) = match result.rows.first() {
        Some(row) => (row.real("min_w"), row.real("max_w")),
        None => (None, None),
    };
    Ok(WeightBounds::from_observed(min, max))
}

/// Compiled predicates for one selection.
#[derive(Debug, Clone)]
pub struct CompiledFilters {
    /// Restricts the breeds dimension; always carries the weight clause.
    pub breeds: Predicate,
    /// Restricts the temperament dimension; empty when no suitability
    /// level is selected.
    pub temperament: Predicate,
    /// The selection these predicates were compiled from.
    pub selection: FilterSelection,
}

/// Compile a selection into structured predicates.
///
/// The weight clause is always present, so even an otherwise-empty
/// selection compiles to a real restriction on the breeds dimension.
pub fn compile(selection: &FilterSelection) -> CompiledFilters {
    let (low, high) = selection.weight_range;

    let breeds = Predicate::new()
        .in_list("breed_group", &selection.breed_groups)
        .in_list("size_category", &selection.size_categories)
        .between("avg_weight_kg", low, high);

    let temperament = Predicate::new().in_list("family_suitability", &selection.family_suitability);

    CompiledFilters {
        breeds,
        temperament,
        selection: selection.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use breedbox_core::table::{Row, Table, Value};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Pops scripted tables in order and records every query it sees.
    struct ScriptedExecutor {
        seen: Mutex<Vec<String>>,
        responses: Mutex<VecDeque<Table>>,
    }

    impl ScriptedExecutor {
        fn new(responses: Vec<Table>) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                responses: Mutex::new(responses.into()),
            }
        }

        fn seen(&self) -> Vec<String> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryExecutor for ScriptedExecutor {
        async fn run_query(&self, sql: &str) -> Result<Table, DataError> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(self
                .responses
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected extra query"))
        }
    }

    fn option_table(column: &str, values: &[&str]) -> Table {
        let mut table = Table::new([column]);
        for value in values {
            table.push(Row::new().with(column, Value::text(*value)));
        }
        table
    }

    fn stats_table(min: Option<f64>, max: Option<f64>) -> Table {
        let mut table = Table::new(["min_w", "max_w"]);
        table.push(
            Row::new()
                .with("min_w", min.map_or(Value::Null, Value::Real))
                .with("max_w", max.map_or(Value::Null, Value::Real)),
        );
        table
    }

    #[tokio::test]
    async fn catalog_loads_options_and_bounds() {
        let executor = ScriptedExecutor::new(vec![
            option_table("breed_group", &["Hound", "Toy"]),
            option_table("size_category", &["Large", "Small"]),
            option_table("family_suitability", &["High", "Low"]),
            stats_table(Some(4.0), Some(45.0)),
        ]);

        let catalog = FilterCatalog::load(&executor, &TableNames::default())
            .await
            .unwrap();

        assert_eq!(catalog.breed_groups, vec!["Hound", "Toy"]);
        assert_eq!(catalog.size_categories, vec!["Large", "Small"]);
        assert_eq!(catalog.family_suitability, vec!["High", "Low"]);
        assert_eq!(catalog.weight_bounds, WeightBounds { low: 4.0, high: 45.0 });

        let seen = executor.seen();
        assert_eq!(seen.len(), 4);
        assert!(seen[0].contains("select distinct breed_group from dim_breeds"));
        assert!(seen[0].contains("breed_group is not null and breed_group != ''"));
        assert!(seen[2].contains("from dim_temperament"));
        assert!(seen[3].contains("min(avg_weight_kg) as min_w"));
    }

    #[tokio::test]
    async fn null_stats_fall_back_to_default_bounds() {
        let executor = ScriptedExecutor::new(vec![
            option_table("breed_group", &[]),
            option_table("size_category", &[]),
            option_table("family_suitability", &[]),
            stats_table(None, None),
        ]);

        let catalog = FilterCatalog::load(&executor, &TableNames::default())
            .await
            .unwrap();

        assert!(catalog.breed_groups.is_empty());
        assert_eq!(catalog.weight_bounds, WeightBounds { low: 0.0, high: 100.0 });
    }

    #[test]
    fn full_selection_compiles_in_field_order() {
        let selection = FilterSelection {
            breed_groups: vec!["Toy".into(), "Working".into()],
            size_categories: vec!["Small".into()],
            family_suitability: vec!["High".into()],
            weight_range: (2.0, 20.0),
        };
        let compiled = compile(&selection);

        assert_eq!(
            compiled.breeds.render("b"),
            "b.breed_group in ('Toy','Working') and b.size_category in ('Small') \
             and b.avg_weight_kg between 2 and 20"
        );
        assert_eq!(
            compiled.temperament.render_fragment("t"),
            "and t.family_suitability in ('High')"
        );
    }

    #[test]
    fn empty_selection_still_restricts_weight() {
        let selection = FilterSelection {
            weight_range: (0.0, 100.0),
            ..FilterSelection::default()
        };
        let compiled = compile(&selection);

        assert_eq!(compiled.breeds.render("b"), "b.avg_weight_kg between 0 and 100");
        assert!(compiled.temperament.is_empty());
        assert_eq!(compiled.temperament.render_fragment("t"), "");
    }
}
