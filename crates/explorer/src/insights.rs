//! Aggregate insight queries over the filtered dataset.
//!
//! Three read-only views: lifespan leaders, size distribution, and trait
//! frequency. All of them honor the same compiled filters the context
//! builder uses, so the numbers line up with what the assistant sees.

use std::collections::HashMap;

use breedbox_core::error::DataError;
use breedbox_core::executor::{QueryExecutor, TableNames};

use crate::filters::CompiledFilters;

/// Most frequent traits reported per call.
const TOP_TRAITS: usize = 15;

/// One breed with its predicted lifespan.
#[derive(Debug, Clone, PartialEq)]
pub struct LifespanLeader {
    pub breed_name: String,
    pub avg_life_span_years: f64,
}

/// Breed count for one size category.
#[derive(Debug, Clone, PartialEq)]
pub struct SizeBucket {
    pub size_category: String,
    pub breed_count: i64,
}

/// Occurrence count of one normalized temperament trait.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitCount {
    pub trait_name: String,
    pub occurrences: usize,
}

/// Top ten breeds by predicted lifespan, longest first, ties by name.
pub async fn lifespan_leaders(
    executor: &dyn QueryExecutor,
    tables: &TableNames,
    filters: &CompiledFilters,
) -> Result<Vec<LifespanLeader>, DataError> {
    let sql = format!(
        "select b.breed_name, b.avg_life_span_years \
         from {breeds} b \
         where {predicate} and b.avg_life_span_years is not null \
         order by b.avg_life_span_years desc, b.breed_name \
         limit 10",
        breeds = tables.breeds,
        predicate = filters.breeds.render("b"),
    );
    let result = executor.run_query(&sql).await?;
    Ok(result
        .rows
        .iter()
        .filter_map(|row| {
            Some(LifespanLeader {
                breed_name: row.text("breed_name")?.to_string(),
                avg_life_span_years: row.real("avg_life_span_years")?,
            })
        })
        .collect())
}

/// Breed counts per size category, most common first.
pub async fn size_distribution(
    executor: &dyn QueryExecutor,
    tables: &TableNames,
    filters: &CompiledFilters,
) -> Result<Vec<SizeBucket>, DataError> {
    let sql = format!(
        "select b.size_category, count(*) as breed_count \
         from {breeds} b \
         where {predicate} \
         group by b.size_category \
         order by breed_count desc",
        breeds = tables.breeds,
        predicate = filters.breeds.render("b"),
    );
    let result = executor.run_query(&sql).await?;
    Ok(result
        .rows
        .iter()
        .map(|row| SizeBucket {
            size_category: row.text("size_category").unwrap_or_default().to_string(),
            breed_count: row.integer("breed_count").unwrap_or(0),
        })
        .collect())
}

/// Most common temperament traits across the filtered breeds.
///
/// Trait lists come back comma-joined; splitting, trimming, and
/// lower-casing happen here rather than in SQL. Ordered by occurrences
/// descending, ties by trait name.
pub async fn trait_frequency(
    executor: &dyn QueryExecutor,
    tables: &TableNames,
    filters: &CompiledFilters,
) -> Result<Vec<TraitCount>, DataError> {
    let sql = format!(
        "with base as ( \
             select b.breed_id \
             from {breeds} b \
             where {predicate} \
         ) \
         select tt.traits \
         from {temperament} tt \
         join base using (breed_id) \
         where tt.total_traits > 0 {fragment}",
        breeds = tables.breeds,
        temperament = tables.temperament,
        predicate = filters.breeds.render("b"),
        fragment = filters.temperament.render_fragment("tt"),
    );
    let result = executor.run_query(&sql).await?;

    let mut counts: HashMap<String, usize> = HashMap::new();
    for row in &result.rows {
        let Some(traits) = row.text("traits") else {
            continue;
        };
        for piece in traits.split(',') {
            let normalized = piece.trim().to_lowercase();
            if !normalized.is_empty() {
                *counts.entry(normalized).or_default() += 1;
            }
        }
    }

    let mut out: Vec<TraitCount> = counts
        .into_iter()
        .map(|(trait_name, occurrences)| TraitCount {
            trait_name,
            occurrences,
        })
        .collect();
    out.sort_by(|a, b| {
        b.occurrences
            .cmp(&a.occurrences)
            .then_with(|| a.trait_name.cmp(&b.trait_name))
    });
    out.truncate(TOP_TRAITS);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::compile;
    use async_trait::async_trait;
    use breedbox_core::filter::FilterSelection;
    use breedbox_core::table::{Row, Table, Value};
    use std::sync::Mutex;

    struct RecordingExecutor {
        seen: Mutex<Vec<String>>,
        response: Table,
    }

    impl RecordingExecutor {
        fn new(response: Table) -> Self {
            Self {
                seen: Mutex::new(Vec::new()),
                response,
            }
        }

        fn last_sql(&self) -> String {
            self.seen.lock().unwrap().last().unwrap().clone()
        }
    }

    #[async_trait]
    impl QueryExecutor for RecordingExecutor {
        async fn run_query(&self, sql: &str) -> Result<Table, DataError> {
            self.seen.lock().unwrap().push(sql.to_string());
            Ok(self.response.clone())
        }
    }

    fn traits_table(values: &[&str]) -> Table {
        let mut table = Table::new(["traits"]);
        for value in values {
            table.push(Row::new().with("traits", Value::text(*value)));
        }
        table
    }

    fn unrestricted() -> CompiledFilters {
        compile(&FilterSelection {
            weight_range: (0.0, 100.0),
            ..FilterSelection::default()
        })
    }

    #[tokio::test]
    async fn lifespan_query_excludes_null_lifespans() {
        let executor = RecordingExecutor::new(Table::default());
        let leaders = lifespan_leaders(&executor, &TableNames::default(), &unrestricted())
            .await
            .unwrap();
        assert!(leaders.is_empty());

        let sql = executor.last_sql();
        assert!(sql.contains("b.avg_life_span_years is not null"));
        assert!(sql.contains("order by b.avg_life_span_years desc, b.breed_name"));
        assert!(sql.contains("limit 10"));
    }

    #[tokio::test]
    async fn size_distribution_maps_null_category_to_empty() {
        let mut table = Table::new(["size_category", "breed_count"]);
        table.push(
            Row::new()
                .with("size_category", Value::Null)
                .with("breed_count", Value::Integer(4)),
        );
        let executor = RecordingExecutor::new(table);

        let buckets = size_distribution(&executor, &TableNames::default(), &unrestricted())
            .await
            .unwrap();
        assert_eq!(buckets, vec![SizeBucket { size_category: "".into(), breed_count: 4 }]);
        assert!(executor.last_sql().contains("group by b.size_category"));
    }

    #[tokio::test]
    async fn trait_frequency_normalizes_and_ranks() {
        let executor = RecordingExecutor::new(traits_table(&[
            "Calm, Friendly",
            " calm , ALERT",
            "Friendly, calm",
        ]));

        let counts = trait_frequency(&executor, &TableNames::default(), &unrestricted())
            .await
            .unwrap();

        assert_eq!(counts[0], TraitCount { trait_name: "calm".into(), occurrences: 3 });
        assert_eq!(counts[1], TraitCount { trait_name: "friendly".into(), occurrences: 2 });
        assert_eq!(counts[2], TraitCount { trait_name: "alert".into(), occurrences: 1 });
    }

    #[tokio::test]
    async fn trait_frequency_caps_at_fifteen() {
        let rows: Vec<String> = (0..20).map(|i| format!("trait{i:02}")).collect();
        let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
        let executor = RecordingExecutor::new(traits_table(&refs));

        let counts = trait_frequency(&executor, &TableNames::default(), &unrestricted())
            .await
            .unwrap();
        assert_eq!(counts.len(), 15);
        // All tied at one occurrence, so the alphabetical prefix survives.
        assert_eq!(counts[0].trait_name, "trait00");
        assert_eq!(counts[14].trait_name, "trait14");
    }

    #[tokio::test]
    async fn trait_query_uses_the_temperament_alias() {
        let selection = FilterSelection {
            family_suitability: vec!["High".into()],
            weight_range: (0.0, 100.0),
            ..FilterSelection::default()
        };
        let executor = RecordingExecutor::new(Table::default());

        trait_frequency(&executor, &TableNames::default(), &compile(&selection))
            .await
            .unwrap();

        let sql = executor.last_sql();
        assert!(sql.contains("join base using (breed_id)"));
        assert!(sql.contains("where tt.total_traits > 0 and tt.family_suitability in ('High')"));
    }
}
