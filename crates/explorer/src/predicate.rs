//! Structured SQL predicates.
//!
//! Conditions render against a caller-supplied table alias, so one
//! predicate can be spliced into queries that alias the same table
//! differently. Rendering is the only place literal quoting happens.

/// One boolean condition over a single column.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `alias.column in ('a','b')`
    InList { column: String, values: Vec<String> },
    /// `alias.column between low and high`
    Between { column: String, low: f64, high: f64 },
}

impl Condition {
    fn render(&self, alias: &str) -> String {
        match self {
            Condition::InList { column, values } => {
                let quoted: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
                format!("{alias}.{column} in ({})", quoted.join(","))
            }
            Condition::Between { column, low, high } => {
                format!("{alias}.{column} between {low} and {high}")
            }
        }
    }
}

/// A conjunction of conditions.
///
/// Renders `1=1` when empty so callers never splice a dangling boolean.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an in-list condition. An empty value list means "no
    /// restriction" and adds nothing.
    pub fn in_list(mut self, column: &str, values: &[String]) -> Self {
        if !values.is_empty() {
            self.conditions.push(Condition::InList {
                column: column.into(),
                values: values.to_vec(),
            });
        }
        self
    }

    /// Add an inclusive range condition.
    pub fn between(mut self, column: &str, low: f64, high: f64) -> Self {
        self.conditions.push(Condition::Between {
            column: column.into(),
            low,
            high,
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Render as a standalone boolean expression qualified by `alias`.
    pub fn render(&self, alias: &str) -> String {
        if self.conditions.is_empty() {
            return "1=1".into();
        }
        self.conditions
            .iter()
            .map(|c| c.render(alias))
            .collect::<Vec<_>>()
            .join(" and ")
    }

    /// Render as an `and ...` fragment for splicing after an existing
    /// condition. Empty predicates render as an empty string.
    pub fn render_fragment(&self, alias: &str) -> String {
        if self.conditions.is_empty() {
            String::new()
        } else {
            format!("and {}", self.render(alias))
        }
    }
}

/// Quote a string literal for SQL, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicate_renders_as_tautology() {
        assert_eq!(Predicate::new().render("b"), "1=1");
        assert_eq!(Predicate::new().render_fragment("b"), "");
    }

    #[test]
    fn in_list_quotes_and_joins_values() {
        let predicate = Predicate::new().in_list("breed_group", &["Toy".into(), "Working".into()]);
        assert_eq!(predicate.render("b"), "b.breed_group in ('Toy','Working')");
    }

    #[test]
    fn empty_value_list_adds_no_condition() {
        let predicate = Predicate::new().in_list("breed_group", &[]);
        assert!(predicate.is_empty());
        assert_eq!(predicate.render("b"), "1=1");
    }

    #[test]
    fn embedded_quotes_are_doubled() {
        assert_eq!(quote_literal("O'Brien's"), "'O''Brien''s'");

        let predicate = Predicate::new().in_list("breed_group", &["Bob's; drop table x".into()]);
        assert_eq!(
            predicate.render("b"),
            "b.breed_group in ('Bob''s; drop table x')"
        );
    }

    #[test]
    fn between_renders_inclusive_range() {
        let predicate = Predicate::new().between("avg_weight_kg", 4.0, 6.0);
        assert_eq!(predicate.render("b"), "b.avg_weight_kg between 4 and 6");
    }

    #[test]
    fn conditions_join_with_and() {
        let predicate = Predicate::new()
            .in_list("size_category", &["Small".into()])
            .between("avg_weight_kg", 0.0, 15.0);
        assert_eq!(
            predicate.render("b"),
            "b.size_category in ('Small') and b.avg_weight_kg between 0 and 15"
        );
    }

    #[test]
    fn alias_changes_are_pure_rerenders() {
        let predicate = Predicate::new().in_list("family_suitability", &["High".into()]);
        assert_eq!(predicate.render("t"), "t.family_suitability in ('High')");
        assert_eq!(
            predicate.render_fragment("tt"),
            "and tt.family_suitability in ('High')"
        );
    }
}
