//! Query description model
//!
//! [`QuerySpec`] is the value the form hands over on every build. It is plain data so
//! it can be stored alongside the SQL it produced and loaded back later.

use crate::errors::QueryGenerationError;
use crate::query_builder::aggregation::Aggregate;
use crate::query_builder::bins::CustomBin;
use crate::query_builder::filter::FilterNode;
use crate::query_builder::ordering::{OrderBy, SortOrder};
use crate::query_builder::sql_generation::{GeneratedQuery, SqlGenerator};
use config::GeneratorConfig;
use serde::{Deserialize, Serialize};

/// A plain column in the SELECT list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelection {
    pub source: String,
    #[serde(default)]
    pub alias: Option<String>,
}

impl ColumnSelection {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: None,
        }
    }

    pub fn aliased(source: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            alias: Some(alias.into()),
        }
    }

    /// The alias, if one is set and differs from the source
    pub fn alias(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .filter(|alias| !alias.is_empty() && *alias != self.source)
    }

    /// Name of this item in the result set
    pub fn output_name(&self) -> &str {
        self.alias().unwrap_or(&self.source)
    }
}

/// Complete description of one query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub table: String,
    #[serde(default)]
    pub columns: Vec<ColumnSelection>,
    #[serde(default)]
    pub bins: Vec<CustomBin>,
    #[serde(default)]
    pub filter: Option<FilterNode>,
    #[serde(default)]
    pub aggregates: Vec<Aggregate>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    /// Ignored when aggregates are present
    #[serde(default)]
    pub distinct: bool,
    #[serde(default)]
    pub limit: Option<u64>,
    /// Known source columns of the table; when non-empty, filters may only use these
    /// or names selected in the spec
    #[serde(default)]
    pub catalog: Vec<String>,
}

impl QuerySpec {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Select a column under its own name
    pub fn column(self, source: &str) -> Self {
        self.select(ColumnSelection::new(source))
    }

    /// Select a column under an alias
    pub fn column_as(self, source: &str, alias: &str) -> Self {
        self.select(ColumnSelection::aliased(source, alias))
    }

    pub fn select(mut self, column: ColumnSelection) -> Self {
        self.columns.push(column);
        self
    }

    /// Add a custom bin after the existing ones
    pub fn bin(mut self, bin: CustomBin) -> Self {
        self.bins.push(bin);
        self
    }

    /// Add a filter; combined with AND when a filter is already set
    pub fn filter(mut self, filter: FilterNode) -> Self {
        self.filter = Some(match self.filter.take() {
            None => filter,
            Some(FilterNode::And { mut children }) => {
                children.push(filter);
                FilterNode::And { children }
            }
            Some(existing) => FilterNode::and(vec![existing, filter]),
        });
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    /// Add ordering
    pub fn order_by(mut self, reference: &str, order: SortOrder) -> Self {
        self.order_by.push(OrderBy::new(reference, order));
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Add limit
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Declare the table's known columns
    pub fn catalog<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.catalog = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn has_aggregates(&self) -> bool {
        !self.aggregates.is_empty()
    }

    /// Build single-line SQL with inline literals
    pub fn to_sql(&self) -> Result<String, QueryGenerationError> {
        Ok(SqlGenerator::generate(self, &GeneratorConfig::default())?.sql)
    }

    /// Build SQL using the given generation options
    pub fn to_sql_with(&self, options: &GeneratorConfig) -> Result<GeneratedQuery, QueryGenerationError> {
        SqlGenerator::generate(self, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_alias_rules() {
        assert_eq!(ColumnSelection::new("id").alias(), None);
        assert_eq!(ColumnSelection::aliased("id", "id").alias(), None);
        assert_eq!(ColumnSelection::aliased("id", "").alias(), None);
        assert_eq!(ColumnSelection::aliased("w.loadbd", "PIB").alias(), Some("PIB"));
        assert_eq!(ColumnSelection::aliased("w.loadbd", "PIB").output_name(), "PIB");
        assert_eq!(ColumnSelection::new("w.loadbd").output_name(), "w.loadbd");
    }

    #[test]
    fn test_filters_accumulate_with_and() {
        let spec = QuerySpec::new("orders")
            .filter(FilterNode::eq("a", 1))
            .filter(FilterNode::eq("b", 2))
            .filter(FilterNode::eq("c", 3));

        assert_eq!(
            spec.filter,
            Some(FilterNode::and(vec![
                FilterNode::eq("a", 1),
                FilterNode::eq("b", 2),
                FilterNode::eq("c", 3),
            ]))
        );
    }

    #[test]
    fn test_or_filter_is_not_flattened() {
        let spec = QuerySpec::new("orders")
            .filter(FilterNode::or(vec![FilterNode::eq("a", 1), FilterNode::eq("b", 2)]))
            .filter(FilterNode::eq("c", 3));

        assert!(matches!(spec.filter, Some(FilterNode::And { ref children }) if children.len() == 2));
    }

    #[test]
    fn test_spec_serde_defaults() {
        let spec: QuerySpec = serde_json::from_value(serde_json::json!({"table": "orders"})).unwrap();
        assert_eq!(spec, QuerySpec::new("orders"));
    }
}
