//! Name resolution for one build
//!
//! Maps the names a spec may refer to (column aliases, bin names, aggregate aliases,
//! source columns) onto the SQL text that stands for them in each clause.

use crate::errors::QueryGenerationError;
use crate::identifier::{quote_column, quote_identifier};
use crate::query_builder::aggregation::Aggregate;
use crate::query_builder::builder::QuerySpec;
use crate::query_builder::sql_generation::SqlGenerator;
use crate::validation::reads_aggregate;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Default)]
pub(crate) struct Scope {
    /// column alias -> quoted source column
    column_sources: HashMap<String, String>,
    /// bin name -> CASE expression without alias
    bins: HashMap<String, String>,
    aggregate_names: Vec<String>,
    /// aggregates whose argument is another aggregate's alias
    nested_aggregates: HashSet<String>,
    /// ORDER BY reference -> emitted text
    order_targets: HashMap<String, String>,
}

impl Scope {
    pub(crate) fn new(spec: &QuerySpec) -> Result<Self, QueryGenerationError> {
        let mut scope = Scope::default();

        for column in &spec.columns {
            if let Some(alias) = column.alias() {
                scope
                    .column_sources
                    .entry(alias.to_string())
                    .or_insert_with(|| quote_column(&column.source));
            }
        }

        for bin in &spec.bins {
            let expression = SqlGenerator::build_case_expression(bin, &scope)?;
            scope.bins.entry(bin.name.clone()).or_insert(expression);
        }

        scope.aggregate_names = spec.aggregates.iter().map(|a| a.output_name()).collect();
        scope.nested_aggregates = spec
            .aggregates
            .iter()
            .filter(|a| reads_aggregate(spec, a))
            .map(|a| a.output_name())
            .collect();

        // Aliases win over source names; earlier entries win over later ones
        let mut targets: Vec<(String, String)> = Vec::new();
        for column in &spec.columns {
            if let Some(alias) = column.alias() {
                targets.push((alias.to_string(), quote_identifier(alias)));
            }
        }
        for bin in &spec.bins {
            targets.push((bin.name.clone(), quote_identifier(&bin.name)));
        }
        for name in &scope.aggregate_names {
            targets.push((name.clone(), quote_identifier(name)));
        }
        for column in &spec.columns {
            let emitted = column
                .alias()
                .map(quote_identifier)
                .unwrap_or_else(|| quote_column(&column.source));
            targets.push((column.source.clone(), emitted));
        }
        for (reference, emitted) in targets {
            scope.order_targets.entry(reference).or_insert(emitted);
        }

        Ok(scope)
    }

    /// Expression for a plain column name, following column aliases
    pub(crate) fn column_expression(&self, name: &str) -> String {
        self.column_sources
            .get(name)
            .cloned()
            .unwrap_or_else(|| quote_column(name))
    }

    /// Expression for a name used in WHERE or inside an aggregate.
    ///
    /// SELECT aliases are not visible there, so bins expand to their CASE expression
    /// and column aliases to their source.
    pub(crate) fn source_expression(&self, name: &str) -> String {
        match self.bins.get(name) {
            Some(expression) => expression.clone(),
            None => self.column_expression(name),
        }
    }

    pub(crate) fn bin_expression(&self, name: &str) -> Option<&str> {
        self.bins.get(name).map(String::as_str)
    }

    pub(crate) fn reads_aggregate(&self, aggregate: &Aggregate) -> bool {
        self.nested_aggregates.contains(&aggregate.output_name())
    }

    pub(crate) fn resolve_order(&self, reference: &str) -> Result<&str, QueryGenerationError> {
        self.order_targets
            .get(reference)
            .map(String::as_str)
            .ok_or_else(|| QueryGenerationError::UnresolvedReference(reference.to_string()))
    }
}
