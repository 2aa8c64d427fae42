use crate::identifier::quote_column;
use crate::query_builder::builder::QuerySpec;
use crate::query_builder::scope::Scope;

/// GROUP BY expressions implied by a spec's aggregates
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupBy {
    /// Source expressions, never aliases
    pub expressions: Vec<String>,
}

impl GroupBy {
    pub fn new(expressions: Vec<String>) -> Self {
        Self { expressions }
    }

    /// Every plain column and bin becomes a key once any aggregate is selected.
    ///
    /// Keys keep declaration order (columns, then bins); repeats are dropped.
    pub(crate) fn implied_by(spec: &QuerySpec, scope: &Scope) -> Self {
        if !spec.has_aggregates() {
            return Self::default();
        }

        let columns = spec.columns.iter().map(|c| quote_column(&c.source));
        let bins = spec
            .bins
            .iter()
            .filter_map(|b| scope.bin_expression(&b.name).map(str::to_string));

        let mut expressions: Vec<String> = Vec::new();
        for expression in columns.chain(bins) {
            if !expressions.contains(&expression) {
                expressions.push(expression);
            }
        }

        Self { expressions }
    }

    pub fn is_empty(&self) -> bool {
        self.expressions.is_empty()
    }
}
