//! Human-readable summary of a spec
//!
//! Shown next to the generated SQL so a user can check the query at a glance.

use crate::errors::QueryGenerationError;
use crate::query_builder::builder::QuerySpec;
use crate::query_builder::literal::LiteralRenderer;
use crate::query_builder::scope::Scope;
use crate::query_builder::sql_generation::SqlGenerator;

const EMPTY_PREVIEW: &str = "No selections defined yet.";

/// Summarize a spec in one line per section.
///
/// Filters are shown as the compiled condition with inline literals, so a filter
/// with an invalid literal fails here the same way it would fail to build.
pub fn preview(spec: &QuerySpec) -> Result<String, QueryGenerationError> {
    let mut parts: Vec<String> = Vec::new();

    if !spec.columns.is_empty() {
        let columns = spec
            .columns
            .iter()
            .map(|column| match column.alias() {
                Some(alias) => format!("{} as {}", column.source, alias),
                None => column.source.clone(),
            })
            .collect::<Vec<_>>();
        parts.push(format!("Columns: {}.", columns.join(", ")));
    }

    if !spec.bins.is_empty() {
        let bins = spec
            .bins
            .iter()
            .map(|bin| format!("{} (from {})", bin.name, bin.column))
            .collect::<Vec<_>>();
        parts.push(format!("Bins: {}.", bins.join(", ")));
    }

    if !spec.aggregates.is_empty() {
        let aggregates = spec
            .aggregates
            .iter()
            .map(|aggregate| format!("{}({})", aggregate.function.name(), aggregate.column))
            .collect::<Vec<_>>();
        parts.push(format!("Aggregates: {}.", aggregates.join(", ")));
    }

    if let Some(filter) = &spec.filter {
        let scope = Scope::new(spec)?;
        let mut renderer = LiteralRenderer::inline();
        let clause = SqlGenerator::build_scoped_where_clause(Some(filter), &scope, &mut renderer)?;
        let conditions = clause.strip_prefix("WHERE ").unwrap_or(&clause);
        parts.push(format!("Filters: {}", conditions));
    }

    if spec.has_aggregates() {
        let mut keys: Vec<&str> = spec
            .columns
            .iter()
            .map(|c| c.source.as_str())
            .chain(spec.bins.iter().map(|b| b.name.as_str()))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        if !keys.is_empty() {
            parts.push(format!("Grouped by: {}", keys.join(", ")));
        }
    }

    if !spec.order_by.is_empty() {
        let orders = spec
            .order_by
            .iter()
            .map(|entry| format!("{} {}", entry.reference, entry.direction.to_sql()))
            .collect::<Vec<_>>();
        parts.push(format!("Ordered by: {}", orders.join(", ")));
    }

    if parts.is_empty() {
        return Ok(EMPTY_PREVIEW.to_string());
    }
    Ok(parts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_builder::aggregation::Aggregate;
    use crate::query_builder::bins::CustomBin;
    use crate::query_builder::filter::{FilterNode, Predicate};
    use crate::query_builder::ordering::SortOrder;

    #[test]
    fn test_empty_spec_preview() {
        assert_eq!(preview(&QuerySpec::new("orders")).unwrap(), "No selections defined yet.");
    }

    #[test]
    fn test_full_preview() {
        let spec = QuerySpec::new("wafer")
            .column_as("w.loadbd", "PIB")
            .column("region")
            .bin(CustomBin::new("tier", "amount").when(Predicate::between(0, 9), "low"))
            .aggregate(Aggregate::count_all("total"))
            .filter(FilterNode::eq("status", "O'Brien"))
            .order_by("total", SortOrder::Desc);

        let text = preview(&spec).unwrap();
        assert_eq!(
            text,
            "Columns: w.loadbd as PIB, region.\n\
             Bins: tier (from amount).\n\
             Aggregates: COUNT(*).\n\
             Filters: status = 'O''Brien'\n\
             Grouped by: region, tier, w.loadbd\n\
             Ordered by: total DESC"
        );
    }

    #[test]
    fn test_preview_without_aggregates_has_no_grouping() {
        let spec = QuerySpec::new("orders").column("id").order_by("id", SortOrder::Asc);
        assert_eq!(preview(&spec).unwrap(), "Columns: id.\nOrdered by: id ASC");
    }

    #[test]
    fn test_preview_reports_bad_literal() {
        let spec = QuerySpec::new("orders")
            .column("id")
            .filter(FilterNode::date_range("created", "2024-13-01", "2024-12-01"));
        assert!(preview(&spec).is_err());
    }
}
