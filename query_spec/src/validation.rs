//! Validation module
//!
//! Consistency checks run once before a spec is assembled into SQL.

use crate::errors::QueryGenerationError;
use crate::identifier::{is_safe_identifier, require_name};
use crate::query_builder::aggregation::{Aggregate, AggregateFunction};
use crate::query_builder::builder::QuerySpec;
use std::collections::HashSet;

pub struct SpecValidator;

impl SpecValidator {
    /// Run every check, reporting the first failure
    pub fn validate(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        Self::check_names(spec)?;
        Self::check_selection(spec)?;
        Self::check_aliases(spec)?;
        Self::check_bins(spec)?;
        Self::check_aggregates(spec)?;
        Self::check_order_by(spec)?;
        Self::check_filter_columns(spec)?;

        trace_log!(table = %spec.table, "spec validated");
        Ok(())
    }

    fn check_names(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        require_name(&spec.table, "table name")?;
        for column in &spec.columns {
            require_name(&column.source, "column selection")?;
        }
        for bin in &spec.bins {
            require_name(&bin.name, "custom bin name")?;
            require_name(&bin.column, "custom bin column")?;
        }
        for aggregate in &spec.aggregates {
            require_name(&aggregate.column, "aggregate column")?;
        }
        for entry in &spec.order_by {
            require_name(&entry.reference, "order by")?;
        }
        if let Some(filter) = &spec.filter {
            for condition in filter.conditions() {
                require_name(&condition.column, "filter condition")?;
            }
        }
        Ok(())
    }

    fn check_selection(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        if spec.columns.is_empty() && spec.bins.is_empty() && spec.aggregates.is_empty() {
            return Err(QueryGenerationError::EmptySelection);
        }
        Ok(())
    }

    /// No two SELECT items may share an output name.
    ///
    /// Plain names fold to lowercase the way the database does; quoted names
    /// compare exactly.
    fn check_aliases(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        let mut seen: HashSet<String> = HashSet::new();

        let names = spec
            .columns
            .iter()
            .map(|c| c.output_name().to_string())
            .chain(spec.bins.iter().map(|b| b.name.clone()))
            .chain(spec.aggregates.iter().map(|a| a.output_name()));

        for name in names {
            let key = if is_safe_identifier(&name) {
                name.to_ascii_lowercase()
            } else {
                name.clone()
            };
            if !seen.insert(key) {
                return Err(QueryGenerationError::DuplicateAlias(name));
            }
        }
        Ok(())
    }

    fn check_bins(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        match spec.bins.iter().find(|bin| bin.rules.is_empty()) {
            Some(bin) => Err(QueryGenerationError::EmptyBin(bin.name.clone())),
            None => Ok(()),
        }
    }

    fn check_aggregates(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        for aggregate in &spec.aggregates {
            if aggregate.is_wildcard() {
                if aggregate.function != AggregateFunction::Count {
                    return Err(QueryGenerationError::WildcardNotAllowed(
                        aggregate.function.name().to_string(),
                    ));
                }
                continue;
            }

            if reads_aggregate(spec, aggregate) {
                return Err(QueryGenerationError::NestedAggregate(aggregate.column.clone()));
            }
        }
        Ok(())
    }

    fn check_order_by(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        let known: HashSet<String> = spec
            .columns
            .iter()
            .flat_map(|c| [c.source.clone(), c.output_name().to_string()])
            .chain(spec.bins.iter().map(|b| b.name.clone()))
            .chain(spec.aggregates.iter().map(|a| a.output_name()))
            .collect();

        for entry in &spec.order_by {
            if !known.contains(&entry.reference) {
                return Err(QueryGenerationError::UnresolvedReference(entry.reference.clone()));
            }
        }
        Ok(())
    }

    /// Filter leaves must name something the query can see in WHERE.
    ///
    /// Aggregate aliases never qualify. Without a catalog any other name is accepted,
    /// since the table's columns are unknown.
    fn check_filter_columns(spec: &QuerySpec) -> Result<(), QueryGenerationError> {
        let Some(filter) = &spec.filter else {
            return Ok(());
        };

        let declared: HashSet<&str> = spec
            .catalog
            .iter()
            .map(String::as_str)
            .chain(
                spec.columns
                    .iter()
                    .flat_map(|c| [c.source.as_str(), c.output_name()]),
            )
            .chain(
                spec.bins
                    .iter()
                    .flat_map(|b| [b.name.as_str(), b.column.as_str()]),
            )
            .collect();

        let aggregate_names: Vec<String> = spec.aggregates.iter().map(|a| a.output_name()).collect();

        for condition in filter.conditions() {
            let column = condition.column.as_str();
            if declared.contains(column) {
                continue;
            }
            let is_aggregate = aggregate_names.iter().any(|name| name == column);
            if is_aggregate || !spec.catalog.is_empty() {
                return Err(QueryGenerationError::UnknownColumn(column.to_string()));
            }
        }
        Ok(())
    }
}

/// Whether `aggregate` takes another aggregate's alias as its argument.
///
/// Column names win over aggregate aliases: catalog entries, selected columns and
/// their aliases, bins and their columns, and the columns other aggregates read.
pub(crate) fn reads_aggregate(spec: &QuerySpec, aggregate: &Aggregate) -> bool {
    let name = aggregate.column.as_str();
    let own_name = aggregate.output_name();
    if aggregate.is_wildcard() || name == own_name {
        return false;
    }

    let is_column = spec.catalog.iter().any(|c| c == name)
        || spec
            .columns
            .iter()
            .any(|c| c.source == name || c.output_name() == name)
        || spec.bins.iter().any(|b| b.name == name || b.column == name)
        || spec
            .aggregates
            .iter()
            .any(|other| other.column == name && other.output_name() != own_name);
    if is_column {
        return false;
    }

    spec.aggregates.iter().any(|other| other.output_name() == name)
}
