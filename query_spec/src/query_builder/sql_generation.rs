//! SQL text generation
//!
//! Clause builders for SELECT, FROM, WHERE, GROUP BY, ORDER BY and LIMIT, plus the
//! assembler that validates a spec and joins the clauses in that fixed order.

use crate::errors::QueryGenerationError;
use crate::identifier::{quote_column, quote_identifier};
use crate::query_builder::aggregation::{Aggregate, AggregateFunction};
use crate::query_builder::bins::CustomBin;
use crate::query_builder::builder::{ColumnSelection, QuerySpec};
use crate::query_builder::filter::{FilterNode, Predicate};
use crate::query_builder::grouping::GroupBy;
use crate::query_builder::literal::{check_range_bounds, Literal, LiteralRenderer};
use crate::query_builder::ordering::OrderBy;
use crate::query_builder::scope::Scope;
use crate::validation::SpecValidator;
use config::{GeneratorConfig, Layout};
use serde_json::Value;

/// SQL text plus the values bound to its `$n` markers
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedQuery {
    pub sql: String,
    /// Empty unless generated with numbered parameters
    pub params: Vec<Value>,
}

pub struct SqlGenerator;

/// Pending work for the iterative filter compiler
enum Step<'a> {
    Visit { node: &'a FilterNode, nested: bool },
    Join { operator: &'static str, count: usize, nested: bool },
    Negate { nested: bool },
}

impl SqlGenerator {
    /// Validate a spec and build its SQL text
    pub fn generate(
        spec: &QuerySpec,
        options: &GeneratorConfig,
    ) -> Result<GeneratedQuery, QueryGenerationError> {
        SpecValidator::validate(spec)?;

        let scope = Scope::new(spec)?;
        let mut renderer = LiteralRenderer::new(options.parameter_style);

        let select_clause = Self::build_select_clause(spec, &scope)?;
        let from_clause = Self::build_from_clause(&spec.table);
        let where_clause = Self::build_scoped_where_clause(spec.filter.as_ref(), &scope, &mut renderer)?;
        let group_by_clause = Self::build_group_by_clause(&GroupBy::implied_by(spec, &scope));
        let order_clause = Self::build_order_clause(&spec.order_by, &scope)?;
        let limit_clause = Self::build_limit_clause(spec.limit);

        let separator = match options.layout {
            Layout::SingleLine => " ",
            Layout::Multiline => "\n",
        };

        let mut sql = [
            select_clause,
            from_clause,
            where_clause,
            group_by_clause,
            order_clause,
            limit_clause,
        ]
        .into_iter()
        .filter(|clause| !clause.is_empty())
        .collect::<Vec<_>>()
        .join(separator);

        if options.trailing_semicolon {
            sql.push(';');
        }

        debug_log!(table = %spec.table, params = renderer.params().len(), "generated SQL: {}", sql);

        Ok(GeneratedQuery {
            sql,
            params: renderer.into_params(),
        })
    }

    /// `source` or `source AS alias`
    pub fn column_expression(column: &ColumnSelection) -> String {
        match column.alias() {
            Some(alias) => format!("{} AS {}", quote_column(&column.source), quote_identifier(alias)),
            None => quote_column(&column.source),
        }
    }

    /// `CASE WHEN .. THEN .. ELSE .. END AS name`
    pub fn bin_expression(bin: &CustomBin) -> Result<String, QueryGenerationError> {
        let case = Self::build_case_expression(bin, &Scope::default())?;
        Ok(format!("{} AS {}", case, quote_identifier(&bin.name)))
    }

    /// `FUNC(column) AS alias`
    pub fn aggregate_expression(aggregate: &Aggregate) -> Result<String, QueryGenerationError> {
        Self::build_aggregate_expression(aggregate, &Scope::default())
    }

    /// Build WHERE clause from an optional filter tree
    pub fn build_where_clause(
        filter: Option<&FilterNode>,
        renderer: &mut LiteralRenderer,
    ) -> Result<String, QueryGenerationError> {
        Self::build_scoped_where_clause(filter, &Scope::default(), renderer)
    }

    /// Build SELECT clause: columns, then bins, then aggregates
    pub(crate) fn build_select_clause(
        spec: &QuerySpec,
        scope: &Scope,
    ) -> Result<String, QueryGenerationError> {
        let mut items: Vec<String> = spec.columns.iter().map(Self::column_expression).collect();

        for bin in &spec.bins {
            let case = scope
                .bin_expression(&bin.name)
                .map(str::to_string)
                .map_or_else(|| Self::build_case_expression(bin, scope), Ok)?;
            items.push(format!("{} AS {}", case, quote_identifier(&bin.name)));
        }

        for aggregate in &spec.aggregates {
            items.push(Self::build_aggregate_expression(aggregate, scope)?);
        }

        if items.is_empty() {
            return Err(QueryGenerationError::EmptySelection);
        }

        let distinct = if spec.distinct && !spec.has_aggregates() {
            "DISTINCT "
        } else {
            ""
        };

        Ok(format!("SELECT {}{}", distinct, items.join(", ")))
    }

    /// Build the CASE expression of a bin, without its alias.
    ///
    /// Labels and thresholds are always inline so the same text can be repeated in
    /// GROUP BY.
    pub(crate) fn build_case_expression(
        bin: &CustomBin,
        scope: &Scope,
    ) -> Result<String, QueryGenerationError> {
        if bin.rules.is_empty() {
            return Err(QueryGenerationError::EmptyBin(bin.name.clone()));
        }

        let column = scope.column_expression(&bin.column);
        let mut renderer = LiteralRenderer::inline();
        let mut case = String::from("CASE");

        for rule in &bin.rules {
            let test = Self::build_predicate_sql(&column, &rule.predicate, &mut renderer)?;
            let label = renderer.render(&rule.label)?;
            case.push_str(&format!(" WHEN {} THEN {}", test, label));
        }

        let default_label = renderer.render(&bin.default_label)?;
        case.push_str(&format!(" ELSE {} END", default_label));

        Ok(case)
    }

    pub(crate) fn build_aggregate_expression(
        aggregate: &Aggregate,
        scope: &Scope,
    ) -> Result<String, QueryGenerationError> {
        let function = aggregate.function;

        let argument = if aggregate.is_wildcard() {
            if function != AggregateFunction::Count {
                return Err(QueryGenerationError::WildcardNotAllowed(function.name().to_string()));
            }
            "*".to_string()
        } else {
            let name = aggregate.column.as_str();
            if scope.reads_aggregate(aggregate) {
                return Err(QueryGenerationError::NestedAggregate(name.to_string()));
            }
            let source = scope.source_expression(name);
            if function.is_distinct() {
                format!("DISTINCT {}", source)
            } else {
                source
            }
        };

        Ok(format!(
            "{}({}) AS {}",
            function.to_sql(),
            argument,
            quote_identifier(&aggregate.output_name())
        ))
    }

    /// Build FROM clause
    pub fn build_from_clause(table: &str) -> String {
        format!("FROM {}", quote_identifier(table))
    }

    pub(crate) fn build_scoped_where_clause(
        filter: Option<&FilterNode>,
        scope: &Scope,
        renderer: &mut LiteralRenderer,
    ) -> Result<String, QueryGenerationError> {
        match filter {
            None => Ok(String::new()),
            Some(root) => Ok(format!("WHERE {}", Self::build_filter_sql(root, scope, renderer)?)),
        }
    }

    /// Compile a filter tree without recursion.
    ///
    /// Nested groups and two-sided ranges are parenthesized; leaves render in
    /// left-to-right order so `$n` markers follow the text.
    fn build_filter_sql(
        root: &FilterNode,
        scope: &Scope,
        renderer: &mut LiteralRenderer,
    ) -> Result<String, QueryGenerationError> {
        let mut steps = vec![Step::Visit {
            node: root,
            nested: false,
        }];
        let mut output: Vec<String> = Vec::new();

        while let Some(step) = steps.pop() {
            match step {
                Step::Visit { node, nested } => match node {
                    FilterNode::Condition(condition) => {
                        let column = scope.source_expression(&condition.column);
                        let sql = Self::build_predicate_sql(&column, &condition.predicate, renderer)?;
                        let compound = matches!(condition.predicate, Predicate::Range { .. });
                        output.push(if nested && compound {
                            format!("({})", sql)
                        } else {
                            sql
                        });
                    }
                    FilterNode::And { children } | FilterNode::Or { children } => {
                        let operator = if matches!(node, FilterNode::And { .. }) {
                            " AND "
                        } else {
                            " OR "
                        };
                        if children.is_empty() {
                            return Err(QueryGenerationError::EmptyFilterGroup(
                                operator.trim().to_string(),
                            ));
                        }
                        steps.push(Step::Join {
                            operator,
                            count: children.len(),
                            nested,
                        });
                        steps.extend(children.iter().rev().map(|child| Step::Visit {
                            node: child,
                            nested: true,
                        }));
                    }
                    FilterNode::Not { child } => {
                        steps.push(Step::Negate { nested });
                        steps.push(Step::Visit {
                            node: child,
                            nested: false,
                        });
                    }
                },
                Step::Join {
                    operator,
                    count,
                    nested,
                } => {
                    let parts = output.split_off(output.len() - count);
                    let joined = parts.join(operator);
                    output.push(if nested { format!("({})", joined) } else { joined });
                }
                Step::Negate { nested } => {
                    let inner = output.pop().unwrap_or_default();
                    let negated = format!("NOT ({})", inner);
                    output.push(if nested { format!("({})", negated) } else { negated });
                }
            }
        }

        Ok(output.pop().unwrap_or_default())
    }

    /// Render one predicate against an already-resolved column expression
    pub fn build_predicate_sql(
        column: &str,
        predicate: &Predicate,
        renderer: &mut LiteralRenderer,
    ) -> Result<String, QueryGenerationError> {
        match predicate {
            Predicate::Comparison { operator, value } => {
                match value {
                    Literal::Null => {
                        return Err(QueryGenerationError::invalid_literal(
                            "NULL",
                            "compare with NULL using a null check",
                        ));
                    }
                    Literal::Set(_) => {
                        return Err(QueryGenerationError::invalid_literal(
                            value.describe(),
                            "use set membership to compare against a set",
                        ));
                    }
                    Literal::String(_) => {}
                    other if operator.is_pattern() => {
                        return Err(QueryGenerationError::invalid_literal(
                            other.describe(),
                            "LIKE patterns must be strings",
                        ));
                    }
                    _ => {}
                }
                let literal = renderer.render(value)?;
                Ok(format!("{} {} {}", column, operator.to_sql(), literal))
            }
            Predicate::Range {
                low,
                high,
                inclusive_low,
                inclusive_high,
            } => {
                check_range_bounds(low, high)?;
                let low_operator = if *inclusive_low { ">=" } else { ">" };
                let high_operator = if *inclusive_high { "<=" } else { "<" };
                let low = renderer.render(low)?;
                let high = renderer.render(high)?;
                Ok(format!(
                    "{} {} {} AND {} {} {}",
                    column, low_operator, low, column, high_operator, high
                ))
            }
            Predicate::SetMembership { values, negate } => {
                let set = renderer.render_set(values)?;
                let operator = if *negate { "NOT IN" } else { "IN" };
                Ok(format!("{} {} {}", column, operator, set))
            }
            Predicate::NullCheck { is_null } => {
                let check = if *is_null { "IS NULL" } else { "IS NOT NULL" };
                Ok(format!("{} {}", column, check))
            }
        }
    }

    /// Build GROUP BY clause
    pub fn build_group_by_clause(group_by: &GroupBy) -> String {
        if group_by.is_empty() {
            return String::new();
        }
        format!("GROUP BY {}", group_by.expressions.join(", "))
    }

    /// Build ORDER BY clause
    pub(crate) fn build_order_clause(
        order_by: &[OrderBy],
        scope: &Scope,
    ) -> Result<String, QueryGenerationError> {
        if order_by.is_empty() {
            return Ok(String::new());
        }

        let order_items = order_by
            .iter()
            .map(|entry| {
                let target = scope.resolve_order(&entry.reference)?;
                Ok(format!("{} {}", target, entry.direction.to_sql()))
            })
            .collect::<Result<Vec<_>, QueryGenerationError>>()?;

        Ok(format!("ORDER BY {}", order_items.join(", ")))
    }

    /// Build LIMIT clause
    pub fn build_limit_clause(limit: Option<u64>) -> String {
        match limit {
            Some(limit) => format!("LIMIT {}", limit),
            None => String::new(),
        }
    }
}
