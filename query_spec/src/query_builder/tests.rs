//! Query builder utilities
//!
//! Clause-level tests for SQL generation.

#[cfg(test)]
mod tests {
    use crate::errors::{ErrorKind, QueryGenerationError};
    use crate::query_builder::{
        build, build_with, Aggregate, ColumnSelection, ComparisonOperator, CustomBin, FilterNode,
        Literal, LiteralRenderer, Predicate, QuerySpec, SortOrder, SqlGenerator,
    };
    use config::{GeneratorConfig, Layout, ParameterStyle};
    use serde_json::json;

    fn where_sql(filter: FilterNode) -> Result<String, QueryGenerationError> {
        let mut renderer = LiteralRenderer::inline();
        SqlGenerator::build_where_clause(Some(&filter), &mut renderer)
    }

    fn error_kind(spec: &QuerySpec) -> ErrorKind {
        build(spec).unwrap_err().kind()
    }

    // ========================================
    // Expression Synthesizer
    // ========================================

    #[test]
    fn test_column_expression() {
        assert_eq!(SqlGenerator::column_expression(&ColumnSelection::new("id")), "id");
        assert_eq!(
            SqlGenerator::column_expression(&ColumnSelection::aliased("id", "id")),
            "id"
        );
        assert_eq!(
            SqlGenerator::column_expression(&ColumnSelection::aliased("w.loadbd", "PIB")),
            "w.loadbd AS PIB"
        );
        assert_eq!(
            SqlGenerator::column_expression(&ColumnSelection::aliased("order date", "day of order")),
            "\"order date\" AS \"day of order\""
        );
    }

    #[test]
    fn test_bin_expression_keeps_rule_order() {
        let bin = CustomBin::new("size", "amount")
            .when(Predicate::half_open(10, 100), "medium")
            .when(Predicate::half_open(0, 10), "small")
            .otherwise("large");

        assert_eq!(
            SqlGenerator::bin_expression(&bin).unwrap(),
            "CASE WHEN amount >= 10 AND amount < 100 THEN 'medium' \
             WHEN amount >= 0 AND amount < 10 THEN 'small' ELSE 'large' END AS size"
        );
    }

    #[test]
    fn test_bin_expression_with_set_and_comparison_rules() {
        let bin = CustomBin::new("Region Group", "region")
            .when(Predicate::one_of(["DE", "FR"]), "Europe")
            .when(Predicate::comparison(ComparisonOperator::Eq, "US"), "America");

        assert_eq!(
            SqlGenerator::bin_expression(&bin).unwrap(),
            "CASE WHEN region IN ('DE', 'FR') THEN 'Europe' \
             WHEN region = 'US' THEN 'America' ELSE NULL END AS \"Region Group\""
        );
    }

    #[test]
    fn test_aggregate_expressions() {
        let cases = vec![
            (Aggregate::count_all("total"), "COUNT(*) AS total"),
            (Aggregate::count("id", ""), "COUNT(id) AS count_id"),
            (
                Aggregate::count_distinct("customer", ""),
                "COUNT(DISTINCT customer) AS count_distinct_customer",
            ),
            (Aggregate::sum("amount", "revenue"), "SUM(amount) AS revenue"),
            (Aggregate::avg("w.yield", ""), "AVG(w.yield) AS avg_w_yield"),
            (Aggregate::min("price", "cheapest"), "MIN(price) AS cheapest"),
            (Aggregate::max("price", "dearest"), "MAX(price) AS dearest"),
            (Aggregate::count_all(""), "COUNT(*) AS count_all"),
        ];

        for (aggregate, expected) in cases {
            assert_eq!(SqlGenerator::aggregate_expression(&aggregate).unwrap(), expected);
        }
    }

    #[test]
    fn test_aggregate_function_names() {
        assert!(Aggregate::parse("count distinct", "id", "").is_ok());
        assert!(Aggregate::parse("COUNT_DISTINCT", "id", "").is_ok());
        assert!(Aggregate::parse("avg", "id", "").is_ok());
        assert_eq!(
            Aggregate::parse("median", "id", "").unwrap_err(),
            QueryGenerationError::UnknownAggregateFunction("median".to_string())
        );
    }

    // ========================================
    // Filter Compiler
    // ========================================

    #[test]
    fn test_no_filter_no_where() {
        let mut renderer = LiteralRenderer::inline();
        assert_eq!(SqlGenerator::build_where_clause(None, &mut renderer).unwrap(), "");

        let sql = build(&QuerySpec::new("orders").column("id")).unwrap();
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_leaf_predicates() {
        assert_eq!(where_sql(FilterNode::ne("status", "open")).unwrap(), "WHERE status != 'open'");
        assert_eq!(where_sql(FilterNode::lte("qty", 5)).unwrap(), "WHERE qty <= 5");
        assert_eq!(where_sql(FilterNode::gt("price", 9.5)).unwrap(), "WHERE price > 9.5");
        assert_eq!(where_sql(FilterNode::like("name", "Jo%")).unwrap(), "WHERE name LIKE 'Jo%'");
        assert_eq!(
            where_sql(FilterNode::compare("name", ComparisonOperator::NotLike, "%x")).unwrap(),
            "WHERE name NOT LIKE '%x'"
        );
        assert_eq!(where_sql(FilterNode::is_null("closed_at")).unwrap(), "WHERE closed_at IS NULL");
        assert_eq!(
            where_sql(FilterNode::is_not_null("closed_at")).unwrap(),
            "WHERE closed_at IS NOT NULL"
        );
        assert_eq!(
            where_sql(FilterNode::not_in_values("region", vec!["EU".into(), "US".into()])).unwrap(),
            "WHERE region NOT IN ('EU', 'US')"
        );
    }

    #[test]
    fn test_range_inclusivity() {
        assert_eq!(
            where_sql(FilterNode::between("amount", 1, 5)).unwrap(),
            "WHERE amount >= 1 AND amount <= 5"
        );
        assert_eq!(
            where_sql(FilterNode::range("amount", 1, 5, false, false)).unwrap(),
            "WHERE amount > 1 AND amount < 5"
        );
        assert_eq!(
            where_sql(FilterNode::date_range("created", "2024-01-01", "2024-03-31")).unwrap(),
            "WHERE created >= '2024-01-01' AND created <= '2024-03-31'"
        );
    }

    #[test]
    fn test_nested_groups_are_parenthesized() {
        let filter = FilterNode::and(vec![
            FilterNode::eq("a", 1),
            FilterNode::or(vec![FilterNode::eq("b", 2), FilterNode::eq("c", 3)]),
            FilterNode::not(FilterNode::is_null("d")),
        ]);

        assert_eq!(
            where_sql(filter).unwrap(),
            "WHERE a = 1 AND (b = 2 OR c = 3) AND (NOT (d IS NULL))"
        );
    }

    #[test]
    fn test_range_inside_group_is_parenthesized() {
        let filter = FilterNode::or(vec![
            FilterNode::between("amount", 1, 5),
            FilterNode::eq("flag", "y"),
        ]);

        assert_eq!(
            where_sql(filter).unwrap(),
            "WHERE (amount >= 1 AND amount <= 5) OR flag = 'y'"
        );
    }

    #[test]
    fn test_not_at_root() {
        let filter = FilterNode::not(FilterNode::and(vec![
            FilterNode::eq("a", 1),
            FilterNode::eq("b", 2),
        ]));
        assert_eq!(where_sql(filter).unwrap(), "WHERE NOT (a = 1 AND b = 2)");
    }

    #[test]
    fn test_empty_groups_fail() {
        assert_eq!(
            where_sql(FilterNode::and(vec![])).unwrap_err(),
            QueryGenerationError::EmptyFilterGroup("AND".to_string())
        );

        let nested = FilterNode::and(vec![FilterNode::eq("a", 1), FilterNode::or(vec![])]);
        assert_eq!(
            where_sql(nested).unwrap_err(),
            QueryGenerationError::EmptyFilterGroup("OR".to_string())
        );
    }

    // ========================================
    // Literal Edge Cases
    // ========================================

    #[test]
    fn test_quotes_are_doubled() {
        assert_eq!(
            where_sql(FilterNode::eq("name", "O'Brien")).unwrap(),
            "WHERE name = 'O''Brien'"
        );
        assert_eq!(
            where_sql(FilterNode::eq("name", "'; DROP TABLE users; --")).unwrap(),
            "WHERE name = '''; DROP TABLE users; --'"
        );
    }

    #[test]
    fn test_invalid_literals() {
        let cases = vec![
            FilterNode::eq("n", f64::NAN),
            FilterNode::eq("n", Literal::Null),
            FilterNode::eq("n", Literal::set([1, 2])),
            FilterNode::compare("n", ComparisonOperator::Like, 5),
            FilterNode::in_values("n", vec![]),
            FilterNode::in_values("n", vec![1.into(), "a".into()]),
            FilterNode::in_values("n", vec![Literal::set([1])]),
            FilterNode::eq("day", Literal::date("2024-02-30")),
            FilterNode::between("amount", 10, 1),
            FilterNode::date_range("day", "2024-05-01", "2024-01-01"),
            FilterNode::between("amount", 1, "z"),
        ];

        for filter in cases {
            let error = where_sql(filter.clone()).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::InvalidLiteral, "{:?}", filter);
        }
    }

    #[test]
    fn test_sets_mix_integers_and_floats() {
        assert_eq!(
            where_sql(FilterNode::in_values("n", vec![1.into(), 2.5.into()])).unwrap(),
            "WHERE n IN (1, 2.5)"
        );
        assert_eq!(
            where_sql(FilterNode::in_values("n", vec![0.5.into(), 3.into(), "x".into()]))
                .unwrap_err()
                .kind(),
            ErrorKind::InvalidLiteral
        );
    }

    #[test]
    fn test_numeric_form_input() {
        assert_eq!(Literal::numeric(" 42 ").unwrap(), Literal::Integer(42));
        assert_eq!(Literal::numeric("2.5").unwrap(), Literal::Float(2.5));
        assert_eq!(Literal::numeric("abc").unwrap_err().kind(), ErrorKind::InvalidLiteral);
        assert_eq!(Literal::numeric("inf").unwrap_err().kind(), ErrorKind::InvalidLiteral);
    }

    // ========================================
    // Query Assembler
    // ========================================

    #[test]
    fn test_clause_order_with_everything() {
        let spec = QuerySpec::new("orders")
            .column("region")
            .aggregate(Aggregate::sum("amount", "revenue"))
            .filter(FilterNode::eq("status", "shipped"))
            .order_by("revenue", SortOrder::Desc)
            .limit(5);

        assert_eq!(
            build(&spec).unwrap(),
            "SELECT region, SUM(amount) AS revenue FROM orders WHERE status = 'shipped' \
             GROUP BY region ORDER BY revenue DESC LIMIT 5"
        );
    }

    #[test]
    fn test_order_by_source_uses_alias() {
        let spec = QuerySpec::new("wafer")
            .column_as("w.loadbd", "PIB")
            .order_by("w.loadbd", SortOrder::Asc);

        assert_eq!(build(&spec).unwrap(), "SELECT w.loadbd AS PIB FROM wafer ORDER BY PIB ASC");
    }

    #[test]
    fn test_order_by_bin_name() {
        let spec = QuerySpec::new("orders")
            .bin(CustomBin::new("tier", "amount").when(Predicate::between(0, 9), "low"))
            .order_by("tier", SortOrder::Asc);

        assert!(build(&spec).unwrap().ends_with("FROM orders ORDER BY tier ASC"));
    }

    #[test]
    fn test_distinct_only_without_aggregates() {
        let spec = QuerySpec::new("orders").column("region").distinct();
        assert_eq!(build(&spec).unwrap(), "SELECT DISTINCT region FROM orders");

        let spec = spec.aggregate(Aggregate::count_all("total"));
        assert_eq!(
            build(&spec).unwrap(),
            "SELECT region, COUNT(*) AS total FROM orders GROUP BY region"
        );
    }

    #[test]
    fn test_quoted_table_and_columns() {
        let spec = QuerySpec::new("sales data").column("unit price").column("w.lot");
        assert_eq!(
            build(&spec).unwrap(),
            "SELECT \"unit price\", w.lot FROM \"sales data\""
        );
    }

    #[test]
    fn test_filter_on_derived_names() {
        let spec = QuerySpec::new("wafer")
            .column_as("w.loadbd", "PIB")
            .bin(CustomBin::new("tier", "amount").when(Predicate::between(0, 9), "low"))
            .filter(FilterNode::eq("PIB", "X1"))
            .filter(FilterNode::eq("tier", "low"));

        let sql = build(&spec).unwrap();
        assert!(sql.ends_with(
            "WHERE w.loadbd = 'X1' AND CASE WHEN amount >= 0 AND amount <= 9 THEN 'low' ELSE NULL END = 'low'"
        ));
    }

    #[test]
    fn test_aggregate_over_bin_and_alias() {
        let case = "CASE WHEN amount >= 0 AND amount <= 9 THEN 'low' ELSE NULL END";
        let spec = QuerySpec::new("orders")
            .column_as("o.region", "area")
            .bin(CustomBin::new("tier", "amount").when(Predicate::between(0, 9), "low"))
            .aggregate(Aggregate::count_distinct("tier", ""))
            .aggregate(Aggregate::max("area", "last_area"));

        assert_eq!(
            build(&spec).unwrap(),
            format!(
                "SELECT o.region AS area, {case} AS tier, COUNT(DISTINCT {case}) AS count_distinct_tier, \
                 MAX(o.region) AS last_area FROM orders GROUP BY o.region, {case}"
            )
        );
    }

    #[test]
    fn test_aggregate_alias_named_after_its_column() {
        let spec = QuerySpec::new("orders")
            .column("region")
            .aggregate(Aggregate::sum("amount", "amount"))
            .aggregate(Aggregate::max("amount", "biggest"));

        assert_eq!(
            spec.to_sql().unwrap(),
            "SELECT region, SUM(amount) AS amount, MAX(amount) AS biggest FROM orders GROUP BY region"
        );

        let spec = QuerySpec::new("orders")
            .aggregate(Aggregate::sum("amount", "amount_sum"))
            .aggregate(Aggregate::max("amount_sum", "biggest"));
        assert_eq!(
            build(&spec).unwrap_err(),
            QueryGenerationError::NestedAggregate("amount_sum".to_string())
        );
    }

    #[test]
    fn test_assembler_errors() {
        assert_eq!(error_kind(&QuerySpec::new("orders")), ErrorKind::EmptySelection);
        assert_eq!(
            error_kind(&QuerySpec::new("orders").column("id").filter(FilterNode::or(vec![]))),
            ErrorKind::EmptyFilterGroup
        );
        assert_eq!(
            error_kind(&QuerySpec::new("orders").aggregate(Aggregate::avg("*", "a"))),
            ErrorKind::WildcardNotAllowed
        );
        assert_eq!(
            error_kind(&QuerySpec::new("orders").column("id").filter(FilterNode::eq("id", f64::INFINITY))),
            ErrorKind::InvalidLiteral
        );
    }

    // ========================================
    // Generation Options
    // ========================================

    #[test]
    fn test_numbered_parameters() {
        let spec = QuerySpec::new("orders")
            .column("id")
            .filter(FilterNode::eq("status", "open"))
            .filter(FilterNode::date_range("created", "2024-01-01", "2024-12-31"))
            .filter(FilterNode::in_values("region", vec!["EU".into(), "US".into()]))
            .limit(10);

        let options = GeneratorConfig::new(ParameterStyle::Numbered, false, Layout::SingleLine);
        let generated = build_with(&spec, &options).unwrap();

        assert_eq!(
            generated.sql,
            "SELECT id FROM orders WHERE status = $1 \
             AND (created >= CAST($2 AS DATE) AND created <= CAST($3 AS DATE)) \
             AND region IN ($4, $5) LIMIT 10"
        );
        assert_eq!(
            generated.params,
            vec![json!("open"), json!("2024-01-01"), json!("2024-12-31"), json!("EU"), json!("US")]
        );
    }

    #[test]
    fn test_numbered_parameters_keep_bins_inline() {
        let spec = QuerySpec::new("orders")
            .bin(CustomBin::new("tier", "amount").when(Predicate::between(0, 9), "low"))
            .aggregate(Aggregate::count_all("total"))
            .filter(FilterNode::gt("amount", 3));

        let options = GeneratorConfig::new(ParameterStyle::Numbered, false, Layout::SingleLine);
        let generated = spec.to_sql_with(&options).unwrap();

        assert!(generated.sql.contains("THEN 'low'"));
        assert!(generated.sql.contains("WHERE amount > $1"));
        assert_eq!(generated.params, vec![json!(3)]);
    }

    #[test]
    fn test_inline_style_has_no_params() {
        let spec = QuerySpec::new("orders").column("id").filter(FilterNode::eq("id", 7));
        let generated = build_with(&spec, &GeneratorConfig::default()).unwrap();
        assert_eq!(generated.sql, "SELECT id FROM orders WHERE id = 7");
        assert!(generated.params.is_empty());
    }

    #[test]
    fn test_multiline_with_semicolon() {
        let spec = QuerySpec::new("orders")
            .column("region")
            .aggregate(Aggregate::count_all("total"))
            .order_by("total", SortOrder::Desc);

        let options = GeneratorConfig::new(ParameterStyle::Inline, true, Layout::Multiline);
        let generated = build_with(&spec, &options).unwrap();

        assert_eq!(
            generated.sql,
            "SELECT region, COUNT(*) AS total\nFROM orders\nGROUP BY region\nORDER BY total DESC;"
        );
    }
}
