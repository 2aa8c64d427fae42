//! Query builder utilities
//!
//! End-to-end scenarios over complete specs.

#[cfg(test)]
mod integration_tests {
    use crate::errors::QueryGenerationError;
    use crate::query_builder::{
        build, Aggregate, CustomBin, FilterNode, Predicate, QuerySpec, SortOrder,
    };
    use serde_json::json;
    use std::collections::HashSet;
    use std::time::Instant;

    // ========================================
    // Reference Scenarios
    // ========================================

    #[test]
    fn test_simple_filtered_select() {
        let spec = QuerySpec::new("orders")
            .column("id")
            .filter(FilterNode::eq("status", "shipped"))
            .order_by("id", SortOrder::Desc);

        assert_eq!(
            build(&spec).unwrap(),
            "SELECT id FROM orders WHERE status = 'shipped' ORDER BY id DESC"
        );
    }

    #[test]
    fn test_grouped_count() {
        let spec = QuerySpec::new("orders")
            .column("region")
            .aggregate(Aggregate::count_all("total"));

        assert_eq!(
            build(&spec).unwrap(),
            "SELECT region, COUNT(*) AS total FROM orders GROUP BY region"
        );
    }

    #[test]
    fn test_duplicate_alias_scenario() {
        let spec = QuerySpec::new("orders").column_as("a", "x").column_as("b", "x");
        assert_eq!(
            build(&spec).unwrap_err(),
            QueryGenerationError::DuplicateAlias("x".to_string())
        );
    }

    #[test]
    fn test_unresolved_reference_scenario() {
        let spec = QuerySpec::new("orders")
            .column("region")
            .order_by("total", SortOrder::Desc);
        assert_eq!(
            build(&spec).unwrap_err(),
            QueryGenerationError::UnresolvedReference("total".to_string())
        );
    }

    // ========================================
    // Properties
    // ========================================

    fn report_spec() -> QuerySpec {
        QuerySpec::new("wafer")
            .column_as("w.loadbd", "PIB")
            .column("w.tester")
            .bin(
                CustomBin::new("yield_band", "w.yield")
                    .when(Predicate::half_open(0.0, 50.0), "poor")
                    .when(Predicate::half_open(50.0, 90.0), "fair")
                    .otherwise("good"),
            )
            .aggregate(Aggregate::count_all("dies"))
            .aggregate(Aggregate::avg("w.yield", ""))
            .filter(FilterNode::or(vec![
                FilterNode::like("w.lot", "A%"),
                FilterNode::not(FilterNode::in_values("w.tester", vec!["T1".into(), "T2".into()])),
            ]))
            .filter(FilterNode::date_range("w.tested_on", "2024-01-01", "2024-06-30"))
            .order_by("dies", SortOrder::Desc)
            .order_by("PIB", SortOrder::Asc)
    }

    #[test]
    fn test_build_is_deterministic() {
        let spec = report_spec();
        let first = build(&spec).unwrap();
        for _ in 0..10 {
            assert_eq!(build(&spec).unwrap(), first);
        }
        assert_eq!(build(&spec.clone()).unwrap(), first);
    }

    #[test]
    fn test_bins_appear_in_declared_order() {
        let sql = build(&report_spec()).unwrap();
        let poor = sql.find("THEN 'poor'").unwrap();
        let fair = sql.find("THEN 'fair'").unwrap();
        let good = sql.find("ELSE 'good'").unwrap();
        assert!(poor < fair && fair < good);
    }

    #[test]
    fn test_group_by_covers_every_plain_column_and_bin() {
        let sql = build(&report_spec()).unwrap();

        let group_by = sql
            .split(" GROUP BY ")
            .nth(1)
            .and_then(|rest| rest.split(" ORDER BY ").next())
            .unwrap();

        // CASE text contains ", " only inside set lists, which this bin does not use
        let keys: HashSet<&str> = group_by.split(", ").collect();
        let expected: HashSet<&str> = [
            "w.loadbd",
            "w.tester",
            "CASE WHEN w.yield >= 0 AND w.yield < 50 THEN 'poor' \
             WHEN w.yield >= 50 AND w.yield < 90 THEN 'fair' ELSE 'good' END",
        ]
        .into_iter()
        .collect();

        assert_eq!(keys, expected);
    }

    #[test]
    fn test_report_query_text() {
        let sql = build(&report_spec()).unwrap();
        assert!(sql.starts_with("SELECT w.loadbd AS PIB, w.tester, CASE WHEN"));
        assert!(sql.contains("COUNT(*) AS dies, AVG(w.yield) AS avg_w_yield FROM wafer"));
        assert!(sql.contains(
            "WHERE (w.lot LIKE 'A%' OR (NOT (w.tester IN ('T1', 'T2')))) \
             AND (w.tested_on >= '2024-01-01' AND w.tested_on <= '2024-06-30')"
        ));
        assert!(sql.ends_with("ORDER BY dies DESC, PIB ASC"));
    }

    // ========================================
    // Specs From Stored JSON
    // ========================================

    #[test]
    fn test_spec_from_json() {
        let spec: QuerySpec = serde_json::from_value(json!({
            "table": "orders",
            "columns": [{ "source": "region" }],
            "aggregates": [{ "function": "count", "column": "*", "alias": "total" }],
            "filter": {
                "type": "condition",
                "column": "status",
                "predicate": {
                    "type": "comparison",
                    "operator": "=",
                    "value": { "kind": "string", "value": "shipped" }
                }
            },
            "order_by": [{ "reference": "total", "direction": "DESC" }]
        }))
        .unwrap();

        assert_eq!(
            build(&spec).unwrap(),
            "SELECT region, COUNT(*) AS total FROM orders WHERE status = 'shipped' \
             GROUP BY region ORDER BY total DESC"
        );
    }

    #[test]
    fn test_spec_json_round_trip_builds_same_sql() {
        let spec = report_spec();
        let stored = serde_json::to_string(&spec).unwrap();
        let loaded: QuerySpec = serde_json::from_str(&stored).unwrap();
        assert_eq!(build(&loaded).unwrap(), build(&spec).unwrap());
    }

    #[test]
    fn test_unknown_function_in_json() {
        let result: Result<QuerySpec, _> = serde_json::from_value(json!({
            "table": "orders",
            "aggregates": [{ "function": "median", "column": "amount" }]
        }));
        assert!(result.is_err());
    }

    // ========================================
    // Performance Edge Cases
    // ========================================

    #[test]
    fn test_performance_many_conditions() {
        let start = Instant::now();

        let mut spec = QuerySpec::new("events").column("id");
        for i in 0..1000 {
            spec = spec.filter(FilterNode::eq(&format!("field_{}", i), i));
        }

        let sql = build(&spec).unwrap();
        let duration = start.elapsed();

        assert!(duration.as_millis() < 1000);
        assert_eq!(sql.matches(" AND ").count(), 999);
    }

    #[test]
    fn test_deeply_nested_not() {
        let depth = 1000;
        let mut filter = FilterNode::eq("base", 0);
        for _ in 0..depth {
            filter = FilterNode::not(filter);
        }

        let spec = QuerySpec::new("events").column("id").filter(filter);
        let expected = format!(
            "SELECT id FROM events WHERE {}base = 0{}",
            "NOT (".repeat(depth),
            ")".repeat(depth)
        );
        assert_eq!(build(&spec).unwrap(), expected);
    }

    #[test]
    fn test_deeply_nested_groups() {
        let depth = 1000;
        let mut filter = FilterNode::eq("base", "value");
        for i in 0..depth {
            let next = FilterNode::eq(&format!("level_{}", i), i as i64);
            filter = if i % 2 == 0 {
                FilterNode::and(vec![filter, next])
            } else {
                FilterNode::or(vec![filter, next])
            };
        }

        let sql = build(&QuerySpec::new("events").column("id").filter(filter)).unwrap();

        assert_eq!(sql.matches("level_").count(), depth);
        assert_eq!(sql.matches('(').count(), sql.matches(')').count());
        assert!(sql.contains("WHERE ((("));
    }
}
