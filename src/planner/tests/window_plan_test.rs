use planner::{
    plan_sql, AggregateFunctionRegistry, Catalog, ColumnSchema, ConcreteDatatype, ExplainReport,
    PlanErrorKind, Schema, TableDefinition, TypeSpec, UserDefinedAggregate,
};
use std::sync::Arc;

fn setup_catalog() -> Catalog {
    let catalog = Catalog::new();
    let schema = Arc::new(Schema::new(vec![
        ColumnSchema::new("T".to_string(), "a".to_string(), ConcreteDatatype::int64()),
        ColumnSchema::new("T".to_string(), "b".to_string(), ConcreteDatatype::int32()),
        ColumnSchema::new("T".to_string(), "c".to_string(), ConcreteDatatype::string()),
        ColumnSchema::new("T".to_string(), "ts".to_string(), ConcreteDatatype::timestamp()),
    ]));
    catalog
        .insert(TableDefinition::new("T", schema))
        .expect("register table T");
    catalog
}

fn setup_registry() -> Arc<AggregateFunctionRegistry> {
    let registry = AggregateFunctionRegistry::with_builtins();
    registry.register_function(Arc::new(UserDefinedAggregate::new(
        "weightedAvg",
        vec![TypeSpec::Numeric, TypeSpec::Exact(ConcreteDatatype::int64())],
        ConcreteDatatype::float64(),
    )));
    registry
}

fn explain(sql: &str) -> ExplainReport {
    let plan = plan_sql(sql, &setup_catalog(), &setup_registry())
        .unwrap_or_else(|err| panic!("planning failed for {sql}: {err}"));
    ExplainReport::from_logical(&plan)
}

#[test]
fn window_plan_topology_table_driven() {
    struct Case {
        name: &'static str,
        sql: &'static str,
        expected: &'static str,
    }

    let cases = vec![
        Case {
            name: "tumble_without_grouping_columns",
            sql: "SELECT SUM(a) AS sumA, COUNT(b) AS cntB FROM T GROUP BY TUMBLE(ts, INTERVAL '2' HOUR)",
            expected: "WindowAggregate (WindowAggregate_2) [window=TumblingGroupWindow(w$, ts, 7200000), select=[SUM(a) AS sumA, COUNT(b) AS cntB]]
  Calc (Calc_1) [select=[ts, a, b]]
    Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "hop_with_start_and_end",
            sql: "SELECT b, HOP_START(ts, INTERVAL '15' MINUTE, INTERVAL '90' MINUTE) AS ws, \
                  HOP_END(ts, INTERVAL '15' MINUTE, INTERVAL '90' MINUTE) AS we, MIN(a) AS lo \
                  FROM T GROUP BY b, HOP(ts, INTERVAL '15' MINUTE, INTERVAL '90' MINUTE)",
            expected: "Calc (Calc_3) [select=[b, CAST(w$start AS TIMESTAMP(3)) AS ws, CAST(w$end AS TIMESTAMP(3)) AS we, lo]]
  WindowAggregate (WindowAggregate_2) [group_by=[b], window=SlidingGroupWindow(w$, ts, 5400000, 900000), properties=[w$start, w$end], select=[b, MIN(a) AS lo]]
    Calc (Calc_1) [select=[ts, b, a]]
      Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "session_end_only",
            sql: "SELECT c, SESSION_END(ts, INTERVAL '4' MINUTE) AS se, COUNT(*) AS n \
                  FROM T GROUP BY c, SESSION(ts, INTERVAL '4' MINUTE)",
            expected: "Calc (Calc_3) [select=[c, CAST(w$end AS TIMESTAMP(3)) AS se, n]]
  WindowAggregate (WindowAggregate_2) [group_by=[c], window=SessionGroupWindow(w$, ts, 240000), properties=[w$end], select=[c, COUNT(*) AS n]]
    Calc (Calc_1) [select=[ts, c]]
      Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "where_lands_in_input_calc",
            sql: "SELECT b, SUM(a) AS s FROM T WHERE c <> 'x' GROUP BY b, TUMBLE(ts, INTERVAL '1' MINUTE)",
            expected: "WindowAggregate (WindowAggregate_2) [group_by=[b], window=TumblingGroupWindow(w$, ts, 60000), select=[b, SUM(a) AS s]]
  Calc (Calc_1) [select=[ts, b, a], where=c <> 'x']
    Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "grouping_column_projected_away",
            sql: "SELECT TUMBLE_END(ts, INTERVAL '1' HOUR) FROM T GROUP BY c, TUMBLE(ts, INTERVAL '1' HOUR)",
            expected: "Calc (Calc_3) [select=[CAST(w$end AS TIMESTAMP(3)) AS EXPR$0]]
  WindowAggregate (WindowAggregate_2) [group_by=[c], window=TumblingGroupWindow(w$, ts, 3600000), properties=[w$end], select=[c]]
    Calc (Calc_1) [select=[ts, c]]
      Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "computed_aggregate_arguments",
            sql: "SELECT b, SUM(a * 2) + 1, MAX(a) FROM T GROUP BY b, TUMBLE(ts, INTERVAL '1' HOUR)",
            expected: "Calc (Calc_3) [select=[b, $f1 + 1 AS EXPR$1, EXPR$2]]
  WindowAggregate (WindowAggregate_2) [group_by=[b], window=TumblingGroupWindow(w$, ts, 3600000), select=[b, SUM($f2) AS $f1, MAX(a) AS EXPR$2]]
    Calc (Calc_1) [select=[ts, b, a * 2 AS $f2, a]]
      Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
        Case {
            name: "udaf_with_numeric_weight",
            sql: "SELECT b, weightedAvg(a, a) AS wa FROM T GROUP BY b, TUMBLE(ts, INTERVAL '30' SECOND)",
            expected: "WindowAggregate (WindowAggregate_2) [group_by=[b], window=TumblingGroupWindow(w$, ts, 30000), select=[b, weightedAvg(a, a) AS wa]]
  Calc (Calc_1) [select=[ts, b, a]]
    Scan (Scan_0) [table=T, fields=[a, b, c, ts]]",
        },
    ];

    for case in cases {
        let got = explain(case.sql).topology_string();
        assert_eq!(got, case.expected, "case={}", case.name);
    }
}

#[test]
fn window_plan_json_explain() {
    let report = explain(
        "SELECT SUM(a) AS sumA, COUNT(b) AS cntB FROM T GROUP BY TUMBLE(ts, INTERVAL '2' HOUR)",
    );
    let expected = r##"{"children":[{"children":[{"children":[],"id":"Scan_0","info":["table=T","fields=[a, b, c, ts]"],"operator":"Scan"}],"id":"Calc_1","info":["select=[ts, a, b]"],"operator":"Calc"}],"id":"WindowAggregate_2","info":["window=TumblingGroupWindow(w$, ts, 7200000)","select=[SUM(a) AS sumA, COUNT(b) AS cntB]"],"operator":"WindowAggregate"}"##;
    assert_eq!(report.to_json().to_string(), expected);
}

#[test]
fn window_plan_errors_table_driven() {
    struct Case {
        name: &'static str,
        sql: &'static str,
        kind: PlanErrorKind,
        message: &'static str,
    }

    let cases = vec![
        Case {
            name: "tumble_offset",
            sql: "SELECT COUNT(*) FROM T GROUP BY TUMBLE(ts, INTERVAL '1' HOUR, TIME '00:12:00')",
            kind: PlanErrorKind::UnsupportedWindowOffset,
            message: "unsupported window offset",
        },
        Case {
            name: "hop_offset",
            sql: "SELECT COUNT(*) FROM T GROUP BY HOP(ts, INTERVAL '1' MINUTE, INTERVAL '5' MINUTE, TIME '00:01:00')",
            kind: PlanErrorKind::UnsupportedWindowOffset,
            message: "unsupported window offset",
        },
        Case {
            name: "session_offset",
            sql: "SELECT COUNT(*) FROM T GROUP BY SESSION(ts, INTERVAL '1' MINUTE, TIME '00:01:00')",
            kind: PlanErrorKind::UnsupportedWindowOffset,
            message: "unsupported window offset",
        },
        Case {
            name: "size_reads_column",
            sql: "SELECT COUNT(*) FROM T GROUP BY TUMBLE(ts, c * INTERVAL '1' HOUR)",
            kind: PlanErrorKind::UnsupportedWindowSize,
            message: "unsupported window size",
        },
        Case {
            name: "udaf_weight_type",
            sql: "SELECT weightedAvg(a, c) FROM T GROUP BY TUMBLE(ts, INTERVAL '1' HOUR)",
            kind: PlanErrorKind::Validation,
            message: "argument 2 expects BIGINT, got VARCHAR",
        },
        Case {
            name: "having",
            sql: "SELECT SUM(a) FROM T GROUP BY TUMBLE(ts, INTERVAL '1' HOUR) HAVING SUM(a) > 0",
            kind: PlanErrorKind::Validation,
            message: "HAVING",
        },
        Case {
            name: "two_windows",
            sql: "SELECT COUNT(*) FROM T GROUP BY TUMBLE(ts, INTERVAL '1' HOUR), SESSION(ts, INTERVAL '1' MINUTE)",
            kind: PlanErrorKind::Validation,
            message: "exactly one window function",
        },
        Case {
            name: "no_window",
            sql: "SELECT COUNT(*) FROM T GROUP BY b",
            kind: PlanErrorKind::Validation,
            message: "exactly one window function",
        },
        Case {
            name: "tumble_arity",
            sql: "SELECT COUNT(*) FROM T GROUP BY TUMBLE(ts)",
            kind: PlanErrorKind::Validation,
            message: "TUMBLE requires 2 or 3 arguments, got 1",
        },
        Case {
            name: "non_grouped_column",
            sql: "SELECT a, COUNT(*) FROM T GROUP BY b, TUMBLE(ts, INTERVAL '1' HOUR)",
            kind: PlanErrorKind::Validation,
            message: "must appear in GROUP BY",
        },
        Case {
            name: "unknown_table",
            sql: "SELECT COUNT(*) FROM missing GROUP BY TUMBLE(ts, INTERVAL '1' HOUR)",
            kind: PlanErrorKind::Validation,
            message: "table not found: missing",
        },
        Case {
            name: "syntax",
            sql: "SELECT SUM(a FROM T GROUP BY TUMBLE(ts, INTERVAL '1' HOUR)",
            kind: PlanErrorKind::Parse,
            message: "",
        },
    ];

    let catalog = setup_catalog();
    let registry = setup_registry();
    for case in cases {
        let err = match plan_sql(case.sql, &catalog, &registry) {
            Ok(plan) => panic!("case={} unexpectedly planned: {:?}", case.name, plan),
            Err(err) => err,
        };
        assert_eq!(err.kind(), case.kind, "case={} err={}", case.name, err);
        assert!(
            err.to_string().contains(case.message),
            "case={} err={}",
            case.name,
            err
        );
    }
}
