//! Literal escaping and expression rendering.

use chrono::{NaiveDate, NaiveDateTime};
use strata::query::expand::issue_expr;
use strata::query::expr::{
    column, curried_function, function, lit_bool, lit_float, lit_int, lit_null, lit_str,
    ScalarValue,
};
use strata::render::{escape_literal, escape_string, render_expression, RenderError};
use strata::request::{Fingerprints, Issue};

#[test]
fn test_escape_string() {
    assert_eq!(escape_string("a"), "'a'");
    assert_eq!(escape_string("a'b"), "'a\\'b'");
    assert_eq!(escape_string(r"a\b"), r"'a\\b'");
}

#[test]
fn test_escape_scalars() {
    assert_eq!(escape_literal(&ScalarValue::Int(-3)).unwrap(), "-3");
    assert_eq!(escape_literal(&ScalarValue::Float(1.5)).unwrap(), "1.5");
    assert_eq!(escape_literal(&ScalarValue::Bool(true)).unwrap(), "1");
    assert_eq!(escape_literal(&ScalarValue::Null).unwrap(), "NULL");
    assert_eq!(escape_literal(&ScalarValue::Str("it's".into())).unwrap(), "'it\\'s'");
}

#[test]
fn test_escape_temporal_literals() {
    let date = NaiveDate::from_ymd_opt(2021, 3, 4).unwrap();
    assert_eq!(
        escape_literal(&ScalarValue::Date(date)).unwrap(),
        "toDate('2021-03-04')"
    );

    let dt = NaiveDateTime::parse_from_str("2021-03-04 05:06:07", "%Y-%m-%d %H:%M:%S").unwrap();
    assert_eq!(
        escape_literal(&ScalarValue::DateTime(dt)).unwrap(),
        "toDateTime('2021-03-04T05:06:07')"
    );
}

#[test]
fn test_non_finite_float_aborts_rendering() {
    assert_eq!(
        escape_literal(&ScalarValue::Float(f64::INFINITY)),
        Err(RenderError::NonFiniteNumber(f64::INFINITY))
    );
}

#[test]
fn test_render_basic_expressions() {
    assert_eq!(render_expression(&column("c")).unwrap(), "c");
    assert_eq!(
        render_expression(&function("f", vec![column("c"), lit_int(1)])).unwrap(),
        "f(c, 1)"
    );
    assert_eq!(
        render_expression(&column("c").with_alias("a")).unwrap(),
        "(c AS a)"
    );
    assert_eq!(
        render_expression(&curried_function(
            function("topK", vec![lit_int(10)]),
            vec![column("user")],
        ))
        .unwrap(),
        "topK(10)(user)"
    );
}

#[test]
fn test_render_conditions_as_infix() {
    let cond = function(
        "and",
        vec![
            function("equals", vec![column("a"), lit_str("x")]),
            function(
                "or",
                vec![
                    function("less", vec![column("b"), lit_int(3)]),
                    function("in", vec![
                        column("c"),
                        function("tuple", vec![lit_int(1), lit_int(2)]),
                    ]),
                ],
            ),
        ],
    );
    insta::assert_snapshot!(
        render_expression(&cond).unwrap(),
        @"(a = 'x' AND (b < 3 OR c IN (1, 2)))"
    );
}

#[test]
fn test_render_issue_expression() {
    let issues = vec![
        Issue(1, Fingerprints::Many(vec!["h1".into(), "h2".into()])),
        Issue(2, Fingerprints::One("h3".into())),
    ];
    insta::assert_snapshot!(
        render_expression(&issue_expr(&issues, "primary_hash")).unwrap(),
        @"if(primary_hash IN ('h1', 'h2'), 1, if(primary_hash = 'h3', 2, 0))"
    );
}

#[test]
fn test_render_null_and_bool_arguments() {
    assert_eq!(
        render_expression(&function("f", vec![lit_null(), lit_bool(false), lit_float(2.0)]))
            .unwrap(),
        "f(NULL, 0, 2)"
    );
}
