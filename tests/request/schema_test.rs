//! Request parsing, defaulting and validation.

use chrono::{Duration, Utc};
use strata::request::{parse_and_default, validate, Operator, Project};

#[test]
fn test_project_only_fills_every_default() {
    let request = parse_and_default(r#"{"project": 1}"#).expect("parse");
    validate(&request).expect("validate");

    assert!(request.conditions.is_empty());
    assert!(request.issues.is_empty());
    assert_eq!(request.granularity, 3600);
    assert_eq!(request.groupby, "issue");
    assert_eq!(request.aggregation, "count");
    assert_eq!(request.aggregateby, "");
    assert_eq!(request.project, Some(Project::One(1)));

    // from_date/to_date land in the last-5-days .. now window; the two
    // defaults read the clock independently, so allow a second of skew
    let now = Utc::now().naive_utc();
    let window = request.to_date - request.from_date;
    assert!(window >= Duration::days(5) - Duration::seconds(1));
    assert!(window <= Duration::days(5) + Duration::seconds(1));
    assert!(now - request.to_date < Duration::minutes(1));
}

#[test]
fn test_empty_body_fails_on_required_project() {
    let request = parse_and_default("{}").expect("parse");
    let err = validate(&request).expect_err("project is required");
    assert_eq!(err.path, "project");
    assert_eq!(err.constraint, "required field is missing");
}

#[test]
fn test_empty_project_array_rejected() {
    let request = parse_and_default(r#"{"project": []}"#).expect("parse");
    let err = validate(&request).expect_err("empty project list");
    assert_eq!(err.path, "project");
}

#[test]
fn test_explicit_fields_parse() {
    let request = parse_and_default(
        r#"{
            "project": [1, 2],
            "from_date": "2021-01-01T00:00:00",
            "to_date": "2021-01-02T00:00:00",
            "granularity": 60,
            "conditions": [["environment", "IN", ["prod", "canary"]]],
            "issues": [[42, "0123456789abcdef"]],
            "groupby": "environment",
            "aggregation": "topK(10)",
            "aggregateby": "user"
        }"#,
    )
    .expect("parse");
    validate(&request).expect("validate");

    assert_eq!(request.project, Some(Project::Many(vec![1, 2])));
    assert_eq!(request.conditions[0].1, Operator::In);
    assert_eq!(request.from_date.to_string(), "2021-01-01 00:00:00");
}

#[test]
fn test_unknown_operator_names_the_triple() {
    let err = parse_and_default(r#"{"project": 1, "conditions": [["c", "LIKE", "x"]]}"#)
        .expect_err("LIKE is not an operator");
    assert_eq!(err.path, "conditions[0][1]");
}

#[test]
fn test_type_mismatch_names_the_property() {
    let err = parse_and_default(r#"{"project": 1, "granularity": "x"}"#)
        .expect_err("granularity must be a number");
    assert_eq!(err.path, "granularity");

    // a body that is not JSON at all has no property to name
    let err = parse_and_default("not json").expect_err("not JSON");
    assert_eq!(err.path, "(body)");
}

#[test]
fn test_oversized_list_fields_rejected() {
    let conditions: Vec<_> = (0..1001)
        .map(|i| serde_json::json!([format!("tag{i}"), "=", "v"]))
        .collect();
    let body = serde_json::json!({"project": 1, "conditions": conditions}).to_string();
    let request = parse_and_default(&body).expect("parse");
    let err = validate(&request).expect_err("too many conditions");
    assert_eq!(err.path, "conditions");

    let issues: Vec<_> = (0..1001)
        .map(|i| serde_json::json!([i, "0123456789abcdef"]))
        .collect();
    let body = serde_json::json!({"project": 1, "issues": issues}).to_string();
    let request = parse_and_default(&body).expect("parse");
    let err = validate(&request).expect_err("too many issues");
    assert_eq!(err.path, "issues");
}

#[test]
fn test_bad_aggregation_rejected() {
    let request =
        parse_and_default(r#"{"project": 1, "aggregation": "median"}"#).expect("parse");
    let err = validate(&request).expect_err("unknown aggregation");
    assert_eq!(err.path, "aggregation");
}

#[test]
fn test_zero_granularity_rejected() {
    let request = parse_and_default(r#"{"project": 1, "granularity": 0}"#).expect("parse");
    let err = validate(&request).expect_err("granularity must be positive");
    assert_eq!(err.path, "granularity");
}

#[test]
fn test_fingerprint_shape_enforced() {
    // 16 lowercase hex characters, single or list
    let ok = parse_and_default(
        r#"{"project": 1, "issues": [[1, ["0123456789abcdef", "fedcba9876543210"]]]}"#,
    )
    .expect("parse");
    validate(&ok).expect("validate");

    let bad =
        parse_and_default(r#"{"project": 1, "issues": [[1, "0123456789ABCDEF"]]}"#).expect("parse");
    let err = validate(&bad).expect_err("uppercase hex rejected");
    assert_eq!(err.path, "issues[0][1]");

    let empty_list =
        parse_and_default(r#"{"project": 1, "issues": [[1, []]]}"#).expect("parse");
    let err = validate(&empty_list).expect_err("empty fingerprint list rejected");
    assert_eq!(err.path, "issues[0][1]");
}

#[test]
fn test_bad_column_name_in_condition() {
    let request = parse_and_default(r#"{"project": 1, "conditions": [["drop table;", "=", 1]]}"#)
        .expect("parse");
    let err = validate(&request).expect_err("column pattern violated");
    assert_eq!(err.path, "conditions[0][0]");
}
