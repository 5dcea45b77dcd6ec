//! Expansion of request fields into expression trees.
//!
//! Certain special column names expand into more complex expressions: the
//! reserved time-bucket column becomes a granularity-keyed truncation and
//! `issue` becomes a nested conditional over the fingerprint hash column.
//! The legacy condition triples and the aggregation spelling also expand
//! here.

use once_cell::sync::Lazy;
use regex::Regex;

use super::conditions::{and_cond, binary_condition, in_cond, ConditionFunctions};
use super::expr::{column, function, lit, lit_int, lit_str, Expression, ScalarValue};
use crate::config::Settings;
use crate::request::{
    Condition, ConditionLiteral, ConditionScalar, Fingerprints, Issue, Operator, QueryRequest,
};

static TOPK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^topK\((\d+)\)$").expect("static regex"));

/// The name of the computed issue column.
pub const ISSUE_COLUMN: &str = "issue";

/// Build the nested conditional that maps fingerprint hashes to issue ids.
///
/// For `[(1, [h1, h2]), (2, h3)]` over column `c` this produces
/// `if(in(c, tuple('h1', 'h2')), 1, if(equals(c, 'h3'), 2, 0))`: a
/// right-nested chain evaluated first-pair-first, so the first matching
/// predicate wins. The input order is never reordered. An empty list yields
/// the constant `0`.
pub fn issue_expr(issues: &[Issue], column_name: &str) -> Expression {
    match issues.split_first() {
        None => lit_int(0),
        Some((Issue(issue_id, fingerprints), rest)) => {
            let predicate = match fingerprints {
                Fingerprints::One(hash) => binary_condition(
                    None,
                    ConditionFunctions::EQ,
                    column(column_name),
                    lit_str(hash),
                ),
                Fingerprints::Many(hashes) => in_cond(
                    column(column_name),
                    function("tuple", hashes.iter().map(|h| lit_str(h)).collect()),
                ),
            };
            function(
                "if",
                vec![predicate, lit_int(*issue_id), issue_expr(rest, column_name)],
            )
        }
    }
}

/// The time-truncation expression for a requested granularity.
///
/// Unrecognized granularities fall back to day truncation.
pub fn time_group_expr(granularity: u64, timestamp_column: &str) -> Expression {
    let truncation = match granularity {
        60 => "toStartOfMinute",
        3600 => "toStartOfHour",
        _ => "toDate",
    };
    function(truncation, vec![column(timestamp_column)])
}

/// Expand a requested column name into its expression.
///
/// The reserved time-bucket column and `issue` expand into computed
/// expressions aliased back to the requested name; everything else is a
/// plain column reference.
pub fn column_expr(column_name: &str, request: &QueryRequest, settings: &Settings) -> Expression {
    if column_name == settings.time_group_column {
        time_group_expr(request.granularity, &settings.timestamp_column).with_alias(column_name)
    } else if column_name == ISSUE_COLUMN {
        issue_expr(&request.issues, &settings.hash_column).with_alias(ISSUE_COLUMN)
    } else {
        column(column_name)
    }
}

fn scalar_value(scalar: &ConditionScalar) -> ScalarValue {
    match scalar {
        ConditionScalar::Int(n) => ScalarValue::Int(*n),
        ConditionScalar::Float(f) => ScalarValue::Float(*f),
        ConditionScalar::Str(s) => ScalarValue::Str(s.clone()),
    }
}

fn condition_expr(
    Condition(column_name, operator, literal): &Condition,
    request: &QueryRequest,
    settings: &Settings,
) -> Expression {
    let lhs = column_expr(column_name, request, settings);
    let function_name = match operator {
        Operator::Gt => ConditionFunctions::GT,
        Operator::Lt => ConditionFunctions::LT,
        Operator::Gte => ConditionFunctions::GTE,
        Operator::Lte => ConditionFunctions::LTE,
        Operator::Eq => ConditionFunctions::EQ,
        Operator::In => ConditionFunctions::IN,
    };
    let rhs = match literal {
        ConditionLiteral::Scalar(s) => lit(scalar_value(s)),
        ConditionLiteral::List(items) => function(
            "tuple",
            items.iter().map(|s| lit(scalar_value(s))).collect(),
        ),
    };
    binary_condition(None, function_name, lhs, rhs)
}

/// Fold the request's condition triples into one `and`-combined tree,
/// preserving their order. Returns `None` for an empty list.
pub fn conditions_expr(
    conditions: &[Condition],
    request: &QueryRequest,
    settings: &Settings,
) -> Option<Expression> {
    conditions
        .iter()
        .map(|c| condition_expr(c, request, settings))
        .reduce(and_cond)
}

/// Expand the aggregation spelling into its (possibly curried) call.
///
/// `count` ignores `aggregateby`; `uniq` and `topK(n)` aggregate over it.
/// Returns `None` for spellings outside the validated vocabulary.
pub fn aggregation_expr(aggregation: &str, aggregateby: &str) -> Option<Expression> {
    match aggregation {
        "count" => Some(function("count", vec![])),
        "uniq" => Some(function("uniq", vec![column(aggregateby)])),
        other => {
            let captures = TOPK_RE.captures(other)?;
            let k: i64 = captures.get(1)?.as_str().parse().ok()?;
            Some(curried_topk(k, aggregateby))
        }
    }
}

fn curried_topk(k: i64, aggregateby: &str) -> Expression {
    super::expr::curried_function(function("topK", vec![lit_int(k)]), vec![column(aggregateby)])
}
