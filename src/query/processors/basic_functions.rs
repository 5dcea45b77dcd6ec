//! Normalization of basic aggregate functions.
//!
//! Some aggregates return NULL on empty input where callers expect a typed
//! default. This pass wraps them in `ifNull` with that default, and renames
//! the legacy curried `top(...)` spelling to `topK(...)`. Matching happens
//! bottom-up via [`Query::transform_expressions`], so occurrences nested
//! anywhere in a tree are caught.

use super::QueryProcessor;
use crate::query::expr::{lit, Expression, ScalarValue};
use crate::query::Query;
use crate::request::RequestSettings;

/// Wraps `uniq(x)` as `ifNull(uniq(x), 0)` and `emptyIfNull(x)` as
/// `ifNull(emptyIfNull(x), '')`, and renames curried `top` to `topK`.
pub struct BasicFunctionsProcessor;

impl QueryProcessor for BasicFunctionsProcessor {
    fn process_query(&self, query: &mut Query, _settings: &RequestSettings) {
        query.transform_expressions(&normalize);
    }
}

/// The NULL default forced for an aggregate, if it needs one.
fn default_for_aggregate(function_name: &str) -> Option<ScalarValue> {
    match function_name {
        "uniq" => Some(ScalarValue::Int(0)),
        "emptyIfNull" => Some(ScalarValue::Str(String::new())),
        _ => None,
    }
}

/// If `e` is already a canonical wrap `ifNull(agg(...), default)`, return
/// the default it carries.
fn canonical_wrap_default(e: &Expression) -> Option<&ScalarValue> {
    if let Expression::FunctionCall {
        function_name,
        parameters,
        ..
    } = e
    {
        if function_name == "ifNull" {
            if let [Expression::FunctionCall {
                function_name: aggregate,
                ..
            }, Expression::Literal { value, .. }] = parameters.as_slice()
            {
                if default_for_aggregate(aggregate).as_ref() == Some(value) {
                    return Some(value);
                }
            }
        }
    }
    None
}

fn normalize(exp: Expression) -> Expression {
    match exp {
        Expression::FunctionCall {
            alias,
            function_name,
            parameters,
        } => {
            // Running the pass again must not wrap twice: the aggregate
            // inside an existing wrapper gets re-wrapped bottom-up, leaving
            // ifNull(ifNull(agg, d), d); collapse the redundant layer.
            if function_name == "ifNull" {
                let redundant = match parameters.as_slice() {
                    [inner, Expression::Literal { value, .. }] => {
                        canonical_wrap_default(inner) == Some(value)
                    }
                    _ => false,
                };
                if redundant {
                    let mut parameters = parameters;
                    let inner = parameters.swap_remove(0);
                    return match alias {
                        Some(a) => inner.with_alias(a),
                        None => inner,
                    };
                }
                return Expression::FunctionCall {
                    alias,
                    function_name,
                    parameters,
                };
            }

            if let Some(default) = default_for_aggregate(&function_name) {
                // The alias moves to the wrapper so the projected name is
                // unchanged.
                let aggregate = Expression::FunctionCall {
                    alias: None,
                    function_name,
                    parameters,
                };
                return Expression::FunctionCall {
                    alias,
                    function_name: "ifNull".into(),
                    parameters: vec![aggregate, lit(default)],
                };
            }

            Expression::FunctionCall {
                alias,
                function_name,
                parameters,
            }
        }

        // Legacy spelling: top(N)(x) means topK(N)(x). Pure rename.
        Expression::CurriedFunctionCall {
            alias,
            internal_function,
            parameters,
        } => match *internal_function {
            Expression::FunctionCall {
                alias: internal_alias,
                function_name,
                parameters: internal_parameters,
            } if function_name == "top" => Expression::CurriedFunctionCall {
                alias,
                internal_function: Box::new(Expression::FunctionCall {
                    alias: internal_alias,
                    function_name: "topK".into(),
                    parameters: internal_parameters,
                }),
                parameters,
            },
            other => Expression::CurriedFunctionCall {
                alias,
                internal_function: Box::new(other),
                parameters,
            },
        },

        other => other,
    }
}
