//! Statement rendering for the columnar store dialect.
//!
//! Serializes literal values and expression trees into statement text.
//! Rendering is total over well-formed trees; the only failures are
//! contract bugs (a value that cannot be expressed, such as a non-finite
//! float), which abort statement construction rather than emit malformed
//! output.

use crate::query::conditions::{BooleanFunctions, ConditionFunctions};
use crate::query::expr::{Expression, ScalarValue};
use crate::query::Query;

/// Errors raised while rendering a statement.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot render non-finite number {0} as a literal")]
    NonFiniteNumber(f64),
}

/// Quote a string for use in a statement, escaping embedded quotes.
pub fn escape_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Render a scalar literal.
///
/// Date-times render as a type-tagged constructor call with second
/// precision and no timezone suffix; dates likewise without the time part.
pub fn escape_literal(value: &ScalarValue) -> Result<String, RenderError> {
    match value {
        ScalarValue::Null => Ok("NULL".into()),
        ScalarValue::Bool(b) => Ok(if *b { "1" } else { "0" }.into()),
        ScalarValue::Str(s) => Ok(escape_string(s)),
        ScalarValue::Int(n) => Ok(n.to_string()),
        ScalarValue::Float(f) => {
            if f.is_finite() {
                Ok(f.to_string())
            } else {
                Err(RenderError::NonFiniteNumber(*f))
            }
        }
        ScalarValue::Date(d) => Ok(format!("toDate('{}')", d.format("%Y-%m-%d"))),
        ScalarValue::DateTime(dt) => {
            Ok(format!("toDateTime('{}')", dt.format("%Y-%m-%dT%H:%M:%S")))
        }
    }
}

/// The infix operator spelling for the comparison vocabulary, if any.
fn infix_operator(function_name: &str) -> Option<&'static str> {
    match function_name {
        _ if function_name == ConditionFunctions::EQ => Some("="),
        _ if function_name == ConditionFunctions::NEQ => Some("!="),
        _ if function_name == ConditionFunctions::LT => Some("<"),
        _ if function_name == ConditionFunctions::LTE => Some("<="),
        _ if function_name == ConditionFunctions::GT => Some(">"),
        _ if function_name == ConditionFunctions::GTE => Some(">="),
        _ if function_name == ConditionFunctions::IN => Some("IN"),
        _ => None,
    }
}

/// Render an expression tree to statement text.
pub fn render_expression(expression: &Expression) -> Result<String, RenderError> {
    let body = match expression {
        Expression::Column {
            column_name,
            table_name,
            ..
        } => match table_name {
            Some(table) => format!("{table}.{column_name}"),
            None => column_name.clone(),
        },

        Expression::Literal { value, .. } => escape_literal(value)?,

        Expression::FunctionCall {
            function_name,
            parameters,
            ..
        } => render_call(function_name, parameters)?,

        Expression::CurriedFunctionCall {
            internal_function,
            parameters,
            ..
        } => {
            let outer = parameters
                .iter()
                .map(render_expression)
                .collect::<Result<Vec<_>, _>>()?;
            format!(
                "{}({})",
                render_expression(internal_function)?,
                outer.join(", ")
            )
        }
    };

    Ok(match expression.alias() {
        Some(alias) => format!("({body} AS {alias})"),
        None => body,
    })
}

fn render_call(function_name: &str, parameters: &[Expression]) -> Result<String, RenderError> {
    if let ([lhs, rhs], Some(op)) = (parameters, infix_operator(function_name)) {
        return Ok(format!(
            "{} {op} {}",
            render_expression(lhs)?,
            render_expression(rhs)?
        ));
    }

    let args = parameters
        .iter()
        .map(render_expression)
        .collect::<Result<Vec<_>, _>>()?;

    let boolean = function_name == BooleanFunctions::AND || function_name == BooleanFunctions::OR;
    if boolean && args.len() == 2 {
        return Ok(format!(
            "({} {} {})",
            args[0],
            function_name.to_uppercase(),
            args[1]
        ));
    }

    // A tuple is a parenthesized, comma-joined list
    if function_name == "tuple" {
        return Ok(format!("({})", args.join(", ")));
    }

    Ok(format!("{function_name}({})", args.join(", ")))
}

/// Render the full statement for a processed query.
pub fn render_statement(query: &Query) -> Result<String, RenderError> {
    let selected = query
        .selected_columns()
        .iter()
        .map(render_expression)
        .collect::<Result<Vec<_>, _>>()?;

    let mut statement = format!(
        "SELECT {} FROM {}",
        selected.join(", "),
        query.table_source().table_name()
    );

    if let Some(condition) = query.condition() {
        statement.push_str(" WHERE ");
        statement.push_str(&render_expression(condition)?);
    }

    if !query.groupby().is_empty() {
        let groupby = query
            .groupby()
            .iter()
            .map(render_groupby_entry)
            .collect::<Result<Vec<_>, _>>()?;
        statement.push_str(" GROUP BY ");
        statement.push_str(&groupby.join(", "));
    }

    Ok(statement)
}

/// Group-by entries that also appear aliased in the select list are
/// referenced by alias rather than repeated in full.
fn render_groupby_entry(expression: &Expression) -> Result<String, RenderError> {
    match expression.alias() {
        Some(alias) => Ok(alias.to_string()),
        None => render_expression(expression),
    }
}
