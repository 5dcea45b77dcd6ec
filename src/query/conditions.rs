//! Condition combinators.
//!
//! Conditions are ordinary [`Expression::FunctionCall`] trees built from a
//! fixed vocabulary of comparison and boolean function names. Nothing in the
//! type system privileges them: traversal, transform and rendering treat
//! them exactly like any other function call, so boolean trees can nest
//! without special-casing.

use super::expr::Expression;

/// Comparison function names recognized by convention.
pub struct ConditionFunctions;

impl ConditionFunctions {
    pub const EQ: &'static str = "equals";
    pub const NEQ: &'static str = "notEquals";
    pub const LT: &'static str = "less";
    pub const LTE: &'static str = "lessOrEquals";
    pub const GT: &'static str = "greater";
    pub const GTE: &'static str = "greaterOrEquals";
    pub const IN: &'static str = "in";
}

/// Boolean combinator function names recognized by convention.
pub struct BooleanFunctions;

impl BooleanFunctions {
    pub const AND: &'static str = "and";
    pub const OR: &'static str = "or";
}

/// Build a binary condition: `function_name(lhs, rhs)`.
pub fn binary_condition(
    alias: Option<&str>,
    function_name: &str,
    lhs: Expression,
    rhs: Expression,
) -> Expression {
    Expression::FunctionCall {
        alias: alias.map(Into::into),
        function_name: function_name.into(),
        parameters: vec![lhs, rhs],
    }
}

/// `lhs AND rhs`
pub fn and_cond(lhs: Expression, rhs: Expression) -> Expression {
    binary_condition(None, BooleanFunctions::AND, lhs, rhs)
}

/// `lhs OR rhs`
pub fn or_cond(lhs: Expression, rhs: Expression) -> Expression {
    binary_condition(None, BooleanFunctions::OR, lhs, rhs)
}

/// `lhs IN rhs`
pub fn in_cond(lhs: Expression, rhs: Expression) -> Expression {
    binary_condition(None, ConditionFunctions::IN, lhs, rhs)
}
