//! Expression AST - the core of query translation.
//!
//! This module provides a strongly-typed, immutable AST for the expressions
//! a query selects, groups by and filters on. Every rewrite pass in the
//! processor pipeline is built on the two operations defined here:
//! post-order iteration and bottom-up transform.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Expression AST
// =============================================================================

/// A query expression.
///
/// Expressions are immutable values compared structurally; rewrites build
/// new trees rather than mutating nodes in place. Every variant carries an
/// optional alias, which names the node in the rendered statement.
///
/// Every variant must be handled in [`Expression::transform`] and in the
/// iterator - the compiler enforces this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expression {
    /// Column reference: optional_table.column
    Column {
        alias: Option<String>,
        column_name: String,
        table_name: Option<String>,
    },

    /// Literal scalar value
    Literal {
        alias: Option<String>,
        value: ScalarValue,
    },

    /// Function call: name(parameters...)
    FunctionCall {
        alias: Option<String>,
        function_name: String,
        parameters: Vec<Expression>,
    },

    /// Curried function call: f(inner parameters)(parameters...)
    ///
    /// Example: `topK(10)(column)`. The internal expression must be a
    /// `FunctionCall`; constructors and transforms enforce this at runtime
    /// and a violation is a programming error.
    CurriedFunctionCall {
        alias: Option<String>,
        internal_function: Box<Expression>,
        parameters: Vec<Expression>,
    },
}

/// Scalar literal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ScalarValue {
    Null,
    Bool(bool),
    Str(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

// =============================================================================
// Iteration and transform
// =============================================================================

impl Expression {
    /// The alias of this node, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            Expression::Column { alias, .. }
            | Expression::Literal { alias, .. }
            | Expression::FunctionCall { alias, .. }
            | Expression::CurriedFunctionCall { alias, .. } => alias.as_deref(),
        }
    }

    /// Return this expression with its alias replaced.
    pub fn with_alias(mut self, new_alias: impl Into<String>) -> Self {
        match &mut self {
            Expression::Column { alias, .. }
            | Expression::Literal { alias, .. }
            | Expression::FunctionCall { alias, .. }
            | Expression::CurriedFunctionCall { alias, .. } => *alias = Some(new_alias.into()),
        }
        self
    }

    /// Iterate over all sub-expressions in post-order.
    ///
    /// For a composite node, the full sequence of each child's subtree is
    /// yielded in parameter order before the node itself; a leaf yields only
    /// itself. For a curried call the internal function's subtree comes
    /// first, then the outer parameters, then the curried node.
    ///
    /// The iterator keeps an explicit stack, so tree depth is bounded by
    /// heap, not by the call stack.
    pub fn iter(&self) -> ExpressionIter<'_> {
        ExpressionIter {
            stack: vec![Frame::Enter(self)],
        }
    }

    /// Rebuild this tree bottom-up, applying `f` to every node.
    ///
    /// Children are transformed first; the current node is reassembled with
    /// the transformed children (keeping its own alias and function name)
    /// and only then passed to `f`, so `f` always sees already-rewritten
    /// children. `f` must be pure and total: nodes it does not care about
    /// are returned unchanged.
    ///
    /// Recursion depth follows tree depth. The list-shaped request fields
    /// that expand into long chains are size-capped during validation, so
    /// request-built trees stay well within the stack.
    ///
    /// # Panics
    ///
    /// Panics if `f` turns the internal function of a curried call into a
    /// non-function node; that is a malformed tree, not a recoverable state.
    pub fn transform<F>(self, f: &F) -> Expression
    where
        F: Fn(Expression) -> Expression,
    {
        match self {
            Expression::Column { .. } | Expression::Literal { .. } => f(self),

            Expression::FunctionCall {
                alias,
                function_name,
                parameters,
            } => {
                let parameters = parameters.into_iter().map(|p| p.transform(f)).collect();
                f(Expression::FunctionCall {
                    alias,
                    function_name,
                    parameters,
                })
            }

            Expression::CurriedFunctionCall {
                alias,
                internal_function,
                parameters,
            } => {
                let internal = (*internal_function).transform(f);
                assert!(
                    matches!(internal, Expression::FunctionCall { .. }),
                    "curried call must keep a function call as its internal function"
                );
                let parameters = parameters.into_iter().map(|p| p.transform(f)).collect();
                f(Expression::CurriedFunctionCall {
                    alias,
                    internal_function: Box::new(internal),
                    parameters,
                })
            }
        }
    }
}

impl<'a> IntoIterator for &'a Expression {
    type Item = &'a Expression;
    type IntoIter = ExpressionIter<'a>;

    fn into_iter(self) -> ExpressionIter<'a> {
        self.iter()
    }
}

enum Frame<'a> {
    Enter(&'a Expression),
    Emit(&'a Expression),
}

/// Lazy post-order iterator over an expression tree.
pub struct ExpressionIter<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for ExpressionIter<'a> {
    type Item = &'a Expression;

    fn next(&mut self) -> Option<&'a Expression> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Emit(e) => return Some(e),
                Frame::Enter(e) => {
                    self.stack.push(Frame::Emit(e));
                    match e {
                        Expression::Column { .. } | Expression::Literal { .. } => {}
                        Expression::FunctionCall { parameters, .. } => {
                            for p in parameters.iter().rev() {
                                self.stack.push(Frame::Enter(p));
                            }
                        }
                        Expression::CurriedFunctionCall {
                            internal_function,
                            parameters,
                            ..
                        } => {
                            for p in parameters.iter().rev() {
                                self.stack.push(Frame::Enter(p));
                            }
                            self.stack.push(Frame::Enter(internal_function));
                        }
                    }
                }
            }
        }
        None
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Create an unqualified column reference.
pub fn column(name: &str) -> Expression {
    Expression::Column {
        alias: None,
        column_name: name.into(),
        table_name: None,
    }
}

/// Create a qualified column reference (table.column).
pub fn table_column(table: &str, name: &str) -> Expression {
    Expression::Column {
        alias: None,
        column_name: name.into(),
        table_name: Some(table.into()),
    }
}

/// Create a literal expression.
pub fn lit(value: ScalarValue) -> Expression {
    Expression::Literal { alias: None, value }
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expression {
    lit(ScalarValue::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expression {
    lit(ScalarValue::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expression {
    lit(ScalarValue::Str(s.into()))
}

/// Create a boolean literal.
pub fn lit_bool(b: bool) -> Expression {
    lit(ScalarValue::Bool(b))
}

/// Create a NULL literal.
pub fn lit_null() -> Expression {
    lit(ScalarValue::Null)
}

/// Create a date literal.
pub fn lit_date(d: NaiveDate) -> Expression {
    lit(ScalarValue::Date(d))
}

/// Create a datetime literal.
pub fn lit_datetime(dt: NaiveDateTime) -> Expression {
    lit(ScalarValue::DateTime(dt))
}

/// Create a function call.
pub fn function(name: &str, parameters: Vec<Expression>) -> Expression {
    Expression::FunctionCall {
        alias: None,
        function_name: name.into(),
        parameters,
    }
}

/// Create a curried function call: `internal(...)(parameters...)`.
///
/// # Panics
///
/// Panics if `internal` is not a [`Expression::FunctionCall`].
pub fn curried_function(internal: Expression, parameters: Vec<Expression>) -> Expression {
    assert!(
        matches!(internal, Expression::FunctionCall { .. }),
        "curried call must wrap a function call"
    );
    Expression::CurriedFunctionCall {
        alias: None,
        internal_function: Box::new(internal),
        parameters,
    }
}
