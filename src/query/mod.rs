//! Query AST container and its rewrite machinery.
//!
//! - [`expr`] - Expression AST, post-order iteration, bottom-up transform
//! - [`conditions`] - comparison/boolean condition combinators
//! - [`expand`] - request-column expansion (issues, time buckets, triples)
//! - [`processors`] - the semantics-preserving rewrite pipeline

pub mod conditions;
pub mod expand;
pub mod expr;
pub mod processors;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use expr::{Expression, ScalarValue};

// =============================================================================
// Table Source
// =============================================================================

/// Opaque descriptor of the table a query reads from.
///
/// The core passes this through to the renderer without interpreting it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    table_name: String,
}

impl TableSource {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }
}

// =============================================================================
// Query
// =============================================================================

/// A single analytical query: one table source plus the expression trees for
/// the select list, the optional condition and the group-by list.
///
/// A `Query` is created once per request, mutated in place by each processor
/// in the pipeline, and discarded after the statement is rendered. It is
/// single-owner and single-threaded; sub-trees are never shared between
/// queries, so processors rewrite copy-on-write via [`Expression::transform`].
#[derive(Debug, Clone, PartialEq)]
#[must_use = "queries have no effect until rendered"]
pub struct Query {
    table_source: TableSource,
    selected_columns: Vec<Expression>,
    condition: Option<Expression>,
    groupby: Vec<Expression>,
    /// Free-form per-query context carried for processors; never inspected
    /// by the core.
    extensions: Map<String, Value>,
}

impl Query {
    pub fn new(table_source: TableSource) -> Self {
        Self {
            table_source,
            selected_columns: Vec::new(),
            condition: None,
            groupby: Vec::new(),
            extensions: Map::new(),
        }
    }

    pub fn with_selected_columns(mut self, selected_columns: Vec<Expression>) -> Self {
        self.selected_columns = selected_columns;
        self
    }

    pub fn with_condition(mut self, condition: Expression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_groupby(mut self, groupby: Vec<Expression>) -> Self {
        self.groupby = groupby;
        self
    }

    pub fn table_source(&self) -> &TableSource {
        &self.table_source
    }

    pub fn selected_columns(&self) -> &[Expression] {
        &self.selected_columns
    }

    pub fn set_selected_columns(&mut self, selected_columns: Vec<Expression>) {
        self.selected_columns = selected_columns;
    }

    pub fn condition(&self) -> Option<&Expression> {
        self.condition.as_ref()
    }

    pub fn set_condition(&mut self, condition: Option<Expression>) {
        self.condition = condition;
    }

    pub fn groupby(&self) -> &[Expression] {
        &self.groupby
    }

    pub fn set_groupby(&mut self, groupby: Vec<Expression>) {
        self.groupby = groupby;
    }

    /// All root expressions of the query, flattened into one iterator:
    /// the select list, then the group-by list, then the condition.
    pub fn expressions(&self) -> impl Iterator<Item = &Expression> {
        self.selected_columns
            .iter()
            .chain(self.groupby.iter())
            .chain(self.condition.iter())
    }

    /// Rewrite every root expression independently through
    /// [`Expression::transform`], preserving entry order.
    pub fn transform_expressions<F>(&mut self, f: &F)
    where
        F: Fn(Expression) -> Expression,
    {
        let selected = std::mem::take(&mut self.selected_columns);
        self.selected_columns = selected.into_iter().map(|e| e.transform(f)).collect();

        let groupby = std::mem::take(&mut self.groupby);
        self.groupby = groupby.into_iter().map(|e| e.transform(f)).collect();

        if let Some(condition) = self.condition.take() {
            self.condition = Some(condition.transform(f));
        }
    }

    /// Attach a free-form extension value for downstream processors.
    pub fn set_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }

    pub fn extension(&self, key: &str) -> Option<&Value> {
        self.extensions.get(key)
    }
}
