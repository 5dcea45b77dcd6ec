//! # Strata
//!
//! The query-translation core of a columnar analytics service.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │              JSON request body                           │
//! │  (conditions, date window, issues, groupby, aggregation) │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [request: parse + default + validate]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 Query (Expression trees)                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [processors: bottom-up rewrites]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Normalized Query                            │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [render]
//! ┌─────────────────────────────────────────────────────────┐
//! │              Statement for the columnar store            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Execution against the store and the surrounding HTTP surface are
//! external collaborators; [`results`] reshapes their tabular output
//! back into the typed response.

pub mod compile;
pub mod config;
pub mod query;
pub mod render;
pub mod request;
pub mod results;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{translate, TranslateError, Translation};
    pub use crate::config::Settings;
    pub use crate::query::conditions::{
        and_cond, binary_condition, in_cond, or_cond, BooleanFunctions, ConditionFunctions,
    };
    pub use crate::query::expr::{
        column, curried_function, function, lit, lit_date, lit_datetime, lit_float, lit_int,
        lit_null, lit_str, table_column, Expression, ScalarValue,
    };
    pub use crate::query::processors::{BasicFunctionsProcessor, Pipeline, QueryProcessor};
    pub use crate::query::{Query, TableSource};
    pub use crate::request::{parse_and_default, validate, QueryRequest, RequestSettings};
}

// Also export the workhorse types at the crate root
pub use config::Settings;
pub use query::expr::{Expression, ScalarValue};
pub use query::{Query, TableSource};
