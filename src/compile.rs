//! End-to-end translation from a raw request body to a statement.
//!
//! ```text
//! JSON body → parse + default → validate → Query → processors → statement
//! ```
//!
//! # Example
//!
//! ```
//! use strata::compile::translate;
//! use strata::config::Settings;
//! use strata::request::RequestSettings;
//!
//! let body = r#"{"project": 1, "aggregation": "uniq", "aggregateby": "user"}"#;
//! let translation = translate(body, &Settings::default(), &RequestSettings::default())?;
//! assert!(translation.statement.starts_with("SELECT "));
//! # Ok::<(), strata::compile::TranslateError>(())
//! ```

use crate::config::Settings;
use crate::query::conditions::{and_cond, binary_condition, in_cond, ConditionFunctions};
use crate::query::expand::{aggregation_expr, column_expr, conditions_expr};
use crate::query::expr::{column, function, lit_datetime, lit_int, Expression};
use crate::query::processors::Pipeline;
use crate::query::{Query, TableSource};
use crate::render::{render_statement, RenderError};
use crate::request::{
    parse_and_default, validate, QueryRequest, RequestSettings, ValidationError,
};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during translation.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

pub type TranslateResult<T> = Result<T, TranslateError>;

// ============================================================================
// Translation
// ============================================================================

/// A rendered statement plus the processed query it came from.
#[derive(Debug, Clone)]
pub struct Translation {
    pub statement: String,
    pub query: Query,
}

/// Translate a raw JSON request body into a statement for the query source.
pub fn translate(
    raw_body: &str,
    settings: &Settings,
    request_settings: &RequestSettings,
) -> TranslateResult<Translation> {
    let request = parse_and_default(raw_body)?;
    validate(&request)?;

    let mut query = build_query(&request, settings)?;
    Pipeline::default().execute(&mut query, request_settings);

    let statement = render_statement(&query)?;
    log::debug!("translated request into: {statement}");

    Ok(Translation { statement, query })
}

/// Build the query AST from a validated request.
pub fn build_query(request: &QueryRequest, settings: &Settings) -> Result<Query, ValidationError> {
    let groupby = column_expr(&request.groupby, request, settings);

    let aggregation = aggregation_expr(&request.aggregation, &request.aggregateby)
        .ok_or_else(|| ValidationError {
            path: "aggregation".into(),
            constraint: "must be one of count, uniq, or topK(<digits>)".into(),
        })?
        .with_alias("aggregate");

    let mut condition_parts = vec![
        project_condition(request, settings)?,
        binary_condition(
            None,
            ConditionFunctions::GTE,
            column(&settings.timestamp_column),
            lit_datetime(request.from_date),
        ),
        binary_condition(
            None,
            ConditionFunctions::LT,
            column(&settings.timestamp_column),
            lit_datetime(request.to_date),
        ),
    ];
    condition_parts.extend(conditions_expr(&request.conditions, request, settings));

    let condition = condition_parts
        .into_iter()
        .reduce(and_cond)
        .expect("condition_parts is never empty");

    let mut query = Query::new(TableSource::new(&settings.table))
        .with_selected_columns(vec![groupby.clone(), aggregation])
        .with_groupby(vec![groupby])
        .with_condition(condition);
    query.set_extension("granularity", request.granularity.into());

    Ok(query)
}

/// The mandatory project filter: queries select down to the project level.
fn project_condition(
    request: &QueryRequest,
    settings: &Settings,
) -> Result<Expression, ValidationError> {
    let project = request.project.as_ref().ok_or_else(|| ValidationError {
        path: "project".into(),
        constraint: "required field is missing".into(),
    })?;

    let ids = project.ids();
    Ok(match ids.as_slice() {
        [id] => binary_condition(
            None,
            ConditionFunctions::EQ,
            column(&settings.project_column),
            lit_int(*id),
        ),
        _ => in_cond(
            column(&settings.project_column),
            function("tuple", ids.iter().map(|id| lit_int(*id)).collect()),
        ),
    })
}
