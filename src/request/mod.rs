//! Request parsing, defaulting and validation.

mod schema;
mod settings;

pub use schema::{
    parse_and_default, validate, Condition, ConditionLiteral, ConditionScalar, Fingerprints,
    Issue, Operator, Project, QueryRequest, ValidationError,
};
pub use settings::RequestSettings;
