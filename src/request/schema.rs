//! Request body schema: parsing, defaulting and validation.
//!
//! The request is consumed in two explicit steps composed at the request
//! handling boundary:
//!
//! 1. [`parse_and_default`] - deserialize the raw JSON and fill statically
//!    declared defaults for absent optional fields;
//! 2. [`validate`] - structural checks over the now-complete body.
//!
//! Both report a single structured [`ValidationError`] naming the offending
//! property path and the violated constraint; the caller surfaces it as a
//! client error and never attempts the query.

use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// How far back the date window reaches when `from_date` is absent.
const DEFAULT_WINDOW_DAYS: i64 = 5;

/// Upper bound on the list-shaped request fields. Expansion builds one tree
/// level per condition and per issue, so this also caps expression depth.
const MAX_LIST_FIELD_LEN: usize = 1_000;

/// Column names and aggregate-by names: word characters only.
static COLUMN_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_]+$").expect("static regex"));

/// Fingerprint hashes: exactly 16 lowercase hex characters.
static FINGERPRINT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-f]{16}$").expect("static regex"));

/// Aggregations beyond the fixed enum: `topK(<digits>)`.
static TOPK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^topK\((\d+)\)$").expect("static regex"));

// =============================================================================
// Error type
// =============================================================================

/// A schema violation: the property path that failed and the constraint it
/// violated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid request: {path}: {constraint}")]
pub struct ValidationError {
    pub path: String,
    pub constraint: String,
}

impl ValidationError {
    fn new(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            constraint: constraint.into(),
        }
    }
}

// =============================================================================
// Request body
// =============================================================================

/// A single legacy condition triple: `[column, operator, literal-or-array]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition(pub String, pub Operator, pub ConditionLiteral);

/// Comparison operators accepted in condition triples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "IN")]
    In,
}

/// A condition literal: one scalar or an array of scalars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionLiteral {
    Scalar(ConditionScalar),
    List(Vec<ConditionScalar>),
}

/// Scalars allowed in condition literals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionScalar {
    Int(i64),
    Float(f64),
    Str(String),
}

/// One issue definition: `[issue_id, fingerprint-or-fingerprints]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue(pub i64, pub Fingerprints);

/// A single fingerprint hash or a non-empty list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fingerprints {
    One(String),
    Many(Vec<String>),
}

/// The project scope: one id or a non-empty list of ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Project {
    One(i64),
    Many(Vec<i64>),
}

impl Project {
    pub fn ids(&self) -> Vec<i64> {
        match self {
            Project::One(id) => vec![*id],
            Project::Many(ids) => ids.clone(),
        }
    }
}

/// A fully-defaulted analytical query request.
///
/// Optional fields carry statically declared defaults, applied during
/// deserialization; `project` is the only required field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    #[serde(default)]
    pub conditions: Vec<Condition>,

    #[serde(default = "default_from_date")]
    pub from_date: NaiveDateTime,

    #[serde(default = "default_to_date")]
    pub to_date: NaiveDateTime,

    #[serde(default = "default_granularity")]
    pub granularity: u64,

    #[serde(default)]
    pub issues: Vec<Issue>,

    /// Required: queries must select down to the project level.
    pub project: Option<Project>,

    #[serde(default = "default_groupby")]
    pub groupby: String,

    #[serde(default)]
    pub aggregateby: String,

    #[serde(default = "default_aggregation")]
    pub aggregation: String,
}

fn default_from_date() -> NaiveDateTime {
    default_to_date() - Duration::days(DEFAULT_WINDOW_DAYS)
}

fn default_to_date() -> NaiveDateTime {
    let now = Utc::now().naive_utc();
    // second precision, matching what the store returns
    now.with_nanosecond(0).unwrap_or(now)
}

fn default_granularity() -> u64 {
    3600
}

fn default_groupby() -> String {
    "issue".into()
}

fn default_aggregation() -> String {
    "count".into()
}

// =============================================================================
// Parse + validate pipeline
// =============================================================================

/// Deserialize a raw JSON body, filling defaults for absent optional fields.
///
/// A deserialization failure names the property it occurred at, such as
/// `granularity` or `conditions[0][1]`; only a body that is not JSON at all
/// is reported against `(body)`.
pub fn parse_and_default(raw: &str) -> Result<QueryRequest, ValidationError> {
    let mut deserializer = serde_json::Deserializer::from_str(raw);
    let request = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = match e.path().to_string() {
            p if p == "." => "(body)".to_string(),
            p => p,
        };
        ValidationError::new(path, format!("malformed request body: {}", e.inner()))
    })?;
    deserializer
        .end()
        .map_err(|e| ValidationError::new("(body)", format!("malformed request body: {e}")))?;
    Ok(request)
}

/// Structural validation over a parsed, defaulted request.
pub fn validate(request: &QueryRequest) -> Result<(), ValidationError> {
    match &request.project {
        None => {
            return Err(ValidationError::new("project", "required field is missing"));
        }
        Some(Project::Many(ids)) if ids.is_empty() => {
            return Err(ValidationError::new(
                "project",
                "must be a number or a non-empty array of numbers",
            ));
        }
        Some(_) => {}
    }

    if request.conditions.len() > MAX_LIST_FIELD_LEN {
        return Err(ValidationError::new(
            "conditions",
            format!("at most {MAX_LIST_FIELD_LEN} entries"),
        ));
    }
    if request.issues.len() > MAX_LIST_FIELD_LEN {
        return Err(ValidationError::new(
            "issues",
            format!("at most {MAX_LIST_FIELD_LEN} entries"),
        ));
    }

    for (i, Condition(column_name, _, _)) in request.conditions.iter().enumerate() {
        if !COLUMN_NAME_RE.is_match(column_name) {
            return Err(ValidationError::new(
                format!("conditions[{i}][0]"),
                "column name must match ^[a-zA-Z0-9_]+$",
            ));
        }
    }

    for (i, Issue(_, fingerprints)) in request.issues.iter().enumerate() {
        let hashes: &[String] = match fingerprints {
            Fingerprints::One(h) => std::slice::from_ref(h),
            Fingerprints::Many(hs) => {
                if hs.is_empty() {
                    return Err(ValidationError::new(
                        format!("issues[{i}][1]"),
                        "fingerprint list must not be empty",
                    ));
                }
                hs
            }
        };
        for hash in hashes {
            if !FINGERPRINT_RE.is_match(hash) {
                return Err(ValidationError::new(
                    format!("issues[{i}][1]"),
                    "fingerprint must be 16 lowercase hex characters",
                ));
            }
        }
    }

    if request.granularity == 0 {
        return Err(ValidationError::new("granularity", "must be positive"));
    }

    if request.groupby != "issue" && !COLUMN_NAME_RE.is_match(&request.groupby) {
        return Err(ValidationError::new(
            "groupby",
            "must be 'issue' or a column name matching ^[a-zA-Z0-9_]+$",
        ));
    }

    if !request.aggregateby.is_empty() && !COLUMN_NAME_RE.is_match(&request.aggregateby) {
        return Err(ValidationError::new(
            "aggregateby",
            "must match ^[a-zA-Z0-9_]*$",
        ));
    }

    match request.aggregation.as_str() {
        "count" | "uniq" => {}
        other if TOPK_RE.is_match(other) => {}
        _ => {
            return Err(ValidationError::new(
                "aggregation",
                "must be one of count, uniq, or topK(<digits>)",
            ));
        }
    }

    Ok(())
}
