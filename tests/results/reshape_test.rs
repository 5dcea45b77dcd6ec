//! Result-set reshaping into the typed response.

use serde_json::json;
use strata::results::{reshape, ColumnMeta};

#[test]
fn test_response_shape() {
    let result = reshape(
        vec![vec![json!(1), json!(10)], vec![json!(2), json!(20)]],
        vec![
            ColumnMeta::new("issue", "UInt64"),
            ColumnMeta::new("aggregate", "UInt64"),
        ],
    );

    let rendered = serde_json::to_value(&result).expect("serialize");
    assert_eq!(
        rendered,
        json!({
            "data": [
                {"issue": 1, "aggregate": 10},
                {"issue": 2, "aggregate": 20},
            ],
            "meta": [
                {"name": "issue", "type": "UInt64"},
                {"name": "aggregate", "type": "UInt64"},
            ],
        })
    );
}

#[test]
fn test_datetime_columns_normalized_to_utc() {
    let result = reshape(
        vec![vec![json!("2021-03-04 05:06:07"), json!("2021-03-04"), json!("untouched")]],
        vec![
            ColumnMeta::new("received", "DateTime"),
            ColumnMeta::new("day", "Date"),
            ColumnMeta::new("message", "String"),
        ],
    );

    assert_eq!(result.data[0]["received"], json!("2021-03-04T05:06:07+00:00"));
    assert_eq!(result.data[0]["day"], json!("2021-03-04T00:00:00+00:00"));
    assert_eq!(result.data[0]["message"], json!("untouched"));
}

#[test]
fn test_iso_input_datetime_accepted() {
    let result = reshape(
        vec![vec![json!("2021-03-04T05:06:07")]],
        vec![ColumnMeta::new("received", "DateTime")],
    );
    assert_eq!(result.data[0]["received"], json!("2021-03-04T05:06:07+00:00"));
}

#[test]
fn test_unparseable_cells_pass_through() {
    let result = reshape(
        vec![vec![json!("not a date"), json!(17)]],
        vec![
            ColumnMeta::new("received", "DateTime"),
            ColumnMeta::new("other", "DateTime"),
        ],
    );
    assert_eq!(result.data[0]["received"], json!("not a date"));
    assert_eq!(result.data[0]["other"], json!(17));
}
