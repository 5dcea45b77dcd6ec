//! Expression traversal and transform contracts.

use strata::query::expr::{
    column, curried_function, function, lit_int, table_column, Expression,
};

#[test]
fn test_post_order_left_to_right() {
    // eq(f(c1), c2) yields [c1, f(c1), c2, eq(...)]
    let c1 = column("c1");
    let f = function("f", vec![c1.clone()]);
    let c2 = column("c2");
    let eq = function("eq", vec![f.clone(), c2.clone()]);

    let ret: Vec<Expression> = eq.iter().cloned().collect();
    assert_eq!(ret, vec![c1, f, c2, eq]);
}

#[test]
fn test_curried_call_iterates_internal_first() {
    // topK(10)(c1): internal subtree (10, topK(10)), outer parameter, node
    let internal = function("topK", vec![lit_int(10)]);
    let call = curried_function(internal.clone(), vec![column("c1")]);

    let ret: Vec<Expression> = call.iter().cloned().collect();
    assert_eq!(ret, vec![lit_int(10), internal, column("c1"), call]);
}

#[test]
fn test_transform_locality() {
    // Replacing c1 leaves c2 and the function name untouched, and the
    // rebuilt tree iterates exactly as the new shape.
    let tree = function(
        "eq",
        vec![
            function("f", vec![table_column("t1", "c1")]),
            table_column("t1", "c2"),
        ],
    );

    let out = tree.transform(&|e| match e {
        Expression::Column {
            ref column_name, ..
        } if column_name == "c1" => table_column("t1", "c3"),
        other => other,
    });

    let expected = function(
        "eq",
        vec![
            function("f", vec![table_column("t1", "c3")]),
            table_column("t1", "c2"),
        ],
    );
    assert_eq!(out, expected);

    let ret: Vec<Expression> = out.iter().cloned().collect();
    assert_eq!(
        ret,
        vec![
            table_column("t1", "c3"),
            function("f", vec![table_column("t1", "c3")]),
            table_column("t1", "c2"),
            expected,
        ]
    );
}

#[test]
fn test_alias_preserved_through_transform() {
    let aliased = function("f", vec![column("c")]).with_alias("a");
    let out = aliased.clone().transform(&|e| e);
    assert_eq!(out.alias(), Some("a"));
    assert_eq!(out, aliased);
}

#[test]
fn test_transform_can_replace_the_root() {
    let tree = function("f", vec![column("c")]);
    let out = tree.transform(&|e| match e {
        Expression::FunctionCall { .. } => lit_int(1),
        other => other,
    });
    assert_eq!(out, lit_int(1));
}
