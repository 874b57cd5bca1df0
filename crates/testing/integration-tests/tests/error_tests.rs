//! Rejected inputs and the errors reported for them

use cr_driver::DriverError;
use cr_regionck::{RegionckError, TypeErrorKind, Unsupported};
use integration_tests::{check, check_with_toml};

const BORROW_THEN_REASSIGN: &str = include_str!("fixtures/borrow_then_reassign.json");

#[test]
fn test_unresolved_name() {
    let err = check(
        r#"{
            "name": "f",
            "nodes": [
                { "id": 0, "kind": "start", "succ": [1] },
                { "id": 1, "kind": "inst_list", "stmts": [
                    { "kind": "expr", "expr": { "kind": "var", "name": "ghost" } }
                ] }
            ]
        }"#,
    )
    .unwrap_err();

    assert!(matches!(err, DriverError::UnresolvedName { node: 1, .. }));
    assert_eq!(err.to_string(), "node 1: `ghost` is not declared");
}

#[test]
fn test_mixed_copyability() {
    let err = check(
        r#"{
            "name": "f",
            "params": [
                { "name": "p", "ty": { "kind": "pointer", "pointee": { "kind": "builtin", "name": "int" } } }
            ],
            "nodes": [
                { "id": 0, "kind": "start", "succ": [1] },
                { "id": 1, "kind": "inst_list", "span": { "start": 10, "end": 20 }, "stmts": [
                    { "kind": "decl", "name": "x", "ty": { "kind": "builtin", "name": "int" },
                      "init": { "kind": "var", "name": "p" } }
                ] }
            ]
        }"#,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "type error at file#0@10..20: cannot assign `int *` to `int`: \
         copyable and non-copyable types do not mix"
    );
    assert_eq!(err.span().unwrap().span.end, 20);
}

#[test]
fn test_switch_is_unsupported() {
    let err = check(
        r#"{
            "name": "f",
            "params": [{ "name": "x", "ty": { "kind": "builtin", "name": "int" } }],
            "nodes": [
                { "id": 0, "kind": "start", "succ": [1] },
                { "id": 1, "kind": "switch", "discriminant": { "kind": "var", "name": "x" } }
            ]
        }"#,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        DriverError::Regionck(RegionckError::UnsupportedConstruct {
            construct: Unsupported::SwitchStatement,
            ..
        })
    ));
}

#[test]
fn test_elaborated_parameter_type() {
    let err = check(
        r#"{
            "name": "f",
            "params": [{ "name": "s", "ty": { "kind": "elaborated", "keyword": "struct", "name": "node" } }],
            "nodes": [{ "id": 0, "kind": "start" }]
        }"#,
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        "unsupported construct at file#0@0..0: elaborated type `struct node` is not supported"
    );
}

#[test]
fn test_borrow_into_integer() {
    let err = check(
        r#"{
            "name": "f",
            "nodes": [
                { "id": 0, "kind": "start", "succ": [1] },
                { "id": 1, "kind": "inst_list", "stmts": [
                    { "kind": "decl", "name": "a", "ty": { "kind": "builtin", "name": "int" } },
                    { "kind": "decl", "name": "x", "ty": { "kind": "builtin", "name": "int" },
                      "init": { "kind": "addr_of", "operand": { "kind": "var", "name": "a" } } }
                ] }
            ]
        }"#,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        DriverError::Regionck(RegionckError::TypeError {
            kind: TypeErrorKind::BorrowIntoNonReference { .. },
            ..
        })
    ));
}

#[test]
fn test_malformed_json() {
    let err = check(r#"{ "name": "f", "nodes": [ { "id": 0, "kind": "teleport" } ] }"#).unwrap_err();

    assert!(matches!(err, DriverError::Json(_)));
}

#[test]
fn test_invalid_configuration() {
    let err = check_with_toml(BORROW_THEN_REASSIGN, r#"join_policy = "sometimes""#).unwrap_err();

    assert!(matches!(err, DriverError::Config(_)));
}
