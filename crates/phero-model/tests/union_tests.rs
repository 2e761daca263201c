use super::*;
use crate::parser_model::{Member, ParserModel};

fn lit(value: &str) -> ParserModel {
    ParserModel::string_literal(value)
}

fn boolean(value: bool) -> ParserModel {
    ParserModel::BooleanLiteral { literal: value }
}

fn union(one_of: Vec<ParserModel>) -> ParserModel {
    ParserModel::Union { one_of }
}

// =============================================================================
// normalize
// =============================================================================

#[test]
fn test_true_false_pair_is_boolean() {
    assert_eq!(
        normalize(union(vec![boolean(true), boolean(false)])),
        ParserModel::Boolean
    );
    assert_eq!(
        normalize(union(vec![boolean(false), boolean(true)])),
        ParserModel::Boolean
    );
}

#[test]
fn test_pair_with_other_members_appends_boolean() {
    let normalized = normalize(union(vec![boolean(true), boolean(false), lit("x")]));
    assert_eq!(normalized, union(vec![lit("x"), ParserModel::Boolean]));
}

#[test]
fn test_remaining_members_keep_relative_order() {
    let normalized = normalize(union(vec![
        lit("a"),
        boolean(false),
        ParserModel::Null,
        boolean(true),
        lit("b"),
    ]));
    assert_eq!(
        normalized,
        union(vec![lit("a"), ParserModel::Null, lit("b"), ParserModel::Boolean])
    );
}

#[test]
fn test_single_boolean_literal_is_untouched() {
    let input = union(vec![boolean(true), ParserModel::Null]);
    assert_eq!(normalize(input.clone()), input);
}

#[test]
fn test_structurally_equal_members_are_not_deduplicated() {
    let input = union(vec![lit("a"), lit("a"), ParserModel::String]);
    assert_eq!(normalize(input.clone()), input);
}

#[test]
fn test_only_one_pair_is_folded() {
    let normalized = normalize(union(vec![
        boolean(true),
        boolean(true),
        boolean(false),
    ]));
    assert_eq!(normalized, union(vec![boolean(true), ParserModel::Boolean]));
}

#[test]
fn test_non_union_is_returned_unchanged() {
    assert_eq!(normalize(ParserModel::String), ParserModel::String);
    assert_eq!(normalize(boolean(true)), boolean(true));
}

#[test]
fn test_normalize_is_idempotent() {
    let samples = vec![
        union(vec![boolean(true), boolean(false)]),
        union(vec![boolean(true), boolean(false), lit("x")]),
        union(vec![lit("x"), boolean(true)]),
        union(vec![boolean(true), boolean(true), boolean(false), boolean(false)]),
        union(vec![]),
        ParserModel::Object {
            members: vec![Member::new("a", false, ParserModel::String)],
        },
    ];
    for sample in samples {
        let once = normalize(sample.clone());
        let twice = normalize(once.clone());
        assert_eq!(once, twice, "normalize not idempotent for {sample:?}");
    }
}

// =============================================================================
// strip_optional
// =============================================================================

#[test]
fn test_strip_leaves_single_member_bare() {
    assert_eq!(
        strip_optional(union(vec![ParserModel::String, ParserModel::Undefined])),
        ParserModel::String
    );
}

#[test]
fn test_strip_keeps_union_of_remaining_members() {
    assert_eq!(
        strip_optional(union(vec![
            ParserModel::Undefined,
            ParserModel::String,
            ParserModel::Number,
        ])),
        union(vec![ParserModel::String, ParserModel::Number])
    );
}

#[test]
fn test_strip_removes_exactly_one_undefined() {
    assert_eq!(
        strip_optional(union(vec![
            ParserModel::Undefined,
            ParserModel::String,
            ParserModel::Undefined,
        ])),
        union(vec![ParserModel::String, ParserModel::Undefined])
    );
}

#[test]
fn test_strip_undefined_only_union_leaves_it_empty() {
    assert_eq!(
        strip_optional(union(vec![ParserModel::Undefined])),
        union(vec![])
    );
}

#[test]
fn test_strip_ignores_non_unions() {
    let reference = ParserModel::reference("MaybeName");
    assert_eq!(strip_optional(reference.clone()), reference);
    assert_eq!(strip_optional(ParserModel::Undefined), ParserModel::Undefined);
}

#[test]
fn test_strip_without_undefined_is_unchanged() {
    let input = union(vec![ParserModel::String, ParserModel::Null]);
    assert_eq!(strip_optional(input.clone()), input);
}
