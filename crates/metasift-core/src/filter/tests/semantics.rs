use crate::{
    error::{InvalidExpression, TypeMismatch},
    filter::{Filter, Membership, SetOp, key},
    metadata::Metadata,
    value::{Scalar, ScalarClass},
};

// ---- helpers -----------------------------------------------------------

fn movie() -> Metadata {
    Metadata::new()
        .with("genre", "comedy")
        .unwrap()
        .with("year", 2024_i32)
        .unwrap()
        .with("score", 7.5_f64)
        .unwrap()
        .with("restricted", false)
        .unwrap()
}

fn holds(filter: &Filter) -> bool {
    filter.matches(&movie()).unwrap()
}

// ---- construction ------------------------------------------------------

#[test]
fn blank_keys_never_build() {
    assert_eq!(key("").eq(1_i32), Err(InvalidExpression::BlankKey));
    assert_eq!(key("  ").contains("x"), Err(InvalidExpression::BlankKey));
    assert_eq!(
        key("\t").is_in(["a", "b"]),
        Err(InvalidExpression::BlankKey)
    );
}

#[test]
fn member_sets_must_be_non_empty_and_uniform() {
    assert_eq!(
        key("year").is_in(Vec::<i32>::new()),
        Err(InvalidExpression::EmptyMemberSet { op: SetOp::In })
    );
    assert_eq!(
        key("year").not_in(Vec::<String>::new()),
        Err(InvalidExpression::EmptyMemberSet { op: SetOp::NotIn })
    );

    let mixed = key("year").is_in(vec![Scalar::Int32(1), Scalar::Text("x".into())]);
    assert_eq!(
        mixed,
        Err(InvalidExpression::MixedMemberSet {
            op: SetOp::In,
            expected: ScalarClass::Numeric,
            found: ScalarClass::Text,
        })
    );

    assert_eq!(
        key("flag").is_in([true, false]),
        Err(InvalidExpression::BooleanMemberSet { op: SetOp::In })
    );
    assert_eq!(
        key("flag").not_in(vec![Scalar::Int32(1), Scalar::Bool(true)]),
        Err(InvalidExpression::BooleanMemberSet { op: SetOp::NotIn })
    );
}

#[test]
fn member_sets_may_mix_numeric_widths() {
    let set = key("score").is_in(vec![
        Scalar::Int32(7),
        Scalar::Int64(8),
        Scalar::Float64(7.5),
    ]);
    assert!(set.is_ok());
    assert!(holds(&set.unwrap()));
}

#[test]
fn membership_misses_on_a_present_key_answer_by_operator() {
    // Stored year is 2024; the set holds neither member.
    assert!(!holds(&key("year").is_in([2022_i32, 2023_i32]).unwrap()));
    assert!(holds(&key("year").not_in([2022_i32, 2023_i32]).unwrap()));

    assert!(holds(&key("year").is_in([2023_i32, 2024_i32]).unwrap()));
    assert!(!holds(&key("year").not_in([2023_i32, 2024_i32]).unwrap()));
}

// ---- presence and absence ----------------------------------------------

#[test]
fn present_key_compares_by_value() {
    assert!(holds(&key("genre").eq("comedy").unwrap()));
    assert!(!holds(&key("genre").eq("drama").unwrap()));
    assert!(holds(&key("genre").ne("drama").unwrap()));
    assert!(holds(&key("year").gt(2020_i32).unwrap()));
    assert!(holds(&key("year").gte(2024_i32).unwrap()));
    assert!(!holds(&key("year").lt(2024_i32).unwrap()));
    assert!(holds(&key("year").lte(2024_i32).unwrap()));
    assert!(!holds(&key("restricted").eq(true).unwrap()));
}

#[test]
fn absent_key_answers_the_operator_identity() {
    assert!(!holds(&key("studio").eq("a24").unwrap()));
    assert!(!holds(&key("studio").gt(1_i32).unwrap()));
    assert!(!holds(&key("studio").lte(1_i32).unwrap()));
    assert!(!holds(&key("studio").contains("a2").unwrap()));
    assert!(!holds(&key("studio").is_in(["a24"]).unwrap()));

    assert!(holds(&key("studio").ne("a24").unwrap()));
    assert!(holds(&key("studio").not_in(["a24"]).unwrap()));
}

#[test]
fn comparisons_cross_numeric_widths() {
    assert!(holds(&key("year").eq(2024_i64).unwrap()));
    assert!(holds(&key("year").lt(2024.5_f64).unwrap()));
    assert!(holds(&key("score").gt(7_i32).unwrap()));
    assert!(holds(&key("score").eq(7.5_f32).unwrap()));
}

// ---- type mismatches ---------------------------------------------------

#[test]
fn present_key_with_wrong_class_is_loud() {
    let err = key("year")
        .eq("2024")
        .unwrap()
        .matches(&movie())
        .unwrap_err();
    assert_eq!(
        err,
        TypeMismatch::new("year", Scalar::Int32(2024), Scalar::Text("2024".into()))
    );

    assert!(key("restricted").eq(0_i32).unwrap().matches(&movie()).is_err());
    assert!(key("genre").gt(1_i32).unwrap().matches(&movie()).is_err());
    assert!(key("year").is_in(["a", "b"]).unwrap().matches(&movie()).is_err());
}

#[test]
fn mismatch_beats_missing_identity_for_ne() {
    // Ne only defaults to true when the key is absent, not when it clashes.
    let err = key("year").ne(true).unwrap().matches(&movie()).unwrap_err();
    assert_eq!(err.key, "year");
}

#[test]
fn contains_requires_text_on_both_sides() {
    assert!(holds(&key("genre").contains("med").unwrap()));
    assert!(holds(&key("genre").contains("").unwrap()));
    assert!(!holds(&key("genre").contains("horror").unwrap()));

    let err = key("year").contains("20").unwrap().matches(&movie());
    assert!(err.is_err());
}

// ---- combinators -------------------------------------------------------

#[test]
fn and_or_not_combine_leaves() {
    let both = key("genre").eq("comedy").unwrap() & key("year").eq(2024_i32).unwrap();
    assert!(holds(&both));

    let either = key("genre").eq("drama").unwrap() | key("year").eq(2024_i32).unwrap();
    assert!(holds(&either));

    let negated = !key("genre").eq("drama").unwrap();
    assert!(holds(&negated));
    assert!(!holds(&!key("genre").eq("comedy").unwrap()));
}

#[test]
fn and_checks_its_right_side_even_when_left_already_failed() {
    let left = key("genre").eq("drama").unwrap();
    let clash = key("year").eq("2024").unwrap();

    assert!((left & clash).matches(&movie()).is_err());
}

#[test]
fn or_checks_its_right_side_even_when_left_already_won() {
    let left = key("genre").eq("comedy").unwrap();
    let clash = key("year").eq("2024").unwrap();

    assert!((left | clash).matches(&movie()).is_err());
}

#[test]
fn leftmost_mismatch_wins() {
    let first = key("genre").eq(1_i32).unwrap();
    let second = key("year").eq("2024").unwrap();

    let err = (first & second).matches(&movie()).unwrap_err();
    assert_eq!(err.key, "genre");
}

#[test]
fn not_propagates_the_inner_error() {
    let clash = key("year").eq("2024").unwrap();
    assert!((!clash).matches(&movie()).is_err());
}

#[test]
fn folds_nest_to_the_left() {
    let a = key("a").eq(1_i32).unwrap();
    let b = key("b").eq(2_i32).unwrap();
    let c = key("c").eq(3_i32).unwrap();

    let folded = Filter::all([a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(folded, a.clone().and(b.clone()).and(c.clone()));

    let folded = Filter::any([a.clone(), b.clone(), c.clone()]).unwrap();
    assert_eq!(folded, a.clone().or(b).or(c));

    assert_eq!(Filter::all(Vec::new()), None);
    assert_eq!(Filter::any([a.clone()]), Some(a));
}

// ---- hand-built degenerate trees ---------------------------------------

#[test]
fn literal_empty_member_set_follows_degenerate_semantics() {
    let empty_in = Filter::Membership(Membership {
        key: "year".into(),
        op: SetOp::In,
        values: vec![],
    });
    let empty_not_in = Filter::Membership(Membership {
        key: "year".into(),
        op: SetOp::NotIn,
        values: vec![],
    });

    assert!(!empty_in.matches(&movie()).unwrap());
    assert!(empty_not_in.matches(&movie()).unwrap());
}

#[test]
fn literal_mixed_member_set_stays_loud_after_a_hit() {
    let set = Filter::Membership(Membership {
        key: "year".into(),
        op: SetOp::In,
        values: vec![Scalar::Int32(2024), Scalar::Text("x".into())],
    });

    let err = set.matches(&movie()).unwrap_err();
    assert_eq!(err.comparand, Scalar::Text("x".into()));
}

// ---- portable serde form -----------------------------------------------

#[test]
fn filter_trees_round_trip_through_json() {
    let filter = (key("genre").eq("comedy").unwrap()
        | key("year").is_in([2023_i32, 2024_i32]).unwrap())
        & !key("restricted").eq(true).unwrap();

    let json = serde_json::to_string(&filter).unwrap();
    let back: Filter = serde_json::from_str(&json).unwrap();

    assert_eq!(back, filter);
}

#[test]
fn serde_shape_is_stable() {
    let filter = key("year").eq(2024_i32).unwrap();

    assert_eq!(
        serde_json::to_value(&filter).unwrap(),
        serde_json::json!({
            "Compare": { "key": "year", "op": "Eq", "value": { "Int32": 2024 } }
        })
    );
}
