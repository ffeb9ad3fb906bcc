//! Lowers filters into the qdrant points-filter message shape. Exact
//! matches cover keywords, integers and booleans; ordering lowers to
//! double-valued ranges; negation nests under `must_not`. Exact float
//! matches and substring matches have no qdrant shape and are refused.

use crate::error::UnsupportedFilter;
use metasift_core::{
    compile::Compiled,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    value::Scalar,
};
use serde::{Deserialize, Serialize};

const BACKEND: &str = "qdrant";

///
/// PointFilter
///
/// Wire shape of a points filter: three condition lists where `must`
/// entries all have to hold, `should` entries disjoin, and `must_not`
/// entries exclude. Serializes to the JSON the points API accepts.
///

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct PointFilter {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Condition>,
}

impl PointFilter {
    /// Every condition has to hold.
    #[must_use]
    pub fn all_of(conditions: Vec<Condition>) -> Self {
        Self {
            must: conditions,
            ..Self::default()
        }
    }

    /// At least one condition has to hold.
    #[must_use]
    pub fn any_of(conditions: Vec<Condition>) -> Self {
        Self {
            should: conditions,
            ..Self::default()
        }
    }

    /// No condition may hold.
    #[must_use]
    pub fn none_of(conditions: Vec<Condition>) -> Self {
        Self {
            must_not: conditions,
            ..Self::default()
        }
    }
}

///
/// Condition
///
/// One entry in a condition list: a field test or a nested filter.
/// Nested filters serialize as the filter object itself, matching the
/// wire format's untagged condition union.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Condition {
    Field(FieldCondition),
    Nested(PointFilter),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct FieldCondition {
    pub key: String,
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub matching: Option<Match>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Range>,
}

///
/// Match
///
/// Typed exact-match payloads, one field per payload kind. Floats only
/// ever appear in ranges.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Match {
    Keyword(String),
    Integer(i64),
    Boolean(bool),
    Keywords(Vec<String>),
    Integers(Vec<i64>),
}

/// Half-open or closed numeric bounds; unset sides are absent on the wire.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Range {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gte: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lte: Option<f64>,
}

// ------------------------------------------------------------------------
// Compilation
// ------------------------------------------------------------------------

/// Lower a filter into a points filter, simplifying vacuous subtrees to
/// the [`Compiled`] sentinels. `AllRows` means "send no filter at all";
/// the points API has no native contradiction, so `NoRows` callers must
/// skip the query instead.
pub fn compile(filter: &Filter) -> Result<Compiled<PointFilter>, UnsupportedFilter> {
    match filter {
        Filter::Compare(cmp) => compile_compare(cmp),
        Filter::Membership(set) => compile_membership(set),
        Filter::And(lhs, rhs) => compile(lhs)?.and_with(|| compile(rhs), conjoin),
        Filter::Or(lhs, rhs) => compile(lhs)?.or_with(|| compile(rhs), disjoin),
        Filter::Not(inner) => Ok(compile(inner)?.negate(exclude)),
    }
}

fn conjoin(left: PointFilter, right: PointFilter) -> PointFilter {
    PointFilter::all_of(vec![Condition::Nested(left), Condition::Nested(right)])
}

fn disjoin(left: PointFilter, right: PointFilter) -> PointFilter {
    PointFilter::any_of(vec![Condition::Nested(left), Condition::Nested(right)])
}

fn exclude(inner: PointFilter) -> PointFilter {
    PointFilter::none_of(vec![Condition::Nested(inner)])
}

// ------------------------------------------------------------------------
// Leaves
// ------------------------------------------------------------------------

fn compile_compare(cmp: &Compare) -> Result<Compiled<PointFilter>, UnsupportedFilter> {
    let condition = match cmp.op {
        CompareOp::Eq => match_condition(&cmp.key, exact_match(cmp)?),
        CompareOp::Ne => {
            let positive = match_condition(&cmp.key, exact_match(cmp)?);
            return Ok(Compiled::Clause(PointFilter::none_of(vec![positive])));
        }
        CompareOp::Gt => range_condition(
            &cmp.key,
            Range {
                gt: Some(bound(cmp)?),
                ..Range::default()
            },
        ),
        CompareOp::Gte => range_condition(
            &cmp.key,
            Range {
                gte: Some(bound(cmp)?),
                ..Range::default()
            },
        ),
        CompareOp::Lt => range_condition(
            &cmp.key,
            Range {
                lt: Some(bound(cmp)?),
                ..Range::default()
            },
        ),
        CompareOp::Lte => range_condition(
            &cmp.key,
            Range {
                lte: Some(bound(cmp)?),
                ..Range::default()
            },
        ),
        CompareOp::Contains => {
            return Err(UnsupportedFilter::Contains {
                backend: BACKEND,
                key: cmp.key.clone(),
            });
        }
    };

    Ok(Compiled::Clause(PointFilter::all_of(vec![condition])))
}

fn compile_membership(set: &Membership) -> Result<Compiled<PointFilter>, UnsupportedFilter> {
    let Some(first) = set.values.first() else {
        // Degenerate sets decide before any condition is built.
        return Ok(match set.op {
            SetOp::In => Compiled::NoRows,
            SetOp::NotIn => Compiled::AllRows,
        });
    };

    let matching = match first {
        Scalar::Text(_) => Match::Keywords(keyword_members(set)?),
        Scalar::Int32(_) | Scalar::Int64(_) => Match::Integers(integer_members(set)?),
        Scalar::Bool(_) | Scalar::Float32(_) | Scalar::Float64(_) => {
            return Err(unlistable(set, first));
        }
    };

    let condition = match_condition(&set.key, matching);
    Ok(Compiled::Clause(match set.op {
        SetOp::In => PointFilter::all_of(vec![condition]),
        SetOp::NotIn => PointFilter::none_of(vec![condition]),
    }))
}

fn match_condition(key: &str, matching: Match) -> Condition {
    Condition::Field(FieldCondition {
        key: key.to_string(),
        matching: Some(matching),
        range: None,
    })
}

fn range_condition(key: &str, range: Range) -> Condition {
    Condition::Field(FieldCondition {
        key: key.to_string(),
        matching: None,
        range: Some(range),
    })
}

fn exact_match(cmp: &Compare) -> Result<Match, UnsupportedFilter> {
    match &cmp.value {
        Scalar::Text(v) => Ok(Match::Keyword(v.clone())),
        Scalar::Int32(v) => Ok(Match::Integer(i64::from(*v))),
        Scalar::Int64(v) => Ok(Match::Integer(*v)),
        Scalar::Bool(v) => Ok(Match::Boolean(*v)),
        Scalar::Float32(_) | Scalar::Float64(_) => Err(UnsupportedFilter::FloatEquality {
            backend: BACKEND,
            key: cmp.key.clone(),
            found: cmp.value.scalar_type(),
        }),
    }
}

// Bounds are doubles on the wire; integers wider than the f64 mantissa
// round, which mirrors how the server compares them.
#[expect(clippy::cast_precision_loss)]
fn bound(cmp: &Compare) -> Result<f64, UnsupportedFilter> {
    match &cmp.value {
        Scalar::Int32(v) => Ok(f64::from(*v)),
        Scalar::Int64(v) => Ok(*v as f64),
        Scalar::Float32(v) => Ok(f64::from(*v)),
        Scalar::Float64(v) => Ok(*v),
        Scalar::Bool(_) | Scalar::Text(_) => Err(UnsupportedFilter::NonNumericRange {
            backend: BACKEND,
            key: cmp.key.clone(),
            found: cmp.value.scalar_type(),
        }),
    }
}

fn keyword_members(set: &Membership) -> Result<Vec<String>, UnsupportedFilter> {
    set.values
        .iter()
        .map(|value| match value {
            Scalar::Text(v) => Ok(v.clone()),
            other => Err(unlistable(set, other)),
        })
        .collect()
}

fn integer_members(set: &Membership) -> Result<Vec<i64>, UnsupportedFilter> {
    set.values
        .iter()
        .map(|value| match value {
            Scalar::Int32(v) => Ok(i64::from(*v)),
            Scalar::Int64(v) => Ok(*v),
            other => Err(unlistable(set, other)),
        })
        .collect()
}

fn unlistable(set: &Membership, member: &Scalar) -> UnsupportedFilter {
    UnsupportedFilter::UnlistableMembers {
        backend: BACKEND,
        key: set.key.clone(),
        found: member.scalar_type(),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use metasift_core::{filter::key, value::ScalarType};
    use serde_json::json;

    fn compiled(filter: &Filter) -> PointFilter {
        compile(filter).unwrap().clause().unwrap()
    }

    fn wire(filter: &Filter) -> serde_json::Value {
        serde_json::to_value(compiled(filter)).unwrap()
    }

    // ---- exact matches -------------------------------------------------

    #[test]
    fn equality_becomes_a_typed_match() {
        assert_eq!(
            wire(&key("genre").eq("comedy").unwrap()),
            json!({ "must": [{ "key": "genre", "match": { "keyword": "comedy" } }] })
        );
        assert_eq!(
            wire(&key("year").eq(2024_i32).unwrap()),
            json!({ "must": [{ "key": "year", "match": { "integer": 2024 } }] })
        );
        assert_eq!(
            wire(&key("restricted").eq(false).unwrap()),
            json!({ "must": [{ "key": "restricted", "match": { "boolean": false } }] })
        );
    }

    #[test]
    fn inequality_wraps_the_match_in_must_not() {
        assert_eq!(
            wire(&key("genre").ne("drama").unwrap()),
            json!({ "must_not": [{ "key": "genre", "match": { "keyword": "drama" } }] })
        );
    }

    #[test]
    fn float_equality_is_refused() {
        let err = compile(&key("score").eq(7.5_f64).unwrap()).unwrap_err();
        assert!(matches!(err, UnsupportedFilter::FloatEquality { .. }));

        let err = compile(&key("score").ne(7.5_f32).unwrap()).unwrap_err();
        assert!(matches!(err, UnsupportedFilter::FloatEquality { .. }));
    }

    // ---- ranges --------------------------------------------------------

    #[test]
    fn orderings_become_ranges() {
        assert_eq!(
            wire(&key("year").gt(2000_i32).unwrap()),
            json!({ "must": [{ "key": "year", "range": { "gt": 2000.0 } }] })
        );
        assert_eq!(
            wire(&key("score").lte(7.5_f64).unwrap()),
            json!({ "must": [{ "key": "score", "range": { "lte": 7.5 } }] })
        );
    }

    #[test]
    fn ranges_need_numeric_bounds() {
        let err = compile(&key("genre").gt("m").unwrap()).unwrap_err();
        assert_eq!(
            err,
            UnsupportedFilter::NonNumericRange {
                backend: "qdrant",
                key: "genre".into(),
                found: ScalarType::Text,
            }
        );
    }

    // ---- membership ----------------------------------------------------

    #[test]
    fn membership_becomes_a_list_match() {
        assert_eq!(
            wire(&key("genre").is_in(["war", "comedy"]).unwrap()),
            json!({ "must": [{ "key": "genre", "match": { "keywords": ["war", "comedy"] } }] })
        );
        assert_eq!(
            wire(&key("year").is_in(vec![Scalar::Int32(2023), Scalar::Int64(2024)]).unwrap()),
            json!({ "must": [{ "key": "year", "match": { "integers": [2023, 2024] } }] })
        );
        assert_eq!(
            wire(&key("genre").not_in(["war"]).unwrap()),
            json!({ "must_not": [{ "key": "genre", "match": { "keywords": ["war"] } }] })
        );
    }

    #[test]
    fn float_members_cannot_be_listed() {
        let err = compile(&key("score").is_in([7.5_f64]).unwrap()).unwrap_err();
        assert!(matches!(err, UnsupportedFilter::UnlistableMembers { .. }));

        // A numeric set may legally mix widths; the float member decides.
        let mixed = key("score")
            .is_in(vec![Scalar::Int64(7), Scalar::Float64(7.5)])
            .unwrap();
        let err = compile(&mixed).unwrap_err();
        assert!(matches!(
            err,
            UnsupportedFilter::UnlistableMembers {
                found: ScalarType::Float64,
                ..
            }
        ));
    }

    #[test]
    fn degenerate_sets_decide_without_conditions() {
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

        assert_eq!(compile(&empty_in), Ok(Compiled::NoRows));
        assert_eq!(compile(&empty_not_in), Ok(Compiled::AllRows));

        // A deciding sentinel skips the other side, unsupported or not.
        let contains = key("genre").contains("com").unwrap();
        assert_eq!(compile(&empty_in.and(contains)), Ok(Compiled::NoRows));
    }

    // ---- composition ---------------------------------------------------

    #[test]
    fn conjunction_nests_both_sides_under_must() {
        let filter = key("genre").eq("comedy").unwrap() & key("year").eq(2024_i32).unwrap();

        assert_eq!(
            wire(&filter),
            json!({
                "must": [
                    { "must": [{ "key": "genre", "match": { "keyword": "comedy" } }] },
                    { "must": [{ "key": "year", "match": { "integer": 2024 } }] },
                ]
            })
        );
    }

    #[test]
    fn disjunction_nests_both_sides_under_should() {
        let filter = key("genre").eq("comedy").unwrap() | key("genre").eq("war").unwrap();
        let point = compiled(&filter);

        assert_eq!(point.should.len(), 2);
        assert!(point.must.is_empty());
        assert!(point.must_not.is_empty());
    }

    #[test]
    fn negation_nests_under_must_not() {
        let filter = !(key("genre").eq("comedy").unwrap());

        assert_eq!(
            wire(&filter),
            json!({
                "must_not": [
                    { "must": [{ "key": "genre", "match": { "keyword": "comedy" } }] },
                ]
            })
        );
    }

    #[test]
    fn substring_matching_is_refused() {
        let err = compile(&key("title").contains("night").unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "qdrant has no substring match for key \"title\""
        );
    }

    #[test]
    fn wire_form_round_trips() {
        let filter =
            key("genre").is_in(["war", "comedy"]).unwrap() & !key("year").lt(1990_i32).unwrap();

        let sent = compiled(&filter);
        let json = serde_json::to_string(&sent).unwrap();
        let back: PointFilter = serde_json::from_str(&json).unwrap();

        assert_eq!(back, sent);
    }
}
