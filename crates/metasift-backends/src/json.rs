//! Lowers filters into an operator-tagged JSON where-filter: leaves carry
//! a path and exactly one typed value field, combinators carry operands.
//! Membership maps onto a contains-any operator, its negation onto `Not`
//! over it. Substring matching has no shape here and is refused.

use crate::error::UnsupportedFilter;
use metasift_core::{
    compile::Compiled,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    value::Scalar,
};
use serde::{Deserialize, Serialize};

const BACKEND: &str = "json where-filter";

///
/// WhereFilter
///
/// One node of the where-filter document. Exactly one of the value fields
/// is set on a comparison leaf; combinators set `operands` instead.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhereFilter {
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub operands: Vec<WhereFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_int: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_number: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_text_array: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_int_array: Vec<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value_number_array: Vec<f64>,
}

impl WhereFilter {
    const fn bare(operator: Operator) -> Self {
        Self {
            operator,
            path: Vec::new(),
            operands: Vec::new(),
            value_text: None,
            value_int: None,
            value_number: None,
            value_boolean: None,
            value_text_array: Vec::new(),
            value_int_array: Vec::new(),
            value_number_array: Vec::new(),
        }
    }

    fn leaf(operator: Operator, key: &str) -> Self {
        Self {
            path: vec![key.to_string()],
            ..Self::bare(operator)
        }
    }

    fn combinator(operator: Operator, operands: Vec<Self>) -> Self {
        Self {
            operands,
            ..Self::bare(operator)
        }
    }
}

///
/// Operator
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Operator {
    And,
    Or,
    Not,
    Equal,
    NotEqual,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    ContainsAny,
}

// ------------------------------------------------------------------------
// Compilation
// ------------------------------------------------------------------------

/// Lower a filter into a where-filter document, simplifying vacuous
/// subtrees to the [`Compiled`] sentinels. `AllRows` means "send no
/// where clause at all".
pub fn compile(filter: &Filter) -> Result<Compiled<WhereFilter>, UnsupportedFilter> {
    match filter {
        Filter::Compare(cmp) => compile_compare(cmp),
        Filter::Membership(set) => compile_membership(set),
        Filter::And(lhs, rhs) => compile(lhs)?.and_with(
            || compile(rhs),
            |left, right| WhereFilter::combinator(Operator::And, vec![left, right]),
        ),
        Filter::Or(lhs, rhs) => compile(lhs)?.or_with(
            || compile(rhs),
            |left, right| WhereFilter::combinator(Operator::Or, vec![left, right]),
        ),
        Filter::Not(inner) => Ok(compile(inner)?.negate(negated)),
    }
}

fn negated(operand: WhereFilter) -> WhereFilter {
    WhereFilter::combinator(Operator::Not, vec![operand])
}

// ------------------------------------------------------------------------
// Leaves
// ------------------------------------------------------------------------

fn compile_compare(cmp: &Compare) -> Result<Compiled<WhereFilter>, UnsupportedFilter> {
    let operator = match cmp.op {
        CompareOp::Eq => Operator::Equal,
        CompareOp::Ne => Operator::NotEqual,
        CompareOp::Gt => Operator::GreaterThan,
        CompareOp::Gte => Operator::GreaterThanEqual,
        CompareOp::Lt => Operator::LessThan,
        CompareOp::Lte => Operator::LessThanEqual,
        CompareOp::Contains => {
            return Err(UnsupportedFilter::Contains {
                backend: BACKEND,
                key: cmp.key.clone(),
            });
        }
    };

    let mut leaf = WhereFilter::leaf(operator, &cmp.key);
    match &cmp.value {
        Scalar::Text(v) => leaf.value_text = Some(v.clone()),
        Scalar::Int32(v) => leaf.value_int = Some(i64::from(*v)),
        Scalar::Int64(v) => leaf.value_int = Some(*v),
        Scalar::Float32(v) => leaf.value_number = Some(f64::from(*v)),
        Scalar::Float64(v) => leaf.value_number = Some(*v),
        Scalar::Bool(v) => leaf.value_boolean = Some(*v),
    }

    Ok(Compiled::Clause(leaf))
}

fn compile_membership(set: &Membership) -> Result<Compiled<WhereFilter>, UnsupportedFilter> {
    let Some(first) = set.values.first() else {
        // Degenerate sets decide before any node is built.
        return Ok(match set.op {
            SetOp::In => Compiled::NoRows,
            SetOp::NotIn => Compiled::AllRows,
        });
    };

    let mut any = WhereFilter::leaf(Operator::ContainsAny, &set.key);
    match first {
        Scalar::Text(_) => any.value_text_array = text_members(set)?,
        Scalar::Bool(_) => return Err(unlistable(set, first)),
        Scalar::Int32(_) | Scalar::Int64(_) | Scalar::Float32(_) | Scalar::Float64(_) => {
            // A numeric set may mix widths; one float member moves the
            // whole list into the number array.
            let has_float = set
                .values
                .iter()
                .any(|v| matches!(v, Scalar::Float32(_) | Scalar::Float64(_)));
            if has_float {
                any.value_number_array = number_members(set)?;
            } else {
                any.value_int_array = integer_members(set)?;
            }
        }
    }

    Ok(Compiled::Clause(match set.op {
        SetOp::In => any,
        SetOp::NotIn => negated(any),
    }))
}

fn text_members(set: &Membership) -> Result<Vec<String>, UnsupportedFilter> {
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

#[expect(clippy::cast_precision_loss)]
fn number_members(set: &Membership) -> Result<Vec<f64>, UnsupportedFilter> {
    set.values
        .iter()
        .map(|value| match value {
            Scalar::Int32(v) => Ok(f64::from(*v)),
            Scalar::Int64(v) => Ok(*v as f64),
            Scalar::Float32(v) => Ok(f64::from(*v)),
            Scalar::Float64(v) => Ok(*v),
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
    use metasift_core::filter::key;
    use serde_json::json;

    fn document(filter: &Filter) -> serde_json::Value {
        serde_json::to_value(compile(filter).unwrap().clause().unwrap()).unwrap()
    }

    // ---- comparison leaves ---------------------------------------------

    #[test]
    fn each_scalar_kind_uses_its_typed_field() {
        assert_eq!(
            document(&key("genre").eq("comedy").unwrap()),
            json!({ "operator": "Equal", "path": ["genre"], "valueText": "comedy" })
        );
        assert_eq!(
            document(&key("year").eq(2024_i32).unwrap()),
            json!({ "operator": "Equal", "path": ["year"], "valueInt": 2024 })
        );
        assert_eq!(
            document(&key("score").eq(7.5_f64).unwrap()),
            json!({ "operator": "Equal", "path": ["score"], "valueNumber": 7.5 })
        );
        assert_eq!(
            document(&key("restricted").eq(true).unwrap()),
            json!({ "operator": "Equal", "path": ["restricted"], "valueBoolean": true })
        );
    }

    #[test]
    fn every_comparison_operator_has_a_tag() {
        assert_eq!(
            document(&key("year").ne(2024_i32).unwrap())["operator"],
            "NotEqual"
        );
        assert_eq!(
            document(&key("year").gt(2000_i32).unwrap())["operator"],
            "GreaterThan"
        );
        assert_eq!(
            document(&key("year").gte(2000_i32).unwrap())["operator"],
            "GreaterThanEqual"
        );
        assert_eq!(
            document(&key("year").lt(2000_i32).unwrap())["operator"],
            "LessThan"
        );
        assert_eq!(
            document(&key("year").lte(2000_i32).unwrap())["operator"],
            "LessThanEqual"
        );
    }

    #[test]
    fn text_ordering_is_representable_here() {
        assert_eq!(
            document(&key("name").gt("m").unwrap()),
            json!({ "operator": "GreaterThan", "path": ["name"], "valueText": "m" })
        );
    }

    // ---- membership ----------------------------------------------------

    #[test]
    fn membership_becomes_contains_any() {
        assert_eq!(
            document(&key("genre").is_in(["war", "comedy"]).unwrap()),
            json!({
                "operator": "ContainsAny",
                "path": ["genre"],
                "valueTextArray": ["war", "comedy"],
            })
        );
        assert_eq!(
            document(&key("year").is_in([2023_i64, 2024_i64]).unwrap()),
            json!({
                "operator": "ContainsAny",
                "path": ["year"],
                "valueIntArray": [2023, 2024],
            })
        );
    }

    #[test]
    fn one_float_member_moves_the_list_into_numbers() {
        assert_eq!(
            document(
                &key("score")
                    .is_in(vec![Scalar::Int32(7), Scalar::Float64(7.5)])
                    .unwrap()
            ),
            json!({
                "operator": "ContainsAny",
                "path": ["score"],
                "valueNumberArray": [7.0, 7.5],
            })
        );
    }

    #[test]
    fn excluded_membership_wraps_contains_any_in_not() {
        assert_eq!(
            document(&key("genre").not_in(["war"]).unwrap()),
            json!({
                "operator": "Not",
                "operands": [{
                    "operator": "ContainsAny",
                    "path": ["genre"],
                    "valueTextArray": ["war"],
                }],
            })
        );
    }

    #[test]
    fn boolean_members_cannot_be_listed() {
        let set = Filter::Membership(Membership {
            key: "flag".into(),
            op: SetOp::In,
            values: vec![Scalar::Bool(true)],
        });

        let err = compile(&set).unwrap_err();
        assert!(matches!(err, UnsupportedFilter::UnlistableMembers { .. }));
    }

    // ---- combinators ---------------------------------------------------

    #[test]
    fn combinators_nest_operands() {
        let filter = (key("genre").eq("comedy").unwrap() | key("genre").eq("war").unwrap())
            & !key("year").lt(1990_i32).unwrap();

        assert_eq!(
            document(&filter),
            json!({
                "operator": "And",
                "operands": [
                    {
                        "operator": "Or",
                        "operands": [
                            { "operator": "Equal", "path": ["genre"], "valueText": "comedy" },
                            { "operator": "Equal", "path": ["genre"], "valueText": "war" },
                        ],
                    },
                    {
                        "operator": "Not",
                        "operands": [
                            { "operator": "LessThan", "path": ["year"], "valueInt": 1990 },
                        ],
                    },
                ],
            })
        );
    }

    #[test]
    fn vacuous_subtrees_simplify_away() {
        let keep_all = Filter::Membership(Membership {
            key: "year".into(),
            op: SetOp::NotIn,
            values: vec![],
        });
        let real = key("genre").eq("war").unwrap();

        // AllRows is the identity of AND: only the real side remains.
        assert_eq!(
            compile(&keep_all.clone().and(real.clone())),
            compile(&real)
        );
        assert_eq!(compile(&keep_all.clone().or(real)), Ok(Compiled::AllRows));
        assert_eq!(compile(&!keep_all), Ok(Compiled::NoRows));
    }

    #[test]
    fn substring_matching_is_refused() {
        let err = compile(&key("title").contains("night").unwrap()).unwrap_err();
        assert_eq!(
            err.to_string(),
            "json where-filter has no substring match for key \"title\""
        );
    }

    #[test]
    fn documents_round_trip() {
        let filter = key("genre").not_in(["war"]).unwrap() & key("score").gte(7.5_f64).unwrap();

        let sent = compile(&filter).unwrap().clause().unwrap();
        let json = serde_json::to_string(&sent).unwrap();
        let back: WhereFilter = serde_json::from_str(&json).unwrap();

        assert_eq!(back, sent);
    }
}
