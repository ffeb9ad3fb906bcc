use crate::{
    filter::SetOp,
    value::{Scalar, ScalarClass},
};
use thiserror::Error as ThisError;

///
/// InvalidExpression
///
/// Construction-time defects in a filter or record. Raised by the builder
/// and by `Metadata::insert`; a value that passes construction never fails
/// for these reasons later.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum InvalidExpression {
    #[error("filter key must not be blank")]
    BlankKey,

    #[error("metadata key must not be blank")]
    BlankMetadataKey,

    #[error("{op} member set must not be empty")]
    EmptyMemberSet { op: SetOp },

    #[error("{op} member set mixes {expected} and {found} members")]
    MixedMemberSet {
        op: SetOp,
        expected: ScalarClass,
        found: ScalarClass,
    },

    #[error("{op} member set only holds numeric or text members, not booleans")]
    BooleanMemberSet { op: SetOp },
}

///
/// TypeMismatch
///
/// Evaluation-time incompatibility between a stored value and a comparison
/// operand. Only raised when the key is present; missing keys resolve to a
/// boolean instead. Carries both sides so callers can log the offending
/// record without re-fetching it.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
#[error(
    "type mismatch on key \"{key}\": stored value {actual} has type {}, comparison value {comparand} has type {}",
    .actual.scalar_type(),
    .comparand.scalar_type()
)]
pub struct TypeMismatch {
    pub key: String,
    pub actual: Scalar,
    pub comparand: Scalar,
}

impl TypeMismatch {
    #[must_use]
    pub fn new(key: impl Into<String>, actual: Scalar, comparand: Scalar) -> Self {
        Self {
            key: key.into(),
            actual,
            comparand,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_names_both_sides() {
        let err = TypeMismatch::new("id", Scalar::Int32(1), Scalar::Text("1".to_string()));

        assert_eq!(
            err.to_string(),
            "type mismatch on key \"id\": stored value 1 has type Int32, comparison value \"1\" has type Text"
        );
    }

    #[test]
    fn member_set_errors_name_the_operator() {
        let err = InvalidExpression::EmptyMemberSet { op: SetOp::In };
        assert_eq!(err.to_string(), "In member set must not be empty");

        let err = InvalidExpression::MixedMemberSet {
            op: SetOp::NotIn,
            expected: ScalarClass::Numeric,
            found: ScalarClass::Text,
        };
        assert_eq!(
            err.to_string(),
            "NotIn member set mixes Numeric and Text members"
        );
    }
}
