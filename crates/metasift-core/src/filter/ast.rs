use crate::value::Scalar;
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// CompareOp
///
/// Scalar comparison operators. `Contains` is text-only substring match;
/// the rest order or equate under the class rules of `value::compare`.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    Contains,
}

///
/// SetOp
///
/// Membership operators over a fixed member set.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum SetOp {
    In,
    NotIn,
}

///
/// Compare
///
/// One key against one scalar operand.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Compare {
    pub key: String,
    pub op: CompareOp,
    pub value: Scalar,
}

///
/// Membership
///
/// One key against a member set. The builder guarantees a non-empty set of
/// one comparison class with no booleans; trees built or deserialized by
/// hand skip those checks and fall back to degenerate-set semantics at
/// evaluation and compile time.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub key: String,
    pub op: SetOp,
    pub values: Vec<Scalar>,
}

///
/// Filter
///
/// Backend-agnostic filter tree. Leaves test one key; `And`/`Or`/`Not`
/// combine subtrees. The serde form is the portable interchange format, so
/// trees survive a round trip through JSON unchanged.
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Filter {
    Compare(Compare),
    Membership(Membership),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
    Not(Box<Self>),
}

impl Filter {
    /// Conjunction of `self` and `rhs`.
    #[must_use]
    pub fn and(self, rhs: Self) -> Self {
        Self::And(Box::new(self), Box::new(rhs))
    }

    /// Disjunction of `self` and `rhs`.
    #[must_use]
    pub fn or(self, rhs: Self) -> Self {
        Self::Or(Box::new(self), Box::new(rhs))
    }

    /// Left-fold a sequence into nested `And`s. `None` when empty.
    #[must_use]
    pub fn all(filters: impl IntoIterator<Item = Self>) -> Option<Self> {
        filters.into_iter().reduce(Self::and)
    }

    /// Left-fold a sequence into nested `Or`s. `None` when empty.
    #[must_use]
    pub fn any(filters: impl IntoIterator<Item = Self>) -> Option<Self> {
        filters.into_iter().reduce(Self::or)
    }
}

// ----------------------------------------------------------------------
// Operator sugar
// ----------------------------------------------------------------------

impl std::ops::BitAnd for Filter {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

impl std::ops::BitAnd<&Self> for Filter {
    type Output = Self;

    fn bitand(self, rhs: &Self) -> Self {
        self.and(rhs.clone())
    }
}

impl std::ops::BitOr for Filter {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl std::ops::BitOr<&Self> for Filter {
    type Output = Self;

    fn bitor(self, rhs: &Self) -> Self {
        self.or(rhs.clone())
    }
}

impl std::ops::Not for Filter {
    type Output = Self;

    fn not(self) -> Self {
        Self::Not(Box::new(self))
    }
}
