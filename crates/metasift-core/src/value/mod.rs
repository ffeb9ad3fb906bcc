mod compare;


pub use compare::{compare, equal};

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;

///
/// F64_SAFE_MAX_I64
/// Largest magnitude an `i64` can hold and still round-trip through `f64`
/// without losing precision (2^53).
///

pub(crate) const F64_SAFE_MAX_I64: i64 = 1_i64 << 53;

///
/// Scalar
///
/// One metadata value. Six variants across three comparison classes:
/// `Text`, the four numeric widths, and `Bool`. Collections and nulls are
/// not representable; a record either holds a scalar for a key or has no
/// entry for it at all.
///
/// Derived equality is variant-strict (`Int32(1) != Int64(1)`), which is
/// what structural tests over filter trees want. Class-aware semantic
/// equality lives in [`equal`].
///

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Bool(bool),
    Float32(f32),
    Float64(f64),
    Int32(i32),
    Int64(i64),
    Text(String),
}

impl Scalar {
    /// Concrete type tag of this value.
    #[must_use]
    pub const fn scalar_type(&self) -> ScalarType {
        match self {
            Self::Bool(_) => ScalarType::Bool,
            Self::Float32(_) => ScalarType::Float32,
            Self::Float64(_) => ScalarType::Float64,
            Self::Int32(_) => ScalarType::Int32,
            Self::Int64(_) => ScalarType::Int64,
            Self::Text(_) => ScalarType::Text,
        }
    }

    /// Comparison class of this value.
    #[must_use]
    pub const fn class(&self) -> ScalarClass {
        self.scalar_type().class()
    }

    /// True for the four numeric variants.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(self.class(), ScalarClass::Numeric)
    }

    /// Borrow the inner text, if any.
    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Widen a numeric value to `f64` for mixed-width comparison.
    /// `Int64`s beyond 2^53 lose precision here; the exact integer path in
    /// [`compare`] keeps integer-to-integer comparisons out of this method.
    #[expect(clippy::cast_precision_loss)]
    pub(crate) fn to_f64_lossy(&self) -> Option<f64> {
        match self {
            Self::Float32(v) => Some(f64::from(*v)),
            Self::Float64(v) => Some(*v),
            Self::Int32(v) => Some(f64::from(*v)),
            Self::Int64(v) => Some(*v as f64),
            Self::Bool(_) | Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::Float32(v) => write!(f, "{v}"),
            Self::Float64(v) => write!(f, "{v}"),
            Self::Int32(v) => write!(f, "{v}"),
            Self::Int64(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "\"{v}\""),
        }
    }
}

// ----------------------------------------------------------------------
// Conversions
// ----------------------------------------------------------------------

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Self::Float32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Float64(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Int32(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Self::Int64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

///
/// ScalarType
///
/// Type tag for [`Scalar`], used in mismatch diagnostics and by backends
/// that pick a wire field per width.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ScalarType {
    Bool,
    Float32,
    Float64,
    Int32,
    Int64,
    Text,
}

impl ScalarType {
    /// Comparison class this type belongs to.
    #[must_use]
    pub const fn class(self) -> ScalarClass {
        match self {
            Self::Bool => ScalarClass::Boolean,
            Self::Float32 | Self::Float64 | Self::Int32 | Self::Int64 => ScalarClass::Numeric,
            Self::Text => ScalarClass::Text,
        }
    }

    /// Whether values of `self` and `other` may be compared at all.
    /// Numerics compare across widths; `Text` and `Bool` only to themselves.
    #[must_use]
    pub const fn compatible(self, other: Self) -> bool {
        matches!(
            (self.class(), other.class()),
            (ScalarClass::Boolean, ScalarClass::Boolean)
                | (ScalarClass::Numeric, ScalarClass::Numeric)
                | (ScalarClass::Text, ScalarClass::Text)
        )
    }
}

///
/// ScalarClass
///
/// Comparison class. Crossing classes is never a silent `false`; it
/// surfaces as a type mismatch at evaluation or compile time.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum ScalarClass {
    Boolean,
    Numeric,
    Text,
}
