use crate::value::Scalar;
use std::cmp::Ordering;

/// Compare two scalars, or report that their classes differ.
///
/// Within the numeric class the comparison is exact when both sides are
/// integers; mixed integer/float pairs are widened to `f64` first. Floats
/// follow IEEE total order with the two zeros collapsed, so `NaN` equals
/// itself and sorts above every finite value.
#[must_use]
pub fn compare(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    match (left, right) {
        (Scalar::Text(a), Scalar::Text(b)) => Some(a.cmp(b)),
        (Scalar::Bool(a), Scalar::Bool(b)) => Some(a.cmp(b)),
        _ => cmp_numeric(left, right),
    }
}

/// Semantic equality under the same class rules as [`compare`].
#[must_use]
pub fn equal(left: &Scalar, right: &Scalar) -> Option<bool> {
    compare(left, right).map(|ordering| ordering == Ordering::Equal)
}

// ----------------------------------------------------------------------
// Internal helpers
// ----------------------------------------------------------------------

fn cmp_numeric(left: &Scalar, right: &Scalar) -> Option<Ordering> {
    // Exact path first: `i64::MAX` and its neighbours collapse in f64.
    if let (Some(a), Some(b)) = (as_i64(left), as_i64(right)) {
        return Some(a.cmp(&b));
    }

    let a = left.to_f64_lossy()?;
    let b = right.to_f64_lossy()?;
    Some(cmp_f64(a, b))
}

fn as_i64(value: &Scalar) -> Option<i64> {
    match value {
        Scalar::Int32(v) => Some(i64::from(*v)),
        Scalar::Int64(v) => Some(*v),
        _ => None,
    }
}

fn cmp_f64(a: f64, b: f64) -> Ordering {
    normalize_zero(a).total_cmp(&normalize_zero(b))
}

// `total_cmp` puts -0.0 below 0.0; fold the sign away so the zeros match.
fn normalize_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}
