use crate::{
    error::TypeMismatch,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    metadata::Metadata,
    value::{Scalar, compare, equal},
};
use std::cmp::Ordering;

/// Evaluate `filter` against one record.
///
/// Absent keys answer the operator's identity: `Ne` and `NotIn` hold,
/// everything else does not. Once the key is present, a class mismatch
/// between stored value and operand is an error, never a quiet `false`.
pub fn evaluate(filter: &Filter, record: &Metadata) -> Result<bool, TypeMismatch> {
    match filter {
        Filter::Compare(cmp) => eval_compare(cmp, record),
        Filter::Membership(membership) => eval_membership(membership, record),
        Filter::And(lhs, rhs) => {
            // NOTE: both sides run before combining so a mismatch on the
            // right is never masked by a false left.
            let left = evaluate(lhs, record)?;
            let right = evaluate(rhs, record)?;

            Ok(left && right)
        }
        Filter::Or(lhs, rhs) => {
            let left = evaluate(lhs, record)?;
            let right = evaluate(rhs, record)?;

            Ok(left || right)
        }
        Filter::Not(inner) => Ok(!evaluate(inner, record)?),
    }
}

impl Filter {
    /// Method form of [`evaluate`].
    pub fn matches(&self, record: &Metadata) -> Result<bool, TypeMismatch> {
        evaluate(self, record)
    }
}

// ----------------------------------------------------------------------
// Leaf evaluation
// ----------------------------------------------------------------------

fn eval_compare(cmp: &Compare, record: &Metadata) -> Result<bool, TypeMismatch> {
    let Some(actual) = record.get(&cmp.key) else {
        return Ok(cmp.op == CompareOp::Ne);
    };

    if cmp.op == CompareOp::Contains {
        return eval_contains(cmp, actual);
    }

    let ordering = compare(actual, &cmp.value)
        .ok_or_else(|| mismatch(&cmp.key, actual, &cmp.value))?;

    Ok(ordering_satisfies(cmp.op, ordering))
}

fn eval_contains(cmp: &Compare, actual: &Scalar) -> Result<bool, TypeMismatch> {
    match (actual, &cmp.value) {
        (Scalar::Text(haystack), Scalar::Text(needle)) => Ok(haystack.contains(needle.as_str())),
        _ => Err(mismatch(&cmp.key, actual, &cmp.value)),
    }
}

fn eval_membership(membership: &Membership, record: &Metadata) -> Result<bool, TypeMismatch> {
    let Some(actual) = record.get(&membership.key) else {
        return Ok(membership.op == SetOp::NotIn);
    };

    // Every member is checked even after a hit, so a hand-built set that
    // mixes classes still fails loudly.
    let mut found = false;
    for member in &membership.values {
        match equal(actual, member) {
            Some(true) => found = true,
            Some(false) => {}
            None => return Err(mismatch(&membership.key, actual, member)),
        }
    }

    Ok(match membership.op {
        SetOp::In => found,
        SetOp::NotIn => !found,
    })
}

// Contains is dispatched before the ordering path and never reaches here.
const fn ordering_satisfies(op: CompareOp, ordering: Ordering) -> bool {
    match op {
        CompareOp::Eq => matches!(ordering, Ordering::Equal),
        CompareOp::Ne => !matches!(ordering, Ordering::Equal),
        CompareOp::Gt => matches!(ordering, Ordering::Greater),
        CompareOp::Gte => !matches!(ordering, Ordering::Less),
        CompareOp::Lt => matches!(ordering, Ordering::Less),
        CompareOp::Lte => !matches!(ordering, Ordering::Greater),
        CompareOp::Contains => false,
    }
}

fn mismatch(key: &str, actual: &Scalar, comparand: &Scalar) -> TypeMismatch {
    TypeMismatch::new(key, actual.clone(), comparand.clone())
}
