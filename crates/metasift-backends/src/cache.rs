//! Lowers filters into the cache store's native predicate tree. The cache
//! has real always/never predicates, so the sentinel outcomes resolve into
//! those and the caller gets a plain [`CacheFilter`] back. Substring
//! matching has no native predicate and is refused.

use crate::error::UnsupportedFilter;
use metasift_core::{
    compile::Compiled,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    value::Scalar,
};
use serde::{Deserialize, Serialize};

const BACKEND: &str = "cache";

///
/// CacheFilter
///
/// Native predicate tree. `All`/`Any` are n-ary, so chains of the same
/// connective flatten into one list instead of nesting pairwise.
///

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum CacheFilter {
    /// Keeps every entry.
    Always,
    /// Keeps no entry.
    Never,
    All(Vec<CacheFilter>),
    Any(Vec<CacheFilter>),
    Not(Box<CacheFilter>),
    Equal { key: String, value: Scalar },
    NotEqual { key: String, value: Scalar },
    Greater { key: String, value: Scalar },
    GreaterOrEqual { key: String, value: Scalar },
    Less { key: String, value: Scalar },
    LessOrEqual { key: String, value: Scalar },
    In { key: String, values: Vec<Scalar> },
    NotIn { key: String, values: Vec<Scalar> },
}

// ------------------------------------------------------------------------
// Compilation
// ------------------------------------------------------------------------

/// Lower a filter into a native cache predicate. Vacuous subtrees resolve
/// into [`CacheFilter::Always`] and [`CacheFilter::Never`] rather than
/// sentinels, so the result is always a usable predicate.
pub fn compile(filter: &Filter) -> Result<CacheFilter, UnsupportedFilter> {
    Ok(lower(filter)?.into_clause(|| CacheFilter::Always, || CacheFilter::Never))
}

fn lower(filter: &Filter) -> Result<Compiled<CacheFilter>, UnsupportedFilter> {
    match filter {
        Filter::Compare(cmp) => compile_compare(cmp),
        Filter::Membership(set) => Ok(compile_membership(set)),
        Filter::And(lhs, rhs) => lower(lhs)?.and_with(|| lower(rhs), all_of),
        Filter::Or(lhs, rhs) => lower(lhs)?.or_with(|| lower(rhs), any_of),
        Filter::Not(inner) => Ok(lower(inner)?.negate(|f| CacheFilter::Not(Box::new(f)))),
    }
}

// Left-folded connectives collapse into a single n-ary list.
fn all_of(left: CacheFilter, right: CacheFilter) -> CacheFilter {
    match left {
        CacheFilter::All(mut filters) => {
            filters.push(right);
            CacheFilter::All(filters)
        }
        other => CacheFilter::All(vec![other, right]),
    }
}

fn any_of(left: CacheFilter, right: CacheFilter) -> CacheFilter {
    match left {
        CacheFilter::Any(mut filters) => {
            filters.push(right);
            CacheFilter::Any(filters)
        }
        other => CacheFilter::Any(vec![other, right]),
    }
}

// ------------------------------------------------------------------------
// Leaves
// ------------------------------------------------------------------------

fn compile_compare(cmp: &Compare) -> Result<Compiled<CacheFilter>, UnsupportedFilter> {
    let key = cmp.key.clone();
    let value = cmp.value.clone();

    let predicate = match cmp.op {
        CompareOp::Eq => CacheFilter::Equal { key, value },
        CompareOp::Ne => CacheFilter::NotEqual { key, value },
        CompareOp::Gt => CacheFilter::Greater { key, value },
        CompareOp::Gte => CacheFilter::GreaterOrEqual { key, value },
        CompareOp::Lt => CacheFilter::Less { key, value },
        CompareOp::Lte => CacheFilter::LessOrEqual { key, value },
        CompareOp::Contains => {
            return Err(UnsupportedFilter::Contains { backend: BACKEND, key });
        }
    };

    Ok(Compiled::Clause(predicate))
}

fn compile_membership(set: &Membership) -> Compiled<CacheFilter> {
    if set.values.is_empty() {
        // Degenerate sets decide before any predicate is built.
        return match set.op {
            SetOp::In => Compiled::NoRows,
            SetOp::NotIn => Compiled::AllRows,
        };
    }

    let key = set.key.clone();
    let values = set.values.clone();
    Compiled::Clause(match set.op {
        SetOp::In => CacheFilter::In { key, values },
        SetOp::NotIn => CacheFilter::NotIn { key, values },
    })
}

///
/// TESTS
///
