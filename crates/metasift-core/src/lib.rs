//! Core of the MetaSift filter engine: the scalar value model, metadata
//! records, the filter algebra with its validating builder, local
//! evaluation, and the sentinel type shared by every backend compiler.

#![warn(unreachable_pub)]

pub mod compile;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod value;

///
/// PRELUDE
///

pub mod prelude {
    //! Domain vocabulary only. Errors and compiler plumbing stay at their
    //! module paths so call sites name them deliberately.

    pub use crate::{
        compile::Compiled,
        filter::{CompareOp, Filter, Key, SetOp, key},
        metadata::Metadata,
        value::{Scalar, ScalarClass, ScalarType},
    };
}
