//! Backend compilers for MetaSift filters beyond SQL: a qdrant-style
//! point filter, a JSON where-filter, and an in-memory cache filter.
//! Each module walks the same filter tree and emits its target's native
//! representation, refusing shapes the target cannot express.

#![warn(unreachable_pub)]

pub mod cache;
pub mod error;
pub mod json;
pub mod qdrant;

pub use error::UnsupportedFilter;
