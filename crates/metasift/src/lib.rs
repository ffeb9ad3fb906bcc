//! ## Crate layout
//! - `core`: scalar values, metadata records, the filter algebra and its
//!   validating builder, local evaluation, and the compilation sentinels.
//! - `sql`: WHERE-clause compiler, table descriptors for identifier
//!   validation, and a parser from SQL WHERE clauses back to filters.
//! - `backends`: qdrant-style point filter, JSON where-filter, and cache
//!   predicate compilers.
//!
//! The `prelude` module mirrors the surface most callers use; backend
//! modules are addressed by path so call sites say which target they
//! compile for.

pub use metasift_core as core;

#[cfg(feature = "backends")]
pub use metasift_backends as backends;
#[cfg(feature = "sql")]
pub use metasift_sql as sql;

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::core::prelude::*;

    #[cfg(feature = "sql")]
    pub use crate::sql::{
        compile::{SqlCompiler, quote_ident},
        parse::{parse_filter, parse_where},
        schema::Table,
    };
}
