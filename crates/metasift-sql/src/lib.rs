//! SQL lowering for MetaSift filters: WHERE-clause compilation with
//! three-valued simplification, table descriptors for identifier
//! validation, and a parser that turns a SQL WHERE clause back into a
//! filter tree.

#![warn(unreachable_pub)]

pub mod compile;
pub mod parse;
pub mod schema;
