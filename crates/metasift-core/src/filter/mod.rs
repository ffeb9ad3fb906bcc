mod ast;
mod build;
mod eval;

#[cfg(test)]
mod tests;

pub use ast::{Compare, CompareOp, Filter, Membership, SetOp};
pub use build::{Key, key};
pub use eval::evaluate;
