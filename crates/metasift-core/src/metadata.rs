use crate::{
    error::InvalidExpression,
    value::{F64_SAFE_MAX_I64, Scalar},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// Metadata
///
/// One record's attributes: unique string keys mapping to scalars. Keys are
/// kept sorted, so iteration and serialization are deterministic. A key is
/// either present with a scalar or absent; there is no null entry.
///

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: BTreeMap<String, Scalar>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an entry. Blank keys are rejected.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> Result<(), InvalidExpression> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(InvalidExpression::BlankMetadataKey);
        }
        self.entries.insert(key, value.into());

        Ok(())
    }

    /// Chaining variant of [`insert`](Self::insert) for building records inline.
    pub fn with(
        mut self,
        key: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> Result<Self, InvalidExpression> {
        self.insert(key, value)?;

        Ok(self)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Scalar> {
        self.entries.remove(key)
    }

    /// Fold `other` into `self`; on key collisions `other` wins.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    // ------------------------------------------------------------------
    // Typed accessors (lossless widening only)
    // ------------------------------------------------------------------

    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_text()
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Scalar::Bool(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_i32(&self, key: &str) -> Option<i32> {
        match self.get(key)? {
            Scalar::Int32(v) => Some(*v),
            _ => None,
        }
    }

    /// `Int32` entries widen; everything non-integer is `None`.
    #[must_use]
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Scalar::Int32(v) => Some(i64::from(*v)),
            Scalar::Int64(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_f32(&self, key: &str) -> Option<f32> {
        match self.get(key)? {
            Scalar::Float32(v) => Some(*v),
            _ => None,
        }
    }

    /// Every numeric entry that fits `f64` exactly; `Int64`s beyond 2^53
    /// are withheld rather than silently rounded.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Scalar::Float32(v) => Some(f64::from(*v)),
            Scalar::Float64(v) => Some(*v),
            Scalar::Int32(v) => Some(f64::from(*v)),
            Scalar::Int64(v) if v.unsigned_abs() <= F64_SAFE_MAX_I64.unsigned_abs() => {
                Some(*v as f64)
            }
            _ => None,
        }
    }
}

impl IntoIterator for Metadata {
    type Item = (String, Scalar);
    type IntoIter = std::collections::btree_map::IntoIter<String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a Metadata {
    type Item = (&'a String, &'a Scalar);
    type IntoIter = std::collections::btree_map::Iter<'a, String, Scalar>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

///
/// TESTS
///
