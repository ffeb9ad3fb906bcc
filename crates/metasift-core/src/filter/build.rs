use crate::{
    error::InvalidExpression,
    filter::{Compare, CompareOp, Filter, Membership, SetOp},
    value::{Scalar, ScalarClass},
};

///
/// Key
///
/// Entry point of the filter builder: `key("genre").eq("comedy")`.
/// Validation happens when an operator is applied, so every `Filter`
/// produced here satisfies the construction invariants.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Key(String);

/// Start a filter on the named key.
#[must_use]
pub fn key(name: impl Into<String>) -> Key {
    Key(name.into())
}

impl Key {
    /// Return the key name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    // ------------------------------------------------------------------
    // Scalar comparisons
    // ------------------------------------------------------------------

    /// Equality against one scalar.
    pub fn eq(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Eq, value.into())
    }

    /// Inequality against one scalar.
    pub fn ne(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Ne, value.into())
    }

    /// Strictly greater than one scalar.
    pub fn gt(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Gt, value.into())
    }

    /// Greater than or equal to one scalar.
    pub fn gte(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Gte, value.into())
    }

    /// Strictly less than one scalar.
    pub fn lt(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Lt, value.into())
    }

    /// Less than or equal to one scalar.
    pub fn lte(self, value: impl Into<Scalar>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Lte, value.into())
    }

    /// Substring match over a text value.
    pub fn contains(self, value: impl Into<String>) -> Result<Filter, InvalidExpression> {
        self.compare(CompareOp::Contains, Scalar::Text(value.into()))
    }

    // ------------------------------------------------------------------
    // Membership
    // ------------------------------------------------------------------

    /// Membership in a fixed set.
    pub fn is_in<I, V>(self, values: I) -> Result<Filter, InvalidExpression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.membership(SetOp::In, values)
    }

    /// Exclusion from a fixed set.
    pub fn not_in<I, V>(self, values: I) -> Result<Filter, InvalidExpression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        self.membership(SetOp::NotIn, values)
    }

    // ------------------------------------------------------------------
    // Internal helpers
    // ------------------------------------------------------------------

    fn checked(self) -> Result<String, InvalidExpression> {
        if self.0.trim().is_empty() {
            return Err(InvalidExpression::BlankKey);
        }

        Ok(self.0)
    }

    fn compare(self, op: CompareOp, value: Scalar) -> Result<Filter, InvalidExpression> {
        let key = self.checked()?;

        Ok(Filter::Compare(Compare { key, op, value }))
    }

    fn membership<I, V>(self, op: SetOp, values: I) -> Result<Filter, InvalidExpression>
    where
        I: IntoIterator<Item = V>,
        V: Into<Scalar>,
    {
        let key = self.checked()?;
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        let expected = member_class(op, &values)?;

        for member in &values {
            let found = member.class();
            if found == ScalarClass::Boolean {
                return Err(InvalidExpression::BooleanMemberSet { op });
            }
            if found != expected {
                return Err(InvalidExpression::MixedMemberSet { op, expected, found });
            }
        }

        Ok(Filter::Membership(Membership { key, op, values }))
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn member_class(op: SetOp, values: &[Scalar]) -> Result<ScalarClass, InvalidExpression> {
    let Some(first) = values.first() else {
        return Err(InvalidExpression::EmptyMemberSet { op });
    };

    Ok(first.class())
}
