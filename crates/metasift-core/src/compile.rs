///
/// Compiled
///
/// Outcome of lowering a filter into one backend's representation. The two
/// sentinels record that simplification proved the filter vacuous before a
/// clause was ever built: `AllRows` keeps every row, `NoRows` keeps none.
/// Backends surface them natively when they can and as explicit
/// tautology/contradiction clauses when they cannot.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Compiled<T> {
    AllRows,
    NoRows,
    Clause(T),
}

impl<T> Compiled<T> {
    /// True when simplification kept every row.
    #[must_use]
    pub const fn matches_all_rows(&self) -> bool {
        matches!(self, Self::AllRows)
    }

    /// True when simplification kept no row.
    #[must_use]
    pub const fn matches_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// The built clause, unless a sentinel won.
    pub fn clause(self) -> Option<T> {
        match self {
            Self::Clause(clause) => Some(clause),
            Self::AllRows | Self::NoRows => None,
        }
    }

    /// Rewrap the clause, keeping sentinels as they are.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Compiled<U> {
        match self {
            Self::AllRows => Compiled::AllRows,
            Self::NoRows => Compiled::NoRows,
            Self::Clause(clause) => Compiled::Clause(f(clause)),
        }
    }

    /// Collapse into the backend's native form by supplying renderings for
    /// the two sentinels.
    pub fn into_clause(self, all_rows: impl FnOnce() -> T, no_rows: impl FnOnce() -> T) -> T {
        match self {
            Self::AllRows => all_rows(),
            Self::NoRows => no_rows(),
            Self::Clause(clause) => clause,
        }
    }

    /// Conjoin with a lazily compiled right side.
    ///
    /// `NoRows` on the left decides the result without running `rhs`, so
    /// errors on the skipped side never surface. `AllRows` on either side
    /// yields the other. Only when both sides produce clauses does
    /// `conjoin` run.
    pub fn and_with<E>(
        self,
        rhs: impl FnOnce() -> Result<Self, E>,
        conjoin: impl FnOnce(T, T) -> T,
    ) -> Result<Self, E> {
        match self {
            Self::NoRows => Ok(Self::NoRows),
            Self::AllRows => rhs(),
            Self::Clause(left) => Ok(match rhs()? {
                Self::NoRows => Self::NoRows,
                Self::AllRows => Self::Clause(left),
                Self::Clause(right) => Self::Clause(conjoin(left, right)),
            }),
        }
    }

    /// Disjoin with a lazily compiled right side; dual of
    /// [`and_with`](Self::and_with), with `AllRows` deciding early.
    pub fn or_with<E>(
        self,
        rhs: impl FnOnce() -> Result<Self, E>,
        disjoin: impl FnOnce(T, T) -> T,
    ) -> Result<Self, E> {
        match self {
            Self::AllRows => Ok(Self::AllRows),
            Self::NoRows => rhs(),
            Self::Clause(left) => Ok(match rhs()? {
                Self::AllRows => Self::AllRows,
                Self::NoRows => Self::Clause(left),
                Self::Clause(right) => Self::Clause(disjoin(left, right)),
            }),
        }
    }

    /// Negate: sentinels flip, a clause is wrapped by `negate`.
    pub fn negate(self, negate: impl FnOnce(T) -> T) -> Self {
        match self {
            Self::AllRows => Self::NoRows,
            Self::NoRows => Self::AllRows,
            Self::Clause(clause) => Self::Clause(negate(clause)),
        }
    }
}

///
/// TESTS
///
