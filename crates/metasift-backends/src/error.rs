use metasift_core::value::ScalarType;
use thiserror::Error as ThisError;

///
/// UnsupportedFilter
///
/// A filter shape the target backend cannot represent. Compilation refuses
/// loudly instead of coercing; the caller decides whether to fall back to
/// local evaluation.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum UnsupportedFilter {
    #[error("{backend} has no substring match for key \"{key}\"")]
    Contains { backend: &'static str, key: String },

    #[error("{backend} cannot test {found} equality on key \"{key}\"")]
    FloatEquality {
        backend: &'static str,
        key: String,
        found: ScalarType,
    },

    #[error("{backend} ranges need a numeric bound for key \"{key}\", found {found}")]
    NonNumericRange {
        backend: &'static str,
        key: String,
        found: ScalarType,
    },

    #[error("{backend} cannot enumerate {found} members for key \"{key}\"")]
    UnlistableMembers {
        backend: &'static str,
        key: String,
        found: ScalarType,
    },
}
