//! Translation-specific error types.

use thiserror::Error;

/// Per-rule translation failures.
///
/// All of these are local to one rule and non-fatal: the driver reports them
/// as skip diagnostics and continues with the next document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    /// Neither the rule nor its skeleton carries a title to derive a name from.
    #[error("rule has no title")]
    MissingTitle,

    /// Neither the rule nor its skeleton carries a detection section.
    #[error("rule has no detection section")]
    MissingDetection,

    /// A selection group is not a field mapping scoped by an `EventID` key.
    #[error("selection group '{0}' is not an EventID-scoped field mapping")]
    IncompatibleSelection(String),

    /// The condition is absent or not a string.
    #[error("cannot translate condition ({0})")]
    ConditionNotString(String),

    /// The condition is a string but matches none of the supported shapes
    /// (named alias, `all of them`, `N of them`).
    #[error("unhandled condition shape ({0})")]
    UnsupportedCondition(String),
}

pub type Result<T> = std::result::Result<T, ConvertError>;
