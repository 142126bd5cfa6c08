//! Error types for condition lookup and evaluation.

use thiserror::Error;

/// Primary error type for filter operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The registry was asked for a value type it does not define.
    #[error("unsupported value type `{value_type}`")]
    UnsupportedType {
        /// Type name supplied by the caller.
        value_type: String,
    },
    /// The condition identifier is not registered.
    #[error("unknown filter condition `{condition_id}`")]
    UnknownCondition {
        /// Identifier supplied by the caller.
        condition_id: String,
    },
}

impl FilterError {
    pub(crate) fn unsupported_type(value_type: impl Into<String>) -> Self {
        Self::UnsupportedType {
            value_type: value_type.into(),
        }
    }

    pub(crate) fn unknown_condition(condition_id: impl Into<String>) -> Self {
        Self::UnknownCondition {
            condition_id: condition_id.into(),
        }
    }
}

/// Convenience alias for filter results.
pub type FilterResult<T> = Result<T, FilterError>;
