//! Command handlers grouped by concern.

pub(crate) mod conditions;
pub(crate) mod evaluate;
pub(crate) mod filter;
pub(crate) mod format;
