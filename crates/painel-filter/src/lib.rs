#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Filter-condition engine behind table filter dialogs.
//!
//! Layout: `registry.rs` (value types, conditions, per-type descriptor tables),
//! `value.rs` (operands), `evaluate.rs` (three-state predicate application and
//! string normalization), `filters.rs` (dialog rows, rule documents, collection
//! passes), `error.rs` (error enum).

pub mod error;
pub mod evaluate;
pub mod filters;
pub mod registry;
pub mod value;

pub use error::{FilterError, FilterResult};
pub use evaluate::{MatchOutcome, clean_string, evaluate, evaluate_condition};
pub use filters::{
    AvailableFilter, FilterPass, FilterRule, FilterSet, FilterSummary, Filterable, apply_filters,
    record_outcome,
};
pub use registry::{Condition, ConditionDescriptor, ValueType, conditions_for, conditions_for_name};
pub use value::{FilterValue, parse_date};
