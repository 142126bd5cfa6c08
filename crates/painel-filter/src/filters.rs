//! Filter rows and collection passes built on the evaluator.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{FilterError, FilterResult};
use crate::evaluate::{MatchOutcome, evaluate_condition};
use crate::registry::{Condition, ConditionDescriptor, ValueType, conditions_for};
use crate::value::FilterValue;

/// Records whose fields can be looked up by key.
pub trait Filterable {
    /// Value stored under `field`, converted for `value_type`; `Null` when absent.
    fn filter_value(&self, field: &str, value_type: ValueType) -> FilterValue;
}

impl Filterable for Value {
    fn filter_value(&self, field: &str, value_type: ValueType) -> FilterValue {
        self.get(field)
            .map_or(FilterValue::Null, |value| FilterValue::from_json(value, value_type))
    }
}

impl Filterable for Map<String, Value> {
    fn filter_value(&self, field: &str, value_type: ValueType) -> FilterValue {
        self.get(field)
            .map_or(FilterValue::Null, |value| FilterValue::from_json(value, value_type))
    }
}

impl Filterable for BTreeMap<String, FilterValue> {
    fn filter_value(&self, field: &str, _value_type: ValueType) -> FilterValue {
        self.get(field).cloned().unwrap_or_default()
    }
}

impl<S: std::hash::BuildHasher> Filterable for HashMap<String, FilterValue, S> {
    fn filter_value(&self, field: &str, _value_type: ValueType) -> FilterValue {
        self.get(field).cloned().unwrap_or_default()
    }
}

/// One row of a filter dialog: a field, its applicable conditions and the
/// user's current selection.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailableFilter {
    /// Record key the filter reads.
    pub field: String,
    /// Value type of the field.
    pub value_type: ValueType,
    /// Conditions offered for the field, in registry order.
    pub conditions: &'static [ConditionDescriptor],
    /// Currently selected condition.
    pub selected: Option<Condition>,
    /// Currently entered comparison value.
    pub value: FilterValue,
}

impl AvailableFilter {
    /// Build a row for `field`, selecting the first registered condition.
    #[must_use]
    pub fn new(field: impl Into<String>, value_type: ValueType) -> Self {
        let conditions = conditions_for(value_type);
        Self {
            field: field.into(),
            value_type,
            conditions,
            selected: conditions.first().map(|descriptor| descriptor.condition),
            value: FilterValue::Null,
        }
    }

    /// Select a condition by identifier.
    ///
    /// # Errors
    /// Returns [`FilterError::UnknownCondition`] when the identifier is not
    /// registered for this row's value type.
    pub fn select(&mut self, condition_id: &str) -> FilterResult<()> {
        let condition: Condition = condition_id.parse()?;
        if !self
            .conditions
            .iter()
            .any(|descriptor| descriptor.condition == condition)
        {
            return Err(FilterError::unknown_condition(condition_id));
        }
        self.selected = Some(condition);
        Ok(())
    }

    /// Builder form of [`AvailableFilter::select`].
    ///
    /// # Errors
    /// See [`AvailableFilter::select`].
    pub fn with_condition(mut self, condition_id: &str) -> FilterResult<Self> {
        self.select(condition_id)?;
        Ok(self)
    }

    /// Replace the comparison value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<FilterValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Descriptor of the selected condition.
    #[must_use]
    pub fn selected_descriptor(&self) -> Option<&'static ConditionDescriptor> {
        let selected = self.selected?;
        self.conditions
            .iter()
            .find(|descriptor| descriptor.condition == selected)
    }

    /// A row filters only once a condition is chosen and a value entered.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.selected.is_some() && !self.value.is_null()
    }

    /// Outcome for `record`; inactive rows never exclude anything.
    pub fn matches<T: Filterable + ?Sized>(&self, record: &T) -> MatchOutcome {
        let Some(condition) = self.selected.filter(|_| !self.value.is_null()) else {
            return MatchOutcome::Match;
        };
        let field_value = record.filter_value(&self.field, self.value_type);
        evaluate_condition(condition, &field_value, &self.value)
    }
}

/// Counters for one filtering pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSummary {
    /// Records inspected.
    pub total: usize,
    /// Records kept.
    pub matched: usize,
    /// Records excluded because some row could not decide.
    pub indeterminate: usize,
}

/// Records kept by [`apply_filters`], in input order.
#[derive(Debug)]
pub struct FilterPass<'a, T> {
    /// Kept records.
    pub records: Vec<&'a T>,
    /// Pass counters.
    pub summary: FilterSummary,
}

/// Combined outcome of every active row against a record.
///
/// Any `NoMatch` wins, then any `Indeterminate`; the result does not depend on
/// row order.
pub fn record_outcome<T: Filterable + ?Sized>(
    record: &T,
    filters: &[AvailableFilter],
) -> MatchOutcome {
    filters
        .iter()
        .map(|filter| filter.matches(record))
        .fold(MatchOutcome::Match, |acc, outcome| match (acc, outcome) {
            (MatchOutcome::NoMatch, _) | (_, MatchOutcome::NoMatch) => MatchOutcome::NoMatch,
            (MatchOutcome::Indeterminate, _) | (_, MatchOutcome::Indeterminate) => {
                MatchOutcome::Indeterminate
            }
            (MatchOutcome::Match, MatchOutcome::Match) => MatchOutcome::Match,
        })
}

/// Keep the records every active row matches.
pub fn apply_filters<'a, T: Filterable>(
    records: &'a [T],
    filters: &[AvailableFilter],
) -> FilterPass<'a, T> {
    let active: Vec<AvailableFilter> = filters
        .iter()
        .filter(|filter| filter.is_active())
        .cloned()
        .collect();
    let mut summary = FilterSummary {
        total: records.len(),
        ..FilterSummary::default()
    };
    let mut kept = Vec::new();
    for record in records {
        match record_outcome(record, &active) {
            MatchOutcome::Match => kept.push(record),
            MatchOutcome::Indeterminate => summary.indeterminate += 1,
            MatchOutcome::NoMatch => {}
        }
    }
    summary.matched = kept.len();
    debug!(
        total = summary.total,
        matched = summary.matched,
        indeterminate = summary.indeterminate,
        active_filters = active.len(),
        "filter pass complete"
    );
    FilterPass {
        records: kept,
        summary,
    }
}

/// Serialized form of a filter row, as stored in rule documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterRule {
    /// Record key the rule reads.
    pub field: String,
    /// Value type name (`string`, `number`, `date`, `boolean`).
    #[serde(rename = "type")]
    pub value_type: String,
    /// Condition identifier, e.g. `$contains`.
    pub condition: String,
    /// Comparison value as plain JSON.
    #[serde(default)]
    pub value: Value,
}

impl FilterRule {
    /// Validate the rule and convert it to a dialog row.
    ///
    /// # Errors
    /// Returns [`FilterError::UnsupportedType`] for unknown type names and
    /// [`FilterError::UnknownCondition`] for identifiers the type does not list.
    pub fn to_available(&self) -> FilterResult<AvailableFilter> {
        let value_type: ValueType = self.value_type.parse()?;
        let filter = AvailableFilter::new(self.field.clone(), value_type)
            .with_condition(&self.condition)?
            .with_value(FilterValue::from_json(&self.value, value_type));
        Ok(filter)
    }
}

/// Rule document: every rule must match for a record to be kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    /// Rules applied with AND semantics.
    #[serde(default)]
    pub rules: Vec<FilterRule>,
}

impl FilterSet {
    /// Convert every rule, failing on the first invalid one.
    ///
    /// # Errors
    /// See [`FilterRule::to_available`].
    pub fn to_available(&self) -> FilterResult<Vec<AvailableFilter>> {
        self.rules.iter().map(FilterRule::to_available).collect()
    }
}
