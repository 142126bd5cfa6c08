//! Static condition registry keyed by semantic value type.
//!
//! # Design
//! - Conditions are a closed enum; lookups by identifier happen only at the
//!   parsing boundary (`FromStr`).
//! - Each value type owns an ordered, `'static` descriptor table. Identifiers
//!   are unique within a table but shared across tables (`$eq` exists for
//!   every type).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FilterError, FilterResult};

/// Semantic data kind a condition is valid for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Free text compared after normalization.
    String,
    /// Floating point numbers.
    Number,
    /// UTC timestamps.
    Date,
    /// True/false flags.
    Boolean,
}

impl ValueType {
    /// Every supported value type, in registry order.
    pub const ALL: [Self; 4] = [Self::String, Self::Number, Self::Date, Self::Boolean];

    /// Stable lowercase name used in documents and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
        }
    }
}

impl Display for ValueType {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for ValueType {
    type Err = FilterError;

    fn from_str(value: &str) -> FilterResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "boolean" => Ok(Self::Boolean),
            _ => Err(FilterError::unsupported_type(value)),
        }
    }
}

/// Comparison operators understood by the evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// Normalized field text contains the comparison text.
    #[serde(rename = "$contains")]
    Contains,
    /// Normalized field text starts with the comparison text.
    #[serde(rename = "$startsWith")]
    StartsWith,
    /// Normalized field text ends with the comparison text.
    #[serde(rename = "$endsWith")]
    EndsWith,
    /// Operands are equal.
    #[serde(rename = "$eq")]
    Equals,
    /// Operands differ.
    #[serde(rename = "$ne")]
    NotEquals,
    /// Field orders strictly before the comparison value.
    #[serde(rename = "$lt")]
    LessThan,
    /// Field orders before or equal to the comparison value.
    #[serde(rename = "$lte")]
    LessOrEqual,
    /// Field orders strictly after the comparison value.
    #[serde(rename = "$gt")]
    GreaterThan,
    /// Field orders after or equal to the comparison value.
    #[serde(rename = "$gte")]
    GreaterOrEqual,
}

impl Condition {
    /// Every condition known to the registry.
    pub const ALL: [Self; 9] = [
        Self::Contains,
        Self::StartsWith,
        Self::EndsWith,
        Self::Equals,
        Self::NotEquals,
        Self::LessThan,
        Self::LessOrEqual,
        Self::GreaterThan,
        Self::GreaterOrEqual,
    ];

    /// Stable identifier, matching the serialized form.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Contains => "$contains",
            Self::StartsWith => "$startsWith",
            Self::EndsWith => "$endsWith",
            Self::Equals => "$eq",
            Self::NotEquals => "$ne",
            Self::LessThan => "$lt",
            Self::LessOrEqual => "$lte",
            Self::GreaterThan => "$gt",
            Self::GreaterOrEqual => "$gte",
        }
    }

    /// Generic label used when no type-specific label applies.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contains => "contains",
            Self::StartsWith => "starts with",
            Self::EndsWith => "ends with",
            Self::Equals => "equals",
            Self::NotEquals => "not equals",
            Self::LessThan => "less than",
            Self::LessOrEqual => "less than or equal to",
            Self::GreaterThan => "greater than",
            Self::GreaterOrEqual => "greater than or equal to",
        }
    }

    /// Whether the registry lists this condition for `value_type`.
    #[must_use]
    pub fn applies_to(self, value_type: ValueType) -> bool {
        conditions_for(value_type)
            .iter()
            .any(|descriptor| descriptor.condition == self)
    }
}

impl Display for Condition {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.id())
    }
}

impl FromStr for Condition {
    type Err = FilterError;

    /// Accepts the canonical identifier with or without its leading `$`.
    fn from_str(value: &str) -> FilterResult<Self> {
        let trimmed = value.trim();
        let bare = trimmed.strip_prefix('$').unwrap_or(trimmed);
        Self::ALL
            .into_iter()
            .find(|condition| &condition.id()[1..] == bare)
            .ok_or_else(|| FilterError::unknown_condition(value))
    }
}

/// Display metadata for a condition within one value-type group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConditionDescriptor {
    /// Operator applied by the evaluator.
    #[serde(rename = "condition_id")]
    pub condition: Condition,
    /// Human-readable label shown in filter dialogs.
    pub condition_name: &'static str,
    /// Value type both operands must carry.
    pub value_type: ValueType,
}

impl ConditionDescriptor {
    const fn new(condition: Condition, condition_name: &'static str, value_type: ValueType) -> Self {
        Self {
            condition,
            condition_name,
            value_type,
        }
    }

    /// Identifier of the described condition.
    #[must_use]
    pub const fn condition_id(&self) -> &'static str {
        self.condition.id()
    }
}

static STRING_CONDITIONS: [ConditionDescriptor; 5] = [
    ConditionDescriptor::new(Condition::Contains, "contains", ValueType::String),
    ConditionDescriptor::new(Condition::StartsWith, "starts with", ValueType::String),
    ConditionDescriptor::new(Condition::EndsWith, "ends with", ValueType::String),
    ConditionDescriptor::new(Condition::Equals, "equals", ValueType::String),
    ConditionDescriptor::new(Condition::NotEquals, "not equals", ValueType::String),
];

static NUMBER_CONDITIONS: [ConditionDescriptor; 6] = [
    ConditionDescriptor::new(Condition::Equals, "=", ValueType::Number),
    ConditionDescriptor::new(Condition::NotEquals, "!=", ValueType::Number),
    ConditionDescriptor::new(Condition::LessThan, "<", ValueType::Number),
    ConditionDescriptor::new(Condition::LessOrEqual, "<=", ValueType::Number),
    ConditionDescriptor::new(Condition::GreaterThan, ">", ValueType::Number),
    ConditionDescriptor::new(Condition::GreaterOrEqual, ">=", ValueType::Number),
];

static DATE_CONDITIONS: [ConditionDescriptor; 6] = [
    ConditionDescriptor::new(Condition::Equals, "on", ValueType::Date),
    ConditionDescriptor::new(Condition::NotEquals, "not on", ValueType::Date),
    ConditionDescriptor::new(Condition::LessThan, "before", ValueType::Date),
    ConditionDescriptor::new(Condition::LessOrEqual, "on or before", ValueType::Date),
    ConditionDescriptor::new(Condition::GreaterThan, "after", ValueType::Date),
    ConditionDescriptor::new(Condition::GreaterOrEqual, "on or after", ValueType::Date),
];

static BOOLEAN_CONDITIONS: [ConditionDescriptor; 2] = [
    ConditionDescriptor::new(Condition::Equals, "is", ValueType::Boolean),
    ConditionDescriptor::new(Condition::NotEquals, "is not", ValueType::Boolean),
];

/// Ordered conditions supported for `value_type`.
#[must_use]
pub fn conditions_for(value_type: ValueType) -> &'static [ConditionDescriptor] {
    match value_type {
        ValueType::String => &STRING_CONDITIONS,
        ValueType::Number => &NUMBER_CONDITIONS,
        ValueType::Date => &DATE_CONDITIONS,
        ValueType::Boolean => &BOOLEAN_CONDITIONS,
    }
}

/// Ordered conditions for a textual type name.
///
/// # Errors
/// Returns [`FilterError::UnsupportedType`] when `value_type` names no known type.
pub fn conditions_for_name(value_type: &str) -> FilterResult<&'static [ConditionDescriptor]> {
    value_type.parse().map(conditions_for)
}
