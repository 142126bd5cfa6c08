//! Predicate application for a single field value.
//!
//! # Design
//! - Evaluation is pure; the only failure is an unrecognised condition
//!   identifier, reported at the parsing boundary.
//! - Absent operands, mismatched operand types and conditions that the
//!   registry does not list for the operand type all yield
//!   [`MatchOutcome::Indeterminate`].

use std::cmp::Ordering;

use serde::Serialize;

use crate::error::FilterResult;
use crate::registry::Condition;
use crate::value::FilterValue;

/// Three-state result of applying a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchOutcome {
    /// The field satisfies the condition.
    Match,
    /// The field does not satisfy the condition.
    NoMatch,
    /// No decision is possible; callers exclude the item.
    Indeterminate,
}

impl MatchOutcome {
    /// Lift a plain comparison result.
    #[must_use]
    pub const fn from_bool(matched: bool) -> Self {
        if matched { Self::Match } else { Self::NoMatch }
    }

    /// Whether the outcome keeps the item in a filtered view.
    #[must_use]
    pub const fn is_match(self) -> bool {
        matches!(self, Self::Match)
    }

    /// Machine-friendly label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::NoMatch => "no_match",
            Self::Indeterminate => "indeterminate",
        }
    }
}

/// Lower-case, trim, and drop everything that is not an ASCII letter, ASCII
/// digit or whitespace. Lossy: `"João"` becomes `"joo"`.
///
/// Whitespace is any Unicode whitespace and is kept as written, so a
/// non-breaking space survives and does not equal a plain space.
#[must_use]
pub fn clean_string(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace())
        .collect();
    kept.trim().to_ascii_lowercase()
}

/// Apply the condition named by `condition_id`.
///
/// # Errors
/// Returns [`crate::FilterError::UnknownCondition`] when `condition_id` is not
/// registered.
pub fn evaluate(
    condition_id: &str,
    field: &FilterValue,
    comparison: &FilterValue,
) -> FilterResult<MatchOutcome> {
    let condition: Condition = condition_id.parse()?;
    Ok(evaluate_condition(condition, field, comparison))
}

/// Apply an already-resolved condition.
#[must_use]
pub fn evaluate_condition(
    condition: Condition,
    field: &FilterValue,
    comparison: &FilterValue,
) -> MatchOutcome {
    match (field, comparison) {
        (FilterValue::String(field), FilterValue::String(comparison)) => {
            compare_strings(condition, field, comparison)
        }
        (FilterValue::Number(field), FilterValue::Number(comparison)) => {
            compare_numbers(condition, *field, *comparison)
        }
        (FilterValue::Date(field), FilterValue::Date(comparison)) => {
            compare_ordering(condition, field.cmp(comparison))
        }
        (FilterValue::Boolean(field), FilterValue::Boolean(comparison)) => {
            compare_booleans(condition, *field, *comparison)
        }
        _ => MatchOutcome::Indeterminate,
    }
}

fn compare_strings(condition: Condition, field: &str, comparison: &str) -> MatchOutcome {
    let field = clean_string(field);
    let comparison = clean_string(comparison);
    let matched = match condition {
        Condition::Contains => field.contains(comparison.as_str()),
        Condition::StartsWith => field.starts_with(comparison.as_str()),
        Condition::EndsWith => field.ends_with(comparison.as_str()),
        Condition::Equals => field == comparison,
        Condition::NotEquals => field != comparison,
        Condition::LessThan
        | Condition::LessOrEqual
        | Condition::GreaterThan
        | Condition::GreaterOrEqual => return MatchOutcome::Indeterminate,
    };
    MatchOutcome::from_bool(matched)
}

fn compare_numbers(condition: Condition, field: f64, comparison: f64) -> MatchOutcome {
    match condition {
        Condition::Equals => MatchOutcome::from_bool(numbers_equal(field, comparison)),
        Condition::NotEquals => MatchOutcome::from_bool(!numbers_equal(field, comparison)),
        _ => field
            .partial_cmp(&comparison)
            .map_or(MatchOutcome::Indeterminate, |ordering| {
                compare_ordering(condition, ordering)
            }),
    }
}

// NaN equals NaN so that `$eq` stays reflexive.
#[allow(clippy::float_cmp)]
fn numbers_equal(left: f64, right: f64) -> bool {
    left == right || (left.is_nan() && right.is_nan())
}

fn compare_ordering(condition: Condition, ordering: Ordering) -> MatchOutcome {
    let matched = match condition {
        Condition::Equals => ordering.is_eq(),
        Condition::NotEquals => ordering.is_ne(),
        Condition::LessThan => ordering.is_lt(),
        Condition::LessOrEqual => ordering.is_le(),
        Condition::GreaterThan => ordering.is_gt(),
        Condition::GreaterOrEqual => ordering.is_ge(),
        Condition::Contains | Condition::StartsWith | Condition::EndsWith => {
            return MatchOutcome::Indeterminate;
        }
    };
    MatchOutcome::from_bool(matched)
}

fn compare_booleans(condition: Condition, field: bool, comparison: bool) -> MatchOutcome {
    match condition {
        Condition::Equals => MatchOutcome::from_bool(field == comparison),
        Condition::NotEquals => MatchOutcome::from_bool(field != comparison),
        _ => MatchOutcome::Indeterminate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::registry::{ValueType, conditions_for};
    use chrono::{TimeZone, Utc};

    fn eval(condition_id: &str, field: FilterValue, comparison: FilterValue) -> MatchOutcome {
        evaluate(condition_id, &field, &comparison).unwrap_or(MatchOutcome::Indeterminate)
    }

    #[test]
    fn clean_string_strips_lowers_and_trims() {
        assert_eq!(clean_string("João, Silva!"), "joo silva");
        assert_eq!(clean_string("  Product-42  "), "product42");
        assert_eq!(clean_string("!!!"), "");
        assert_eq!(clean_string("tab\there"), "tab\there");
    }

    #[test]
    fn clean_string_keeps_unicode_whitespace_verbatim() {
        assert_eq!(clean_string("A\u{a0}B"), "a\u{a0}b");
        assert_eq!(clean_string("\u{2003}x\u{a0}"), "x");
        assert_eq!(
            evaluate_condition(
                Condition::Equals,
                &FilterValue::from("a\u{a0}b"),
                &FilterValue::from("a b"),
            ),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn clean_string_is_idempotent() {
        for sample in ["João, Silva!", " a - b ", "ÁÉÍ 123 xyz", "", "  \n", "Ünïcödé!"] {
            let once = clean_string(sample);
            assert_eq!(clean_string(&once), once, "sample {sample:?}");
        }
    }

    #[test]
    fn string_conditions_use_normalized_text() {
        assert_eq!(
            eval("$startsWith", "Product-42".into(), "Product".into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$contains", "Olá, Mundo".into(), "MUNDO".into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$endsWith", "report.pdf".into(), "PDF".into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$eq", "  Ana ".into(), "ana".into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$ne", "Ana".into(), "Bia".into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$contains", "abc".into(), "abd".into()),
            MatchOutcome::NoMatch
        );
    }

    #[test]
    fn contains_agrees_with_normalized_substring() {
        let samples = ["João Silva", "joao", "Silva!", "", "x-y z", "SILVA"];
        for field in samples {
            for comparison in samples {
                let expected = clean_string(field).contains(&clean_string(comparison));
                assert_eq!(
                    eval("$contains", field.into(), comparison.into()),
                    MatchOutcome::from_bool(expected),
                    "{field:?} contains {comparison:?}"
                );
            }
        }
    }

    #[test]
    fn numeric_conditions_follow_ordering() {
        assert_eq!(eval("$ne", 10.into(), 10.into()), MatchOutcome::NoMatch);
        assert_eq!(eval("$lt", 3.into(), 4.into()), MatchOutcome::Match);
        assert_eq!(eval("$lte", 4.into(), 4.into()), MatchOutcome::Match);
        assert_eq!(eval("$gt", 3.into(), 4.into()), MatchOutcome::NoMatch);
        assert_eq!(eval("$gte", 4.5.into(), 4.into()), MatchOutcome::Match);
    }

    #[test]
    fn nan_is_reflexive_but_unordered() {
        assert_eq!(
            eval("$eq", f64::NAN.into(), f64::NAN.into()),
            MatchOutcome::Match
        );
        assert_eq!(
            eval("$lt", f64::NAN.into(), 1.into()),
            MatchOutcome::Indeterminate
        );
        assert_eq!(eval("$ne", f64::NAN.into(), 1.into()), MatchOutcome::Match);
    }

    #[test]
    fn date_conditions_compare_instants() {
        let earlier = FilterValue::from(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single());
        let later = FilterValue::from(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).single());
        assert_eq!(eval("$lt", earlier.clone(), later.clone()), MatchOutcome::Match);
        assert_eq!(eval("$gte", earlier.clone(), later.clone()), MatchOutcome::NoMatch);
        assert_eq!(eval("$eq", later.clone(), later), MatchOutcome::Match);
        assert_eq!(
            eval("$contains", earlier.clone(), earlier),
            MatchOutcome::Indeterminate
        );
    }

    #[test]
    fn booleans_only_support_equality() {
        assert_eq!(eval("$eq", true.into(), true.into()), MatchOutcome::Match);
        assert_eq!(eval("$ne", true.into(), false.into()), MatchOutcome::Match);
        assert_eq!(
            eval("$gt", true.into(), false.into()),
            MatchOutcome::Indeterminate
        );
    }

    #[test]
    fn equals_is_reflexive_for_every_type() {
        let samples = [
            FilterValue::from("Olá"),
            FilterValue::from(-2.5),
            FilterValue::from(Utc.with_ymd_and_hms(2023, 5, 4, 3, 2, 1).single()),
            FilterValue::from(false),
        ];
        for sample in samples {
            assert_eq!(
                evaluate_condition(Condition::Equals, &sample, &sample),
                MatchOutcome::Match
            );
        }
    }

    #[test]
    fn absent_operands_are_indeterminate_for_every_condition() {
        for value_type in ValueType::ALL {
            for descriptor in conditions_for(value_type) {
                assert_eq!(
                    evaluate_condition(descriptor.condition, &FilterValue::Null, &"x".into()),
                    MatchOutcome::Indeterminate
                );
                assert_eq!(
                    evaluate_condition(descriptor.condition, &1.into(), &FilterValue::Null),
                    MatchOutcome::Indeterminate
                );
            }
        }
    }

    #[test]
    fn mismatched_types_are_indeterminate() {
        assert_eq!(eval("$eq", "10".into(), 10.into()), MatchOutcome::Indeterminate);
        assert_eq!(
            eval("$contains", 123.into(), "12".into()),
            MatchOutcome::Indeterminate
        );
        assert_eq!(
            eval("$lt", "a".into(), "b".into()),
            MatchOutcome::Indeterminate
        );
    }

    #[test]
    fn unknown_condition_is_an_error() {
        assert_eq!(
            evaluate("$between", &1.into(), &2.into()),
            Err(FilterError::UnknownCondition {
                condition_id: "$between".into()
            })
        );
    }

    #[test]
    fn outcome_labels_are_stable() {
        assert_eq!(MatchOutcome::Indeterminate.as_str(), "indeterminate");
        assert!(MatchOutcome::from_bool(true).is_match());
        assert!(!MatchOutcome::NoMatch.is_match());
    }
}
