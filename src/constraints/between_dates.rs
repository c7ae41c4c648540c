// Date range constraint over Unix-second timestamps
use super::types::{Clause, Comparison, FilterEntry, FilterValue, Predicate, TimeUnit};
use crate::error::{MindbreezeError, Result};
use serde_json::Value;

/// Build the single `and` entry bounding `label` between two timestamps
///
/// `values` must be a two element array `[from, to]` of Unix seconds.
/// Both bounds are sent in milliseconds, inclusive on each side.
pub fn filter(label: &str, values: &Value) -> Result<FilterEntry> {
    let bounds = match values.as_array() {
        Some(bounds) if bounds.len() == 2 => bounds,
        _ => {
            return Err(MindbreezeError::invalid_argument(
                "Value passed to between_dates constraint is invalid: must be an array with two values",
            ))
        }
    };

    let from = to_millis(&bounds[0])?;
    let to = to_millis(&bounds[1])?;

    Ok(FilterEntry {
        label: label.to_string(),
        predicate: Predicate::And(vec![
            Clause::Range {
                num: from,
                cmp: Comparison::GreaterOrEqual,
                unit: TimeUnit::MsSince1970,
            },
            Clause::Range {
                num: to,
                cmp: Comparison::LessOrEqual,
                unit: TimeUnit::MsSince1970,
            },
        ]),
        value: FilterValue::Num {
            num: from,
            unit: TimeUnit::MsSince1970,
        },
    })
}

fn to_millis(value: &Value) -> Result<i64> {
    if let Some(seconds) = value.as_i64() {
        return seconds.checked_mul(1000).ok_or_else(|| {
            MindbreezeError::invalid_argument(format!("Timestamp out of range: {}", seconds))
        });
    }

    match value.as_f64() {
        Some(seconds) => {
            let millis = (seconds * 1000.0).round();
            if millis.is_finite() && millis >= i64::MIN as f64 && millis <= i64::MAX as f64 {
                Ok(millis as i64)
            } else {
                Err(MindbreezeError::invalid_argument(format!(
                    "Timestamp out of range: {}",
                    seconds
                )))
            }
        }
        None => Err(MindbreezeError::invalid_argument(format!(
            "Timestamp must be a number, got {}",
            value
        ))),
    }
}
