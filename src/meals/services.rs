use serde_json::Value;

use crate::meals::dto::PutMealRequest;
use crate::meals::repo_types::MealRecord;

/// Builds the edited record for `existing` from a client edit.
/// Bad nutrition input becomes 0, a missing name keeps the current one.
pub fn apply_edit(existing: &MealRecord, edit: &PutMealRequest) -> MealRecord {
    let name = match &edit.name {
        Some(Value::String(s)) => s.clone(),
        _ => existing.name.clone(),
    };
    MealRecord {
        name,
        calories: coerce_macro(edit.calories.as_ref()),
        protein: coerce_macro(edit.protein.as_ref()),
        carbs: coerce_macro(edit.carbs.as_ref()),
        fats: coerce_macro(edit.fats.as_ref()),
        ..existing.clone()
    }
}

/// Non-negative integer from whatever the edit form sent.
pub fn coerce_macro(raw: Option<&Value>) -> u32 {
    match raw {
        Some(Value::Number(n)) => {
            if let Some(u) = n.as_u64() {
                u32::try_from(u).unwrap_or(u32::MAX)
            } else if let Some(f) = n.as_f64() {
                coerce_float(f)
            } else {
                0
            }
        }
        Some(Value::String(s)) => parse_leading_int(s),
        _ => 0,
    }
}

fn coerce_float(f: f64) -> u32 {
    if !f.is_finite() || f <= 0.0 {
        return 0;
    }
    // `as` saturates at u32::MAX
    f.trunc() as u32
}

// Leading `[+-]?\d+` after whitespace, like a lenient integer parse.
fn parse_leading_int(s: &str) -> u32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let value = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |acc, d| {
            acc.saturating_mul(10).saturating_add(u32::from(d - b'0'))
        });
    if negative {
        0
    } else {
        value
    }
}
