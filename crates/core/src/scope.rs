//! Scope resolution for tool parameters.
//!
//! Every tool call passes through these functions before any store access:
//! they normalize the identity and lookup-key parameters (owner, week start,
//! day index, date, weight) and fail fast on missing or malformed values.
//! All functions are pure — no I/O, deterministic given the inputs.

use serde_json::Value;

use crate::error::HearthError;

/// Resolve the effective owner id: the trimmed candidate when non-empty,
/// otherwise the process-wide default.
pub fn resolve_owner(
    candidate: Option<&str>,
    default_owner: Option<&str>,
) -> Result<String, HearthError> {
    let resolved = candidate
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| default_owner.map(str::trim).filter(|s| !s.is_empty()));
    match resolved {
        Some(owner) => Ok(owner.to_string()),
        None => Err(HearthError::configuration(
            "missing owner and no default owner configured (HEARTH_DEFAULT_OWNER)",
        )),
    }
}

/// Week start must be a non-empty `YYYY-MM-DD`-shaped string. Only emptiness
/// is checked here; calendar validity is left to the caller's data hygiene.
pub fn resolve_week_start(candidate: Option<&str>) -> Result<String, HearthError> {
    non_empty(candidate, "week_start")
}

/// Entry date, same rules as week start.
pub fn resolve_date(candidate: Option<&str>) -> Result<String, HearthError> {
    non_empty(candidate, "date")
}

fn non_empty(candidate: Option<&str>, field: &str) -> Result<String, HearthError> {
    match candidate.map(str::trim).filter(|s| !s.is_empty()) {
        Some(v) => Ok(v.to_string()),
        None => Err(HearthError::validation(format!("{field} is required"))),
    }
}

/// Day index must be an integer in 1..=7 (Monday through Sunday).
pub fn resolve_day_index(candidate: Option<&Value>) -> Result<i32, HearthError> {
    let n = candidate
        .and_then(Value::as_i64)
        .ok_or_else(|| HearthError::validation("day_index must be an integer"))?;
    if !(1..=7).contains(&n) {
        return Err(HearthError::validation(format!(
            "day_index must be between 1 and 7, got {n}"
        )));
    }
    Ok(n as i32)
}

/// Weight must parse as a finite number; both JSON numbers and numeric
/// strings are accepted.
pub fn resolve_weight(candidate: Option<&Value>) -> Result<f64, HearthError> {
    let parsed = match candidate {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed.filter(|f| f.is_finite()) {
        Some(f) => Ok(f),
        None => Err(HearthError::validation("weight_kg must be a finite number")),
    }
}
