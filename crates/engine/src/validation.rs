//! Request payload validation.
//!
//! Incoming bodies are untrusted JSON. [`validate`] checks the rules in a fixed
//! order and reports only the first one that fails:
//!
//! 1. `type`
//! 2. `title`
//! 3. `amount`
//! 4. `category`
//! 5. `date`
//! 6. `notes`
//!
//! Keys outside this set (`userId`, `id`, timestamps, ...) are ignored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::{
    Category, EngineError, NewExpense, ResultEngine, TransactionKind,
    expenses::{NOTES_MAX_CHARS, TITLE_MAX_CHARS},
};

const TITLE_MIN_CHARS: usize = 2;

fn invalid(message: String) -> EngineError {
    EngineError::InvalidInput(message)
}

fn field<'a>(body: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    body.get(key).filter(|value| !value.is_null())
}

fn one_of<T: Copy>(
    body: &Map<String, Value>,
    key: &str,
    allowed: &[T],
    name: impl Fn(T) -> &'static str,
) -> ResultEngine<T> {
    let value = field(body, key).ok_or_else(|| invalid(format!("\"{key}\" is required")))?;
    value
        .as_str()
        .and_then(|s| allowed.iter().copied().find(|candidate| name(*candidate) == s))
        .ok_or_else(|| {
            let names: Vec<&str> = allowed.iter().map(|candidate| name(*candidate)).collect();
            invalid(format!("\"{key}\" must be one of [{}]", names.join(", ")))
        })
}

fn title(body: &Map<String, Value>) -> ResultEngine<String> {
    let value = field(body, "title").ok_or_else(|| invalid("\"title\" is required".to_string()))?;
    let raw = value
        .as_str()
        .ok_or_else(|| invalid("\"title\" must be a string".to_string()))?;
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 {
        return Err(invalid("\"title\" is not allowed to be empty".to_string()));
    }
    if len < TITLE_MIN_CHARS {
        return Err(invalid(format!(
            "\"title\" length must be at least {TITLE_MIN_CHARS} characters long"
        )));
    }
    if len > TITLE_MAX_CHARS {
        return Err(invalid(format!(
            "\"title\" length must be less than or equal to {TITLE_MAX_CHARS} characters long"
        )));
    }
    Ok(trimmed.to_string())
}

fn amount(body: &Map<String, Value>) -> ResultEngine<f64> {
    let value =
        field(body, "amount").ok_or_else(|| invalid("\"amount\" is required".to_string()))?;
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| invalid("\"amount\" must be a number".to_string()))?;

    if number <= 0.0 {
        return Err(invalid("\"amount\" must be a positive number".to_string()));
    }
    Ok(number)
}

/// Parses the date formats a client may send.
///
/// Accepted: RFC 3339 date-times, `YYYY-MM-DD` (midnight UTC), naive
/// `YYYY-MM-DDTHH:MM:SS[.f]` (UTC) and epoch milliseconds.
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
            }
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.and_utc())
        }
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
            .and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn date(body: &Map<String, Value>) -> ResultEngine<DateTime<Utc>> {
    let value = field(body, "date").ok_or_else(|| invalid("\"date\" is required".to_string()))?;
    parse_date(value).ok_or_else(|| invalid("\"date\" must be a valid date".to_string()))
}

fn notes(body: &Map<String, Value>) -> ResultEngine<Option<String>> {
    let Some(value) = field(body, "notes") else {
        return Ok(None);
    };
    let raw = value
        .as_str()
        .ok_or_else(|| invalid("\"notes\" must be a string".to_string()))?;
    let trimmed = raw.trim();
    if trimmed.chars().count() > NOTES_MAX_CHARS {
        return Err(invalid(format!(
            "\"notes\" length must be less than or equal to {NOTES_MAX_CHARS} characters long"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

/// Validates an untrusted request body into a [`NewExpense`].
///
/// Returns [`EngineError::InvalidInput`] carrying the message of the first
/// rule that fails.
pub fn validate(body: &Value) -> ResultEngine<NewExpense> {
    let body = body
        .as_object()
        .ok_or_else(|| invalid("\"value\" must be of type object".to_string()))?;

    let kind = one_of(body, "type", &TransactionKind::ALL, TransactionKind::as_str)?;
    let title = title(body)?;
    let amount = amount(body)?;
    let category = one_of(body, "category", &Category::ALL, Category::as_str)?;
    let date = date(body)?;
    let notes = notes(body)?;

    Ok(NewExpense {
        kind,
        title,
        amount,
        category,
        date,
        notes,
    })
}
