use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Largest magnitude accepted as a money amount. Anything beyond it is
/// treated like garbage input, so sums over a form stay finite.
pub const MAX_AMOUNT: f64 = 1e12;

/// Coerces a loosely typed JSON value into an amount.
/// Blank strings, null, non-numeric text, non-finite and out-of-range
/// numbers become 0.
pub fn coerce(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() && parsed.abs() <= MAX_AMOUNT { parsed } else { 0.0 }
}

pub fn lenient<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().map(coerce).unwrap_or(0.0))
}

pub fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = lenient(deserializer)?;
    if amount <= 0.0 {
        Ok(0)
    } else {
        Ok(amount.trunc().min(u32::MAX as f64) as u32)
    }
}

/// A blank or zero amount counts as "not entered".
pub fn lenient_optional<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = lenient(deserializer)?;
    Ok(if amount == 0.0 { None } else { Some(amount) })
}

/// Odometer readings keep the difference between "blank" and 0.
pub fn reading<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64().filter(|v| v.is_finite()),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

/// Free-text cells. Numbers keep their JSON text; null becomes "".
pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        None | Some(Value::Null) => String::new(),
        Some(other) => other.to_string(),
    })
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Sheet cells carry money as fixed two-decimal text.
pub fn to_cell(value: f64) -> String {
    format!("{:.2}", value)
}
