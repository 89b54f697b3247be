// Remote spreadsheet store: whole-sheet reads and row appends over HTTP.
pub mod http;
#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use serde_json::Value;
use crate::error::AppError;

#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Every row of the sheet. There is no paging.
    async fn fetch(&self, sheet: Option<&str>) -> Result<Vec<Value>, AppError>;

    /// Appends rows in order in one request. Returns how many the store wrote,
    /// which is always a prefix of `rows` and may be fewer than were sent.
    async fn append(&self, sheet: Option<&str>, rows: Vec<Value>) -> Result<usize, AppError>;

    /// Rows whose columns equal every `(column, value)` pair.
    async fn search(&self, sheet: Option<&str>, criteria: &[(&str, &str)]) -> Result<Vec<Value>, AppError>;
}

/// Accepts both response shapes: a bare array, or `{data: [...]}` / `{error}`
/// from the script-backed variant.
pub fn parse_rows(body: Value) -> Result<Vec<Value>, AppError> {
    match body {
        Value::Array(rows) => Ok(rows),
        Value::Object(mut map) => {
            if let Some(Value::Array(rows)) = map.remove("data") {
                return Ok(rows);
            }
            match map.get("error") {
                Some(err) => Err(AppError::remote(format!("Store error: {}", error_text(err)))),
                None => Err(AppError::remote("Malformed response from store")),
            }
        }
        _ => Err(AppError::remote("Malformed response from store")),
    }
}

/// An append succeeded iff the body has a truthy `created` or `result: "success"`.
/// Returns how many rows were written. The script-backed variant writes only
/// the first row of a request, so `result: "success"` counts as one.
pub fn parse_append(body: &Value, sent: usize) -> Result<usize, AppError> {
    match body.get("created") {
        Some(Value::Number(n)) if n.as_u64().unwrap_or(0) > 0 => {
            return Ok(n.as_u64().unwrap_or(0) as usize);
        }
        Some(Value::Bool(true)) => return Ok(sent),
        _ => {}
    }
    if body.get("result").and_then(Value::as_str) == Some("success") {
        return Ok(sent.min(1));
    }
    let reason = body.get("error").map(error_text).unwrap_or_else(|| "Unknown error".to_string());
    Err(AppError::remote(format!("Error: {reason}")))
}

fn error_text(err: &Value) -> String {
    match err {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_from_bare_array_or_data_envelope() {
        assert_eq!(parse_rows(json!([{"a": 1}])).unwrap().len(), 1);
        assert_eq!(parse_rows(json!({"data": [{"a": 1}, {"a": 2}]})).unwrap().len(), 2);
    }

    #[test]
    fn error_envelope_and_junk_are_failures() {
        let err = parse_rows(json!({"error": "Sheet 'Sheet1' not found."})).unwrap_err();
        assert!(err.message().contains("Sheet 'Sheet1' not found."));
        assert!(parse_rows(json!({"rows": []})).is_err());
        assert!(parse_rows(json!("ok")).is_err());
    }

    #[test]
    fn append_success_shapes() {
        assert_eq!(parse_append(&json!({"created": 3}), 3).unwrap(), 3);
        assert_eq!(parse_append(&json!({"result": "success"}), 1).unwrap(), 1);
        assert_eq!(parse_append(&json!({"result": "success"}), 3).unwrap(), 1);
        assert_eq!(parse_append(&json!({"created": true}), 3).unwrap(), 3);
        assert!(parse_append(&json!({"created": 0}), 1).is_err());
        let err = parse_append(&json!({"result": "error", "error": "Invalid payload format"}), 1).unwrap_err();
        assert_eq!(err.message(), "Error: Invalid payload format");
        assert_eq!(parse_append(&json!({}), 1).unwrap_err().message(), "Error: Unknown error");
    }
}
