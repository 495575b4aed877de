//! Scanner-specific adapter implementations.
//!
//! Each adapter implements the
//! [`ScannerAdapter`](crate::normalize::ScannerAdapter) contract for one
//! scanner's native payload shape. The field helpers below encode the
//! per-field defaults all adapters share, so "get with default" logic is
//! applied once at record construction instead of scattered per call site.

use serde_json::Value;

pub mod nessus;
pub mod nuclei;

pub use nessus::NessusAdapter;
pub use nuclei::NucleiAdapter;

/// Reads an optional string field. Anything that is not a string (including
/// an explicit null) counts as absent.
pub(crate) fn opt_str(value: Option<&Value>) -> Option<String> {
    value.and_then(Value::as_str).map(str::to_string)
}

/// Reads an identifier that scanners emit as either a string or a number.
/// Empty strings count as absent.
pub(crate) fn opt_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a severity label that scanners emit as either a string or a
/// numeric code ("High", 4). The mapping table holds the lowercase form.
pub(crate) fn opt_label(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a list-of-strings field. A bare string becomes a one-element list
/// (Nuclei emits single references unwrapped); non-string elements are
/// skipped; anything else is an empty list.
pub(crate) fn str_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(s)) => vec![s.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_opt_str_treats_null_as_absent() {
        let obj = json!({"a": "x", "b": null, "c": 3});
        assert_eq!(opt_str(obj.get("a")), Some("x".to_string()));
        assert_eq!(opt_str(obj.get("b")), None);
        assert_eq!(opt_str(obj.get("c")), None);
        assert_eq!(opt_str(obj.get("missing")), None);
    }

    #[test]
    fn test_opt_id_accepts_numbers() {
        let obj = json!({"s": "12345", "n": 12345, "empty": ""});
        assert_eq!(opt_id(obj.get("s")), Some("12345".to_string()));
        assert_eq!(opt_id(obj.get("n")), Some("12345".to_string()));
        assert_eq!(opt_id(obj.get("empty")), None);
    }

    #[test]
    fn test_str_list_tolerates_shapes() {
        assert_eq!(
            str_list(Some(&json!(["a", 1, "b"]))),
            vec!["a".to_string(), "b".to_string()]
        );
        assert_eq!(str_list(Some(&json!("solo"))), vec!["solo".to_string()]);
        assert!(str_list(Some(&json!({"not": "a list"}))).is_empty());
        assert!(str_list(None).is_empty());
    }
}
