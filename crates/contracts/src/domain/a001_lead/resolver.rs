//! Picks the first usable value among candidate form fields.
//!
//! Form payloads come from several generations of site forms, so the same
//! fact may live under different keys. Resolution never fails: unusable
//! values fall through to the next candidate and finally to a default.

use serde_json::{Map, Value};

/// Usable text of a single form value.
///
/// Non-blank strings are trimmed, numbers render as text, everything else
/// (null, booleans, arrays, objects, missing) yields `None`.
pub fn resolve(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// [`resolve`] with a terminal default
pub fn resolve_or(value: Option<&Value>, fallback: &str) -> String {
    resolve(value).unwrap_or_else(|| fallback.to_string())
}

/// First key in `keys` whose value resolves; earlier keys win
pub fn first_present(data: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| resolve(data.get(*key)))
}

/// Resolution of an optional plain string (database columns)
pub fn resolve_str(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Integral floats print without a fractional part, matching how the
// browser stringifies `42.0`.
fn number_text(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
        }
    }
    n.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_fallback_chain() {
        assert_eq!(resolve_or(Some(&json!("")), "X"), "X");
        assert_eq!(resolve_or(Some(&json!("  ")), "X"), "X");
        assert_eq!(resolve_or(Some(&json!("abc")), "X"), "abc");
        assert_eq!(resolve_or(Some(&json!(42)), "X"), "42");
        assert_eq!(resolve(None), None);
    }

    #[test]
    fn test_resolve_trims_and_formats_numbers() {
        assert_eq!(resolve(Some(&json!("  Sara  "))), Some("Sara".to_string()));
        assert_eq!(resolve(Some(&json!(42.0))), Some("42".to_string()));
        assert_eq!(resolve(Some(&json!(4.5))), Some("4.5".to_string()));
        assert_eq!(resolve(Some(&json!(-7))), Some("-7".to_string()));
    }

    #[test]
    fn test_resolve_rejects_non_scalar_values() {
        assert_eq!(resolve(Some(&json!(null))), None);
        assert_eq!(resolve(Some(&json!(true))), None);
        assert_eq!(resolve(Some(&json!(["a"]))), None);
        assert_eq!(resolve(Some(&json!({"a": 1}))), None);
    }

    #[test]
    fn test_first_present_keeps_declared_order() {
        let data = json!({"emailAddress": "b@x.com", "email": "a@x.com"});
        let data = data.as_object().unwrap();
        assert_eq!(
            first_present(data, &["email", "emailAddress"]),
            Some("a@x.com".to_string())
        );

        let data = json!({"email": "  ", "contact_email": "c@x.com"});
        let data = data.as_object().unwrap();
        assert_eq!(
            first_present(data, &["email", "emailAddress", "contact_email"]),
            Some("c@x.com".to_string())
        );
    }

    #[test]
    fn test_resolve_str() {
        assert_eq!(resolve_str(Some(" new ")), Some("new".to_string()));
        assert_eq!(resolve_str(Some("")), None);
        assert_eq!(resolve_str(None), None);
    }
}
