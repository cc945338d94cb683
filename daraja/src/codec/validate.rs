//! Required-field checks.
//!
//! Typed request records are checked with [`require_non_empty`] and
//! [`require_positive`]; untyped JSON maps go through [`check_keys`] first.
//! Every check reports the first failing field in declaration order.

use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::error::{DarajaError, Result};

/// Returns a copy of `payload` holding only the `required` keys.
///
/// Fails with [`DarajaError::Validation`] naming the first key (in the order of
/// `required`) that `payload` does not contain. Presence is all that is
/// checked; a key mapped to `null` or `""` counts as present.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::codec::check_keys;
/// use serde_json::json;
///
/// let payload = json!({"short_code": "600000", "amount": "10", "extra": true});
/// let cleaned = check_keys(&["short_code", "amount"], payload.as_object().unwrap()).unwrap();
/// assert_eq!(cleaned.len(), 2);
/// assert!(!cleaned.contains_key("extra"));
///
/// let err = check_keys(&["short_code", "msisdn"], payload.as_object().unwrap()).unwrap_err();
/// assert_eq!(err.field(), Some("msisdn"));
/// ```
///
/// # Errors
///
/// Returns [`DarajaError::Validation`] if any required key is missing.
pub fn check_keys(required: &[&str], payload: &Map<String, Value>) -> Result<Map<String, Value>> {
    let mut cleaned = Map::with_capacity(required.len());
    for &key in required {
        let value = payload.get(key).ok_or_else(|| DarajaError::missing(key))?;
        cleaned.insert(key.to_owned(), value.clone());
    }
    Ok(cleaned)
}

/// Checks that every `(name, value)` pair has a non-blank value.
///
/// # Errors
///
/// Returns [`DarajaError::Validation`] naming the first blank field.
pub fn require_non_empty(fields: &[(&'static str, &str)]) -> Result<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(DarajaError::missing(*name)),
        None => Ok(()),
    }
}

/// Checks that a monetary amount is strictly positive.
///
/// # Errors
///
/// Returns [`DarajaError::Validation`] naming `field` if `amount <= 0`.
pub fn require_positive(field: &'static str, amount: Decimal) -> Result<()> {
    if amount.is_sign_positive() && !amount.is_zero() {
        Ok(())
    } else {
        Err(DarajaError::missing(field))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;

    fn object(value: &Value) -> &Map<String, Value> {
        value.as_object().unwrap()
    }

    #[test]
    fn test_check_keys_keeps_only_required() {
        let payload = json!({"a": 1, "b": "two", "c": null, "d": false});
        let cleaned = check_keys(&["a", "c"], object(&payload)).unwrap();

        assert_eq!(cleaned.len(), 2);
        assert_eq!(cleaned["a"], json!(1));
        assert_eq!(cleaned["c"], Value::Null);
    }

    #[test]
    fn test_check_keys_reports_first_missing_in_declaration_order() {
        let payload = json!({"b": 1});
        let err = check_keys(&["z", "b", "a"], object(&payload)).unwrap_err();
        assert_eq!(err.field(), Some("z"));

        let err = check_keys(&["b", "a", "z"], object(&payload)).unwrap_err();
        assert_eq!(err.field(), Some("a"));
    }

    #[test]
    fn test_check_keys_empty_requirements() {
        let payload = json!({"a": 1});
        assert!(check_keys(&[], object(&payload)).unwrap().is_empty());
    }

    #[test]
    fn test_require_non_empty() {
        assert!(require_non_empty(&[("a", "x"), ("b", "y")]).is_ok());
        assert!(require_non_empty(&[]).is_ok());

        let err = require_non_empty(&[("a", "x"), ("b", ""), ("c", "")]).unwrap_err();
        assert_eq!(err.field(), Some("b"));
    }

    #[test]
    fn test_require_non_empty_treats_whitespace_as_missing() {
        let err = require_non_empty(&[("remarks", "  \t")]).unwrap_err();
        assert_eq!(err.field(), Some("remarks"));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("amount", Decimal::new(1, 0)).is_ok());
        assert!(require_positive("amount", Decimal::new(1, 2)).is_ok());
        assert_eq!(require_positive("amount", Decimal::ZERO).unwrap_err().field(), Some("amount"));
        assert_eq!(
            require_positive("amount", Decimal::new(-5, 0)).unwrap_err().field(),
            Some("amount")
        );
    }
}
