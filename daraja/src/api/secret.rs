//! Redacted string wrapper for credentials carried in request records.

use std::fmt;

use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// A credential string that never appears in `Debug` output.
///
/// Used for STK passkeys and initiator security credentials. The value is
/// zeroized on drop.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::api::Secret;
///
/// let passkey = Secret::new("bfb279f9aa9bdbcf");
/// assert_eq!(passkey.expose(), "bfb279f9aa9bdbcf");
/// assert_eq!(format!("{passkey:?}"), "Secret([REDACTED])");
/// ```
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    /// Wraps a credential.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the credential.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl From<String> for Secret {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Secret {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([REDACTED])")
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_redacts() {
        let secret = Secret::new("Safaricom999!*!");
        assert!(!format!("{secret:?}").contains("Safaricom"));
    }

    #[test]
    fn test_secret_serde_is_transparent() {
        let secret: Secret = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(secret.expose(), "abc");
        assert_eq!(serde_json::to_string(&secret).unwrap(), "\"abc\"");
    }

    #[test]
    fn test_secret_default_is_empty() {
        assert!(Secret::default().expose().is_empty());
    }
}
