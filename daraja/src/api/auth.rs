//! OAuth token exchange records.

use std::{env, fmt, time::Duration};

use serde::{Deserialize, Serialize};

use super::{Secret, de::u64_from_string_or_number};
use crate::error::{DarajaError, Result};

/// Environment variable holding the consumer key.
pub const CONSUMER_KEY_ENV: &str = "DARAJA_CONSUMER_KEY";

/// Environment variable holding the consumer secret.
pub const CONSUMER_SECRET_ENV: &str = "DARAJA_CONSUMER_SECRET";

/// App credentials exchanged for an access token.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::api::ConsumerCredentials;
///
/// let credentials = ConsumerCredentials::new("key", "s3cr3t");
/// assert_eq!(credentials.consumer_key(), "key");
/// assert!(!format!("{credentials:?}").contains("s3cr3t"));
/// ```
#[derive(Clone)]
pub struct ConsumerCredentials {
    consumer_key: String,
    consumer_secret: Secret,
}

impl ConsumerCredentials {
    /// Creates credentials from a consumer key and secret.
    #[must_use]
    pub fn new(consumer_key: impl Into<String>, consumer_secret: impl Into<String>) -> Self {
        Self { consumer_key: consumer_key.into(), consumer_secret: Secret::new(consumer_secret) }
    }

    /// Reads credentials from `DARAJA_CONSUMER_KEY` and `DARAJA_CONSUMER_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`DarajaError::Config`] if either variable is unset or empty.
    pub fn from_env() -> Result<Self> {
        let read = |name: &str| {
            env::var(name)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| DarajaError::Config(format!("environment variable {name} is not set")))
        };
        Ok(Self::new(read(CONSUMER_KEY_ENV)?, read(CONSUMER_SECRET_ENV)?))
    }

    /// Returns the consumer key.
    #[must_use]
    pub fn consumer_key(&self) -> &str {
        &self.consumer_key
    }

    /// Returns the consumer secret.
    #[must_use]
    pub fn consumer_secret(&self) -> &str {
        self.consumer_secret.expose()
    }
}

impl fmt::Debug for ConsumerCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerCredentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &self.consumer_secret)
            .finish()
    }
}

/// Access token issued by the token exchange.
///
/// `expires_in` is accepted as a number or a numeric string.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    /// Bearer token for subsequent requests.
    pub access_token: String,
    /// Token lifetime in seconds.
    #[serde(deserialize_with = "u64_from_string_or_number")]
    pub expires_in: u64,
}

impl AccessToken {
    /// Returns the token string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.access_token
    }

    /// Returns the token lifetime.
    #[must_use]
    pub const fn lifetime(&self) -> Duration {
        Duration::from_secs(self.expires_in)
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}
