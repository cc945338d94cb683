//! STK push password derivation.
//!
//! The provider authenticates STK requests with
//! `base64(shortcode + passkey + timestamp)`, where `timestamp` must equal the
//! `Timestamp` field sent in the same request.

use std::fmt;

use base64::{Engine, engine::general_purpose::STANDARD};

use super::clock::{Clock, Timestamp};

/// Encodes the STK password for `shortcode` and `passkey` at `timestamp`.
///
/// The three parts are concatenated in that order as raw bytes and encoded
/// with the standard, padded base64 alphabet.
///
/// # Examples
///
/// ```
/// use mpesa_daraja::codec::{FixedClock, Timestamp, encode_password};
///
/// let clock = FixedClock::from_ymd_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let timestamp = Timestamp::now(&clock);
/// assert_eq!(
///     encode_password("123456", "passkey", &timestamp),
///     "MTIzNDU2cGFzc2tleTIwMjQwMTAxMDAwMDAw",
/// );
/// ```
#[must_use]
pub fn encode_password(shortcode: &str, passkey: &str, timestamp: &Timestamp) -> String {
    let mut raw = String::with_capacity(shortcode.len() + passkey.len() + 14);
    raw.push_str(shortcode);
    raw.push_str(passkey);
    raw.push_str(timestamp.as_str());
    STANDARD.encode(raw.as_bytes())
}

/// Password and the timestamp it was derived from.
///
/// Both values go into the same request body; reading the clock once keeps
/// them consistent.
#[derive(Clone)]
pub struct StkPassword {
    password: String,
    timestamp: Timestamp,
}

impl StkPassword {
    /// Reads `clock` once and derives the password for that instant.
    #[must_use]
    pub fn new(shortcode: &str, passkey: &str, clock: &dyn Clock) -> Self {
        let timestamp = Timestamp::now(clock);
        Self::at(shortcode, passkey, timestamp)
    }

    /// Derives the password for an explicit timestamp.
    #[must_use]
    pub fn at(shortcode: &str, passkey: &str, timestamp: Timestamp) -> Self {
        let password = encode_password(shortcode, passkey, &timestamp);
        Self { password, timestamp }
    }

    /// Returns the encoded password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Returns the timestamp the password was derived from.
    #[must_use]
    pub fn timestamp(&self) -> &Timestamp {
        &self.timestamp
    }
}

// The encoded password is reversible to the passkey, so it never reaches logs.
impl fmt::Debug for StkPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StkPassword")
            .field("password", &"[REDACTED]")
            .field("timestamp", &self.timestamp)
            .finish()
    }
}
